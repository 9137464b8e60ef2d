//! Serve a built pattern library.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::services::ServeDir;

/// Run the serve command.
pub async fn run(host: &str, port: u16, dir: PathBuf) -> Result<()> {
    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'proto-blocks build' first.",
            dir.display()
        );
    }

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("Invalid address")?;

    let app = Router::new().fallback_service(ServeDir::new(&dir));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Serving {} at http://{}", dir.display(), addr);

    if let Err(e) = open::that(format!("http://{}", addr)) {
        tracing::warn!("Could not open browser: {}", e);
    }

    axum::serve(listener, app).await?;

    Ok(())
}
