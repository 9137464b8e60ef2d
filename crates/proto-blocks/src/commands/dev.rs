//! Development server command.

use anyhow::Result;
use proto_blocks_server::DevServer;

use crate::config::Config;

/// Run the dev server.
pub async fn run(config: &Config, port: Option<u16>, open: bool) -> Result<()> {
    let dev_config = config.dev_config(port, open);
    tracing::info!(
        "Starting development server for {} on port {}",
        dev_config.patterns_dir.display(),
        dev_config.port
    );

    DevServer::new(dev_config).start().await?;

    Ok(())
}
