//! Static pattern library build command.

use std::path::PathBuf;

use anyhow::Result;
use proto_blocks_static::StaticBuilder;

use crate::config::Config;

/// Run the build command.
pub async fn run(config: &Config, output: Option<PathBuf>, no_minify: bool, preview: bool) -> Result<()> {
    tracing::info!("Building pattern library...");

    let build_config = config.build_config(output, no_minify, preview);
    let result = StaticBuilder::new(build_config).build().await?;

    tracing::info!(
        "Built {} pages with {} blocks in {}ms",
        result.pages,
        result.blocks,
        result.duration_ms
    );
    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
