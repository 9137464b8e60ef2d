//! proto-blocks CLI - render, preview and publish proto content blocks.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "proto-blocks")]
#[command(about = "Render, preview and publish proto content blocks")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to blocks.toml config file
    #[arg(short, long, default_value = "blocks.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold blocks.toml and a sample pattern page
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// List registered blocks
    List,

    /// Render a single block to stdout
    Render {
        /// Block name, e.g. `card` or `proto/card`
        block: String,

        /// JSON attribute file, or `-` for stdin
        #[arg(short, long)]
        attributes: Option<PathBuf>,

        /// Inner content passed to the block
        #[arg(long, default_value = "")]
        inner: String,

        /// Render the editor placeholder
        #[arg(long)]
        preview: bool,

        /// Extra wrapper class
        #[arg(long)]
        class: Option<String>,

        /// Extra wrapper inline style
        #[arg(long)]
        style: Option<String>,
    },

    /// Build the static pattern library
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,

        /// Render every block as an editor placeholder
        #[arg(long)]
        preview: bool,
    },

    /// Start development server with live reload
    Dev {
        /// Port to listen on (defaults to config or 7777)
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Serve a built pattern library
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve (defaults to the configured output)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes)?;
        }
        Commands::List => {
            commands::list::run();
        }
        Commands::Render {
            block,
            attributes,
            inner,
            preview,
            class,
            style,
        } => {
            let options = commands::render::RenderOptions {
                block,
                attributes,
                inner,
                preview,
                class,
                style,
            };
            commands::render::run(&options)?;
        }
        Commands::Build {
            output,
            no_minify,
            preview,
        } => {
            let config = Config::load(&cli.config)?;
            commands::build::run(&config, output, no_minify, preview).await?;
        }
        Commands::Dev { port, no_open } => {
            let config = Config::load(&cli.config)?;
            commands::dev::run(&config, port, !no_open).await?;
        }
        Commands::Serve { port, dir } => {
            let config = Config::load(&cli.config)?;
            let dir = dir.unwrap_or_else(|| PathBuf::from(&config.patterns.output));
            commands::serve::run(&config.server.host, port, dir).await?;
        }
    }

    Ok(())
}
