use std::path::PathBuf;

use clap::Parser;

use hearth::config::Config;
use hearth::server;

/// Minimal HTTP/1.1 file and smart-home server.
#[derive(Debug, Parser)]
#[command(name = "hearth", version)]
struct Cli {
    /// YAML configuration file (default: $HEARTH_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:8080
    #[arg(short, long)]
    listen: Option<String>,

    /// Directory static content is served from
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Log level or filter directive (RUST_LOG wins)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = match cli.config.as_deref() {
        Some(path) => Config::load_from(Some(path))?,
        None => Config::load()?,
    };
    if let Some(listen) = cli.listen {
        cfg.server.listen_addr = listen;
    }
    if let Some(root) = cli.root {
        cfg.content.root = root;
    }
    if let Some(level) = cli.log_level {
        cfg.logging.level = level;
    }
    cfg.validate()?;

    hearth::logging::init(&cfg.logging)?;

    tokio::select! {
        res = server::listener::run(&cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
