//! Structured logging.
//!
//! `RUST_LOG` takes precedence over the configured level. Per-connection
//! context is carried by spans opened in the listener rather than by any
//! global state.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

pub fn init(cfg: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))
}
