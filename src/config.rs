//! Server configuration.
//!
//! Loaded from an optional YAML file, then overridden from the environment.
//! Every field has a default, so an empty file (or no file) is valid.
//!
//! ```yaml
//! server:
//!   listen_addr: "0.0.0.0:8443"
//!   backlog: 10
//! tls:
//!   cert_path: "certs/server.crt"
//!   key_path: "certs/server.key"
//! content:
//!   root: "root"
//! framing:
//!   inactivity_timeout_ms: 2000
//!   read_buffer_size: 4096
//! smarthome:
//!   prefix: "/smarthome/"
//!   directory: "devices.json"
//! logging:
//!   level: "info"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::http::framer::{DEFAULT_READ_BUFFER_SIZE, FramingConfig};

/// Names the config file to load.
pub const CONFIG_ENV: &str = "HEARTH_CONFIG";
/// Overrides `server.listen_addr`.
pub const LISTEN_ENV: &str = "LISTEN";
/// Overrides `content.root`.
pub const CONTENT_ROOT_ENV: &str = "CONTENT_ROOT";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub tls: Option<TlsConfig>,
    pub content: ContentConfig,
    pub framing: FramingSettings,
    pub smarthome: Option<SmartHomeConfig>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub backlog: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            backlog: 10,
        }
    }
}

/// Certificate chain and private key, both PEM. Present means TLS is on.
#[derive(Debug, Clone, Deserialize)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub root: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("root"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FramingSettings {
    pub inactivity_timeout_ms: u64,
    pub read_buffer_size: usize,
}

impl Default for FramingSettings {
    fn default() -> Self {
        Self {
            inactivity_timeout_ms: 2000,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

impl FramingSettings {
    pub fn to_framing_config(&self) -> FramingConfig {
        FramingConfig {
            inactivity_timeout: Duration::from_millis(self.inactivity_timeout_ms),
            read_buffer_size: self.read_buffer_size,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmartHomeConfig {
    pub prefix: String,
    pub directory: PathBuf,
}

impl Default for SmartHomeConfig {
    fn default() -> Self {
        Self {
            prefix: "/smarthome/".to_string(),
            directory: PathBuf::from("devices.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads from `HEARTH_CONFIG` if set, else defaults, then applies
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::load_from(path.as_deref())
    }

    /// Like [`Config::load`], with an explicit file taking the place of
    /// `HEARTH_CONFIG`.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var(LISTEN_ENV) {
            cfg.server.listen_addr = listen_addr;
        }
        if let Some(root) = std::env::var_os(CONTENT_ROOT_ENV) {
            cfg.content.root = PathBuf::from(root);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        let cfg: Config = serde_yaml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.listen_addr.is_empty() {
            bail!("server.listen_addr must not be empty");
        }
        if self.server.backlog == 0 {
            bail!("server.backlog must be greater than zero");
        }
        if self.framing.inactivity_timeout_ms == 0 {
            bail!("framing.inactivity_timeout_ms must be greater than zero");
        }
        if self.framing.read_buffer_size == 0 {
            bail!("framing.read_buffer_size must be greater than zero");
        }
        if let Some(smarthome) = &self.smarthome {
            if smarthome.prefix.is_empty() {
                bail!("smarthome.prefix must not be empty");
            }
        }
        Ok(())
    }

    pub fn tls_enabled(&self) -> bool {
        self.tls.is_some()
    }
}
