//! Server configuration.
//!
//! Layered from lowest to highest precedence: built-in defaults, an optional
//! TOML file, `GIFWALL_*` environment variables and plain `PORT`. CLI flags
//! are applied on top by the binary.

use crate::error::{Error, Result};
use crate::selection::Sampling;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_MEDIA_ROOT: &str = "gifs/gifs";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding safe GIFs, with unsafe ones under `nsfw/`.
    pub media_root: PathBuf,
    pub sampling: Sampling,
    /// Upper bound on handling a single request.
    pub request_timeout_secs: u64,
    /// How long a client may take to send request headers. Also closes
    /// keep-alive connections that sit idle waiting for the next request.
    pub read_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            media_root: PathBuf::from(DEFAULT_MEDIA_ROOT),
            sampling: Sampling::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    /// Load from the process environment and an optional config file.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        Self::load_from(config_file, std::env::vars().collect())
    }

    /// Load using the given variables in place of the process environment.
    pub fn load_from(config_file: Option<&Path>, env: HashMap<String, String>) -> Result<Self> {
        let defaults = Self::default();
        let port = env.get("PORT").filter(|port| !port.is_empty()).cloned();

        let mut builder = Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("media_root", DEFAULT_MEDIA_ROOT)?
            .set_default("sampling", "with_replacement")?
            .set_default(
                "request_timeout_secs",
                DEFAULT_REQUEST_TIMEOUT_SECS as i64,
            )?
            .set_default("read_timeout_secs", DEFAULT_READ_TIMEOUT_SECS as i64)?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("GIFWALL")
                    .source(Some(env.into_iter().collect()))
                    .try_parsing(true),
            )
            .set_override_option("port", port)?
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(|_| Error::InvalidAddress {
            host: self.host.clone(),
            port: self.port,
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}
