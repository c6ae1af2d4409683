//! Crate-wide error type.

use std::path::PathBuf;

/// Errors that abort startup. Request-time failures live in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read directory {}: {source}", .path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address {host}:{port}")]
    InvalidAddress { host: String, port: u16 },
}

pub type Result<T> = std::result::Result<T, Error>;
