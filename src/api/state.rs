//! Shared state for the HTTP API.

use crate::catalog::Catalog;
use crate::selection::Sampling;
use std::path::PathBuf;
use std::time::Instant;

/// State shared across all API handlers. Read-only once the server starts.
pub struct ApiState {
    pub catalog: Catalog,
    /// Root that `/api/gif/{*filename}` resolves against.
    pub media_root: PathBuf,
    pub sampling: Sampling,
    pub started_at: Instant,
}

impl ApiState {
    pub fn new(catalog: Catalog, media_root: PathBuf, sampling: Sampling) -> Self {
        Self {
            catalog,
            media_root,
            sampling,
            started_at: Instant::now(),
        }
    }
}
