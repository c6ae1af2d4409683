//! Startup scan of the media root.

use crate::catalog::models::{Catalog, Entry};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Subdirectory of the media root whose files are classified as unsafe.
pub const UNSAFE_SUBDIR: &str = "nsfw";

/// Scans the media root and its `nsfw` subdirectory for GIFs.
pub struct CatalogLoader {
    media_root: PathBuf,
}

impl CatalogLoader {
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
        }
    }

    /// Build the catalog. Either directory failing to list is an error; the
    /// server must not start with a partial catalog.
    pub fn load(&self) -> Result<Catalog> {
        let mut entries = self.scan_directory(&self.media_root, None, true)?;
        let unsafe_dir = self.media_root.join(UNSAFE_SUBDIR);
        entries.extend(self.scan_directory(&unsafe_dir, Some(UNSAFE_SUBDIR), false)?);

        let catalog = Catalog::new(entries);
        tracing::info!(
            root = %self.media_root.display(),
            safe_count = catalog.safe_count(),
            unsafe_count = catalog.unsafe_count(),
            "loaded gif catalog"
        );
        Ok(catalog)
    }

    fn scan_directory(&self, dir: &Path, prefix: Option<&str>, safe: bool) -> Result<Vec<Entry>> {
        let read_error = |source| Error::DirectoryRead {
            path: dir.to_path_buf(),
            source,
        };

        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(read_error)? {
            let path = entry.map_err(read_error)?.path();
            if path.is_dir() || !is_gif(&path) {
                continue;
            }

            match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => names.push(name.to_string()),
                None => {
                    tracing::warn!(path = %path.display(), "skipping gif with non-utf8 name");
                }
            }
        }

        // read_dir order is platform dependent
        names.sort();

        Ok(names
            .into_iter()
            .map(|name| {
                let relative_path = match prefix {
                    Some(prefix) => format!("{prefix}/{name}"),
                    None => name,
                };
                Entry::new(relative_path, safe)
            })
            .collect())
    }
}

/// Whether the path has a `.gif` extension, ignoring case.
pub fn is_gif(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gif"))
}
