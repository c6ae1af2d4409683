//! In-memory catalog of GIFs available for selection.
//!
//! The catalog is built once at startup from the media root: files directly
//! under the root are safe, files under `nsfw/` are not. It is never mutated
//! while serving.

pub mod loader;
pub mod models;

pub use loader::{CatalogLoader, UNSAFE_SUBDIR, is_gif};
pub use models::{Catalog, Entry};
