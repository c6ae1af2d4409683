//! Gifwall: serves random selections from a local gif collection.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod selection;

pub use error::{Error, Result};
