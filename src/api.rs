//! HTTP API for the gif wall.
//!
//! Serves the embedded frontend assets, a JSON endpoint returning random
//! gif URLs, and the gif files themselves.

mod gifs;
mod server;
mod state;

pub use gifs::GifError;
pub use server::{router, serve, start_http_server};
pub use state::ApiState;
