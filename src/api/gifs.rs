//! Random gif listing and single gif serving.
//!
//! GET /api/gifs?safe=no&n=<int>
//!   - Returns `{ "urls": [...] }` with up to `n` (default 10) random gifs.
//!     Only safe gifs are returned unless `safe=no`.
//!
//! GET /api/gif/{*filename}
//!   - Serves a gif from the media root. Does not consult the catalog, so
//!     anything under the root (including `nsfw/`) is reachable.

use super::state::ApiState;
use crate::selection;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::path::Component;
use std::sync::Arc;

const DEFAULT_COUNT: i64 = 10;

/// One week.
const CACHE_CONTROL: &str = "public, max-age=604800";

/// Parameters of `/api/gifs`. Repeated keys keep their first value, and
/// `n` stays a string so a malformed value falls back to the default
/// instead of rejecting the request.
#[derive(Debug, Default, PartialEq, Eq)]
struct GifsQuery {
    safe: Option<String>,
    n: Option<String>,
}

impl GifsQuery {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "safe" => &mut query.safe,
                "n" => &mut query.n,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

#[derive(Serialize)]
pub(super) struct GifsResponse {
    urls: Vec<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Request errors from the single gif endpoint.
#[derive(Debug, thiserror::Error)]
pub enum GifError {
    #[error("Invalid filename")]
    InvalidFilename,
    #[error("File not found")]
    FileNotFound,
}

impl IntoResponse for GifError {
    fn into_response(self) -> Response {
        let status = match self {
            GifError::InvalidFilename => StatusCode::BAD_REQUEST,
            GifError::FileNotFound => StatusCode::NOT_FOUND,
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn requested_count(n: Option<&str>) -> usize {
    let n = n
        .and_then(|n| n.parse::<i64>().ok())
        .unwrap_or(DEFAULT_COUNT);
    usize::try_from(n).unwrap_or(0)
}

/// `/api/gif/<relative_path>` with each path segment percent-encoded.
fn gif_url(relative_path: &str) -> String {
    let encoded: Vec<_> = relative_path
        .split('/')
        .map(urlencoding::encode)
        .collect();
    format!("/api/gif/{}", encoded.join("/"))
}

/// GET /api/gifs?safe=no&n=<int>
pub(super) async fn list_gifs(
    State(state): State<Arc<ApiState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<GifsResponse> {
    let query = GifsQuery::from_pairs(pairs);
    let include_unsafe = query.safe.as_deref() == Some("no");
    let count = requested_count(query.n.as_deref());

    tracing::info!(
        safe = !include_unsafe,
        count = selection::effective_count(&state.catalog, include_unsafe, count),
        "handling random gifs"
    );

    let urls = selection::select(
        &state.catalog,
        include_unsafe,
        count,
        state.sampling,
        &mut rand::rng(),
    )
    .into_iter()
    .map(gif_url)
    .collect();

    Json(GifsResponse { urls })
}

/// GET /api/gif/ with no filename.
pub(super) async fn missing_gif_name() -> GifError {
    GifError::InvalidFilename
}

/// GET /api/gif/{*filename}
pub(super) async fn get_gif(
    State(state): State<Arc<ApiState>>,
    Path(filename): Path<String>,
) -> Result<Response, GifError> {
    tracing::debug!(%filename, "serving gif");

    if !filename.to_lowercase().ends_with(".gif") {
        return Err(GifError::InvalidFilename);
    }

    // Only plain segments: no `.`, `..`, empty segments or absolute paths.
    let relative = std::path::Path::new(&filename);
    let plain_segments = filename
        .split('/')
        .all(|segment| !matches!(segment, "" | "." | ".."));
    if !plain_segments
        || !relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
    {
        tracing::warn!(%filename, "rejected gif path outside media root");
        return Err(GifError::InvalidFilename);
    }

    let path = state.media_root.join(relative);
    match tokio::fs::metadata(&path).await {
        Ok(metadata) if metadata.is_file() => {}
        _ => return Err(GifError::FileNotFound),
    }

    let bytes = tokio::fs::read(&path).await.map_err(|error| {
        tracing::warn!(%error, path = %path.display(), "failed to read gif");
        GifError::FileNotFound
    })?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/gif"),
            (header::CACHE_CONTROL, CACHE_CONTROL),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_defaults_when_missing_or_malformed() {
        assert_eq!(requested_count(None), 10);
        assert_eq!(requested_count(Some("abc")), 10);
        assert_eq!(requested_count(Some("")), 10);
        assert_eq!(requested_count(Some("2.5")), 10);
    }

    #[test]
    fn count_parses_integers() {
        assert_eq!(requested_count(Some("3")), 3);
        assert_eq!(requested_count(Some("10000")), 10000);
        assert_eq!(requested_count(Some("-4")), 0);
    }

    #[test]
    fn urls_encode_each_segment() {
        assert_eq!(gif_url("cat.gif"), "/api/gif/cat.gif");
        assert_eq!(gif_url("nsfw/x.gif"), "/api/gif/nsfw/x.gif");
        assert_eq!(gif_url("dancing cat#2.gif"), "/api/gif/dancing%20cat%232.gif");
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn repeated_query_keys_keep_first_value() {
        let query = GifsQuery::from_pairs(pairs(&[
            ("n", "1"),
            ("safe", "no"),
            ("n", "2"),
            ("safe", "yes"),
            ("other", "x"),
        ]));

        assert_eq!(
            query,
            GifsQuery {
                safe: Some("no".into()),
                n: Some("1".into()),
            }
        );
        assert_eq!(GifsQuery::from_pairs(Vec::new()), GifsQuery::default());
    }

    #[test]
    fn errors_render_expected_messages() {
        assert_eq!(GifError::InvalidFilename.to_string(), "Invalid filename");
        assert_eq!(GifError::FileNotFound.to_string(), "File not found");
    }
}
