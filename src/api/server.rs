//! HTTP server setup: router, static file serving, and API routes.

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use rust_embed::Embed;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto::Builder;
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::gifs;
use super::state::ApiState;

/// Frontend assets compiled into the binary.
#[derive(Embed)]
#[folder = "public/"]
struct PublicAssets;

/// Build the application router.
pub fn router(state: Arc<ApiState>, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/gifs", get(gifs::list_gifs))
        .route("/gif/", get(gifs::missing_gif_name))
        .route("/gif/{*filename}", get(gifs::get_gif));

    Router::new()
        .nest("/api", api_routes)
        .fallback(static_handler)
        .layer(cors)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server on the given address.
///
/// Returns a handle that resolves when the server shuts down. The caller
/// passes a `tokio::sync::watch::Receiver<bool>` for graceful shutdown.
pub async fn start_http_server(
    bind: SocketAddr,
    state: Arc<ApiState>,
    request_timeout: Duration,
    read_timeout: Duration,
    shutdown_rx: tokio::sync::watch::Receiver<bool>,
) -> anyhow::Result<tokio::task::JoinHandle<()>> {
    let app = router(state, request_timeout);

    let listener = TcpListener::bind(bind).await?;
    tracing::info!(%bind, "HTTP server listening");

    Ok(tokio::spawn(serve(listener, app, read_timeout, shutdown_rx)))
}

/// Accept connections until shutdown is signalled, then drain the open ones.
///
/// Clients get `read_timeout` to send each request's headers; the same timer
/// closes keep-alive connections left idle between requests.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    read_timeout: Duration,
    mut shutdown_rx: tokio::sync::watch::Receiver<bool>,
) {
    let mut builder = Builder::new(TokioExecutor::new());
    builder
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(read_timeout);

    let graceful = GracefulShutdown::new();

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(error) => {
                    tracing::warn!(%error, "failed to accept connection");
                    continue;
                }
            },
            _ = shutdown_rx.wait_for(|v| *v) => break,
        };

        let service = TowerToHyperService::new(app.clone());
        let connection = builder
            .serve_connection_with_upgrades(TokioIo::new(stream), service)
            .into_owned();
        let connection = graceful.watch(connection);

        tokio::spawn(async move {
            if let Err(error) = connection.await {
                tracing::debug!(%error, %peer, "connection closed with error");
            }
        });
    }

    drop(listener);
    graceful.shutdown().await;
    tracing::info!("HTTP server stopped");
}

// -- API handlers --

async fn health(State(state): State<Arc<ApiState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "gifs": state.catalog.len(),
        "uptime_seconds": state.started_at.elapsed().as_secs(),
    }))
}

// -- Static file serving --

async fn static_handler(uri: Uri) -> Response {
    let path = match uri.path().trim_start_matches('/') {
        "" => "index.html",
        path => path,
    };

    match PublicAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref())],
                content.data,
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}
