//! HTTP server
//!
//! Serves the visualization client and the normalized tree. `/data` only
//! answers requests carrying `X-Requested-With: DiskTreeApp`; its body is the
//! tree JSON, base64-encoded and optionally gzip-compressed.

use crate::error::ApiError;
use crate::scan::{scan_tree, Scanner};
use crate::tree::Node;
use axum::extract::State;
use axum::http::header::{ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{error, info, warn};

pub const CLIENT_HEADER: &str = "x-requested-with";
pub const CLIENT_HEADER_VALUE: &str = "DiskTreeApp";

const INDEX_HTML: &str = include_str!("../assets/index.html");
const STYLE_CSS: &str = include_str!("../assets/style.css");
const APP_JS: &str = include_str!("../assets/app.js");

/// Where `/data` gets its tree from.
#[derive(Debug, Clone)]
pub enum TreeSource {
    /// A tree built once at startup.
    Snapshot(Arc<Option<Node>>),
    /// Re-scan `dir` on every request.
    Rescan {
        scanner: Scanner,
        dir: PathBuf,
        max_depth: usize,
    },
}

#[derive(Debug)]
pub struct AppState {
    pub source: TreeSource,
}

impl AppState {
    pub fn snapshot(tree: Option<Node>) -> Self {
        Self {
            source: TreeSource::Snapshot(Arc::new(tree)),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/style.css", get(stylesheet))
        .route("/app.js", get(script))
        .route("/data", get(data))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn stylesheet() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/css")], STYLE_CSS)
}

async fn script() -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/javascript")], APP_JS)
}

async fn data(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let from_client = headers
        .get(CLIENT_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == CLIENT_HEADER_VALUE)
        .unwrap_or(false);
    if !from_client {
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    }

    let gzip = headers
        .get(ACCEPT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("gzip"))
        .unwrap_or(false);

    let encoded = match &state.source {
        TreeSource::Snapshot(tree) => {
            let tree: &Option<Node> = tree;
            encode_tree(tree.as_ref(), gzip)
        }
        TreeSource::Rescan {
            scanner,
            dir,
            max_depth,
        } => {
            // Dropping this future on client disconnect kills the scanner.
            match scan_tree(scanner, dir, *max_depth, std::future::pending()).await {
                Ok((tree, _)) => encode_tree(tree.as_ref(), gzip),
                Err(e) => {
                    error!(error = %e, "Rescan failed");
                    return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
                }
            }
        }
    };

    match encoded {
        Ok(body) => {
            let mut response = ([(CONTENT_TYPE, "text/plain")], body).into_response();
            if gzip {
                response
                    .headers_mut()
                    .insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
            }
            response
        }
        Err(e) => {
            error!(error = %e, "Error encoding data");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Encode a tree for `/data`: JSON, then base64, then optionally gzip.
///
/// An absent tree encodes as JSON `null`.
pub fn encode_tree(tree: Option<&Node>, gzip: bool) -> Result<Vec<u8>, ApiError> {
    let json = serde_json::to_vec(&tree)
        .map_err(|e| ApiError::Server(format!("Failed to serialize tree: {}", e)))?;
    let text = STANDARD.encode(json);
    if !gzip {
        return Ok(text.into_bytes());
    }
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes())?;
    Ok(encoder.finish()?)
}

/// Serve until `shutdown` resolves, then give in-flight requests `grace` to finish.
pub async fn serve<S>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: S,
    grace: Duration,
) -> Result<(), ApiError>
where
    S: Future<Output = ()>,
{
    let stop = Arc::new(Notify::new());
    let server = axum::serve(listener, router(state)).with_graceful_shutdown({
        let stop = Arc::clone(&stop);
        async move { stop.notified().await }
    });
    let mut handle = tokio::spawn(async move { server.await });

    tokio::select! {
        joined = &mut handle => return flatten(joined),
        _ = shutdown => {}
    }

    info!("Shutting down server...");
    stop.notify_one();
    match tokio::time::timeout(grace, &mut handle).await {
        Ok(joined) => flatten(joined),
        Err(_) => {
            warn!(grace_secs = grace.as_secs(), "Server forced to shutdown");
            handle.abort();
            Ok(())
        }
    }
}

fn flatten(
    joined: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Result<(), ApiError> {
    match joined {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(ApiError::Server(format!("listen: {}", e))),
        Err(e) => Err(ApiError::Server(format!("server task failed: {}", e))),
    }
}
