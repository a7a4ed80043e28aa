//! HTTP handlers for the line daemon
//!
//! `GET /data?n=<dataset>&m=<line>` returns one line through the cache;
//! without `m` the whole dataset is streamed as-is.

use std::io;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use linecache::CachedLineLookup;
use linestore::Dataset;
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

/// Chunk size for whole-dataset responses (64 KiB)
const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Cached line lookup over the dataset directory
pub type LineLookup = CachedLineLookup<Dataset>;

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    lookup: Arc<LineLookup>,
}

impl AppState {
    pub fn new(lookup: Arc<LineLookup>) -> Self {
        Self { lookup }
    }
}

#[derive(Debug, Deserialize)]
struct DataQuery {
    n: Option<String>,
    m: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    cache_size: usize,
    cache_capacity: usize,
    hits: u64,
    misses: u64,
    inserts: u64,
    evictions: u64,
    hit_ratio: f64,
}

/// Request failures and the status each one maps to
#[derive(Debug)]
enum ApiError {
    MissingDataset,
    InvalidDataset(String),
    InvalidLine(String),
    FileNotFound,
    LineNotFound(u64),
    Unavailable(io::Error),
}

impl From<linestore::Error> for ApiError {
    fn from(err: linestore::Error) -> Self {
        match err {
            linestore::Error::NotFound(line) => ApiError::LineNotFound(line),
            linestore::Error::InvalidIdentifier(id) => ApiError::InvalidDataset(id),
            linestore::Error::SourceUnavailable(e) => ApiError::Unavailable(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MissingDataset => {
                (StatusCode::BAD_REQUEST, "Parameter n is required".to_string())
            }
            ApiError::InvalidDataset(id) => {
                (StatusCode::BAD_REQUEST, format!("Invalid dataset '{}'", id))
            }
            ApiError::InvalidLine(m) => (
                StatusCode::BAD_REQUEST,
                format!("Parameter m must be an integer, got '{}'", m),
            ),
            ApiError::FileNotFound => (StatusCode::NOT_FOUND, "File not found".to_string()),
            ApiError::LineNotFound(line) => {
                debug!(line, "line out of range");
                (StatusCode::NOT_FOUND, "Line not found".to_string())
            }
            ApiError::Unavailable(e) => {
                error!("Dataset unavailable: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };
        (status, message).into_response()
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/data", get(data_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn data_handler(
    State(state): State<AppState>,
    Query(query): Query<DataQuery>,
) -> Result<Response, ApiError> {
    let start = Instant::now();

    let id = query
        .n
        .filter(|n| !n.is_empty())
        .ok_or(ApiError::MissingDataset)?;

    let dataset = state.lookup.locator();
    if !dataset.exists(&id).await? {
        return Err(ApiError::FileNotFound);
    }

    match query.m.filter(|m| !m.is_empty()) {
        Some(m) => {
            let line: i64 = m.trim().parse().map_err(|_| ApiError::InvalidLine(m.clone()))?;
            // Lines are 1-indexed; anything below is simply out of range
            let line = u64::try_from(line).map_err(|_| ApiError::LineNotFound(0))?;

            let text = state.lookup.lookup(&id, line).await?;
            info!(
                dataset = %id,
                line,
                elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Served line"
            );
            Ok(text.into_response())
        }
        None => {
            let file = dataset.open(&id).await?;
            let body = Body::from_stream(ReaderStream::with_capacity(file, STREAM_CHUNK_SIZE));
            info!(
                dataset = %id,
                elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Streaming dataset"
            );
            Ok((
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                body,
            )
                .into_response())
        }
    }
}

async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let lookup = &state.lookup;
    let snap = lookup.stats().snapshot();
    Json(StatsResponse {
        cache_size: lookup.cache_len(),
        cache_capacity: lookup.capacity(),
        hits: snap.hits,
        misses: snap.misses,
        inserts: snap.inserts,
        evictions: snap.evictions,
        hit_ratio: snap.hit_ratio(),
    })
}

async fn health_handler() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn setup(capacity: usize) -> (TempDir, Arc<LineLookup>) {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("1.txt"), "L1\nL2\nL3\n").unwrap();
        let lookup = Arc::new(CachedLineLookup::new(Dataset::new(dir.path()), capacity));
        (dir, lookup)
    }

    async fn get(lookup: &Arc<LineLookup>, uri: &str) -> (StatusCode, String) {
        let app = router(AppState::new(lookup.clone()));
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_get_line() {
        let (_dir, lookup) = setup(10);

        assert_eq!(get(&lookup, "/data?n=1&m=2").await, (StatusCode::OK, "L2".to_string()));
    }

    #[tokio::test]
    async fn test_repeat_is_cache_hit() {
        let (_dir, lookup) = setup(10);

        get(&lookup, "/data?n=1&m=3").await;
        get(&lookup, "/data?n=1&m=3").await;

        assert_eq!(lookup.stats().misses(), 1);
        assert_eq!(lookup.stats().hits(), 1);
    }

    #[tokio::test]
    async fn test_line_out_of_range() {
        let (_dir, lookup) = setup(10);

        for uri in ["/data?n=1&m=4", "/data?n=1&m=0", "/data?n=1&m=-3"] {
            let (status, body) = get(&lookup, uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
            assert_eq!(body, "Line not found");
        }
        assert_eq!(lookup.cache_len(), 0);
    }

    #[tokio::test]
    async fn test_line_not_a_number() {
        let (_dir, lookup) = setup(10);

        let (status, _) = get(&lookup, "/data?n=1&m=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_dataset_param() {
        let (_dir, lookup) = setup(10);

        for uri in ["/data", "/data?m=1", "/data?n=&m=1"] {
            let (status, body) = get(&lookup, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body, "Parameter n is required");
        }
    }

    #[tokio::test]
    async fn test_unknown_dataset() {
        let (_dir, lookup) = setup(10);

        let (status, body) = get(&lookup, "/data?n=2&m=1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "File not found");
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let (_dir, lookup) = setup(10);

        let (status, _) = get(&lookup, "/data?n=..%2F1&m=1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stream_whole_file() {
        let (_dir, lookup) = setup(10);

        for uri in ["/data?n=1", "/data?n=1&m="] {
            let (status, body) = get(&lookup, uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, "L1\nL2\nL3\n");
        }
        // Streaming bypasses the cache entirely
        assert_eq!(lookup.stats().misses(), 0);
        assert_eq!(lookup.cache_len(), 0);
    }

    #[tokio::test]
    async fn test_stats() {
        let (_dir, lookup) = setup(2);

        get(&lookup, "/data?n=1&m=1").await;
        get(&lookup, "/data?n=1&m=2").await;
        get(&lookup, "/data?n=1&m=3").await;
        get(&lookup, "/data?n=1&m=3").await;

        let (status, body) = get(&lookup, "/stats").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["cache_size"], 2);
        assert_eq!(json["cache_capacity"], 2);
        assert_eq!(json["hits"], 1);
        assert_eq!(json["misses"], 3);
        assert_eq!(json["evictions"], 1);
    }

    #[tokio::test]
    async fn test_health() {
        let (_dir, lookup) = setup(10);

        assert_eq!(get(&lookup, "/health").await, (StatusCode::OK, "OK".to_string()));
    }
}
