use anyhow::Result;
use axum::{extract::{Query, State}, http::{HeaderMap, StatusCode}, routing::{get, put}, Json, Router};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shelfscan_core::dataset::load_path;
use shelfscan_core::{Book, BookField, Corpus, FieldWeights, StemAlgorithm};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Hard cap on `limit`.
pub const MAX_LIMIT: usize = 100;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}
fn default_limit() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    /// Size of the collection; ranking never drops records.
    pub total: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub position: usize,
    pub score: f64,
    pub book: Book,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub records: usize,
    pub vocabulary: usize,
    pub stemmer: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Export file or directory loaded at startup; empty collection if unset.
    pub input: Option<PathBuf>,
    /// Field weight table; the default table if unset.
    pub weights: Option<PathBuf>,
    pub stemmer: StemAlgorithm,
    /// Token required in `X-ADMIN-TOKEN` to replace the collection.
    pub admin_token: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub corpus: Arc<RwLock<Corpus<Book>>>,
    pub admin_token: Option<String>,
}

pub fn build_app(config: ServerConfig) -> Result<Router> {
    let books: Vec<Book> = match &config.input {
        Some(path) => load_path(path)?,
        None => Vec::new(),
    };
    let weights = match &config.weights {
        Some(path) => FieldWeights::<BookField>::from_json_file(path)?,
        None => FieldWeights::default(),
    };
    let corpus = Corpus::with_algorithm(books, weights, config.stemmer);
    tracing::info!(records = corpus.len(), vocabulary = corpus.index().vocabulary_len(), "corpus ready");
    let app_state = AppState { corpus: Arc::new(RwLock::new(corpus)), admin_token: config.admin_token };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/stats", get(stats_handler))
        .route("/records", put(replace_records))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let limit = params.limit.clamp(1, MAX_LIMIT);
    let corpus = state.corpus.read();
    let results: Vec<SearchHit> = corpus
        .rank(params.q.trim())
        .into_iter()
        .enumerate()
        .skip(params.offset)
        .take(limit)
        .map(|(position, (book, score))| SearchHit { position, score, book: book.clone() })
        .collect();
    let total = corpus.len();
    drop(corpus);

    let elapsed = start.elapsed();
    tracing::debug!(query = %params.q, total, returned = results.len(), "search");
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total, results })
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let corpus = state.corpus.read();
    Json(StatsResponse {
        records: corpus.len(),
        vocabulary: corpus.index().vocabulary_len(),
        stemmer: corpus.index().algorithm().name(),
    })
}

/// Replace the whole collection; the index is rebuilt from scratch.
async fn replace_records(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(books): Json<Vec<Book>>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let (weights, algorithm) = {
        let current = state.corpus.read();
        (current.index().field_weights().clone(), current.index().algorithm())
    };
    // Build outside the lock so searches keep running against the old corpus.
    let rebuilt = Corpus::with_algorithm(books, weights, algorithm);
    let records = rebuilt.len();
    *state.corpus.write() = rebuilt;
    tracing::info!(records, "collection replaced");
    Ok(Json(serde_json::json!({ "records": records })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
