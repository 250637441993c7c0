use anyhow::Result;
use axum::{extract::{Query, State}, http::StatusCode, response::{IntoResponse, Response}, routing::{get, post}, Json, Router};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use wikisearch_core::persist::{load_meta, IndexPaths};
use wikisearch_core::{DocId, Hit, RankingParams, SearchEngine, SearchError};

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub index_dir: PathBuf,
    /// Overrides `num_docs` from meta.json when set.
    pub num_docs: Option<u64>,
    pub ranking: RankingParams,
    pub query_timeout: Duration,
}

impl ServerConfig {
    pub fn new<P: Into<PathBuf>>(index_dir: P) -> Self {
        Self {
            index_dir: index_dir.into(),
            num_docs: None,
            ranking: RankingParams::default(),
            query_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
    pub query_timeout: Duration,
}

pub fn build_app(config: ServerConfig) -> Result<Router> {
    // Load every index structure once, before the listener exists
    let paths = IndexPaths::new(&config.index_dir);
    let mut ranking = config.ranking;
    ranking.num_docs = match config.num_docs {
        Some(n) => n,
        None => load_meta(&paths)?.num_docs,
    };
    let engine = SearchEngine::open(&config.index_dir, ranking)?;
    tracing::info!(
        index = %config.index_dir.display(),
        num_docs = engine.params().num_docs,
        titles = engine.titles().len(),
        anchor_index = engine.has_anchor_index(),
        pagerank_loaded = engine.pagerank_table().is_loaded(),
        pageviews_loaded = engine.pageviews_table().is_loaded(),
        "index loaded"
    );
    let state = AppState { engine: Arc::new(engine), query_timeout: config.query_timeout };
    Ok(router(state))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/search_body", get(search_body_handler))
        .route("/search_title", get(search_title_handler))
        .route("/search_anchor", get(search_anchor_handler))
        .route("/get_pagerank", post(pagerank_handler))
        .route("/get_pageview", post(pageview_handler))
        .with_state(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn cors_layer() -> CorsLayer {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let any = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                any
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => any,
    }
}

#[derive(Debug)]
pub enum ApiError {
    Search(SearchError),
    Internal(String),
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self { ApiError::Search(e) }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self { ApiError::Internal(e.to_string()) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::Search(SearchError::DeadlineExceeded) => {
                (StatusCode::GATEWAY_TIMEOUT, SearchError::DeadlineExceeded.to_string())
            }
            ApiError::Search(e) => {
                tracing::error!(error = %e, "query failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "query task failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, msg).into_response()
    }
}

type QueryFn = fn(&SearchEngine, &str, Option<Instant>) -> Result<Vec<Hit>, SearchError>;

/// Run one ranking mode on the blocking pool under the configured deadline.
async fn run_query(state: AppState, query: String, rank: QueryFn) -> Result<Json<Vec<Hit>>, ApiError> {
    if query.is_empty() {
        return Ok(Json(Vec::new()));
    }
    let deadline = Instant::now() + state.query_timeout;
    let engine = state.engine.clone();
    let hits = tokio::task::spawn_blocking(move || rank(&engine, &query, Some(deadline))).await??;
    Ok(Json(hits))
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<Vec<Hit>>, ApiError> {
    run_query(state, params.query, SearchEngine::search).await
}

pub async fn search_body_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<Vec<Hit>>, ApiError> {
    run_query(state, params.query, SearchEngine::search_body).await
}

pub async fn search_title_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<Vec<Hit>>, ApiError> {
    run_query(state, params.query, SearchEngine::search_title).await
}

pub async fn search_anchor_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<Vec<Hit>>, ApiError> {
    run_query(state, params.query, SearchEngine::search_anchor).await
}

pub async fn pagerank_handler(State(state): State<AppState>, Json(ids): Json<Vec<DocId>>) -> Json<Vec<f64>> {
    Json(state.engine.pagerank(&ids))
}

pub async fn pageview_handler(State(state): State<AppState>, Json(ids): Json<Vec<DocId>>) -> Json<Vec<u64>> {
    Json(state.engine.pageviews(&ids))
}
