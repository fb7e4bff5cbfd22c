//! HTTP routes for the ranking server

use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use ranking_core::{build_listing, is_valid_public_key, normalize_query, search, Listing, NodeRanking, SearchResult};

use crate::cache::CacheStatus;
use crate::error::{Result, ServerError};
use crate::metrics;
use crate::render::render_page;
use crate::state::{ServerStats, SharedState};

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub stats: ServerStats,
}

/// Page, view and search parameters shared by `/` and `/api/nodes`
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub page: Option<String>,
    pub view: Option<String>,
    pub search: Option<String>,
}

/// Search request parameters
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Search response
#[derive(Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub result: SearchResult,
    /// Whether the query looks like a well-formed public key
    pub key_format_valid: bool,
    /// Number of nodes searched
    pub searched: usize,
}

/// Rank range parameters
#[derive(Debug, Deserialize)]
pub struct RankRangeParams {
    pub start: u64,
    pub end: u64,
}

/// Refresh response
#[derive(Serialize, Deserialize)]
pub struct RefreshResult {
    pub node_count: usize,
    pub total_pages: u64,
    pub last_updated_at: String,
    pub refresh_duration_ms: u64,
}

/// Liveness probe
async fn live() -> &'static str {
    "ok"
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let stats = state.stats();
    let status = if stats.cache.cached { "ready" } else { "cold" };

    Json(HealthResponse {
        status: status.to_string(),
        stats,
    })
}

/// Server-rendered page; reads the dataset fresh on every request
async fn index(State(state): State<SharedState>, Query(params): Query<ListingParams>) -> Html<String> {
    metrics::record_request(metrics::ROUTE_PAGE);

    let dataset = state.load_uncached().await;
    let request = state.listing_request(params.page.as_deref(), params.view.as_deref(), params.search.as_deref());
    let listing = build_listing(&dataset, &request);
    if let Listing::Search { result, .. } = &listing {
        metrics::record_search(result.found);
    }

    Html(render_page(&listing, &request.search))
}

/// Full cached dataset
async fn dataset(State(state): State<SharedState>) -> Response {
    metrics::record_request(metrics::ROUTE_DATASET);
    let dataset = state.cache.get_or_load().await;
    Json(dataset.as_ref()).into_response()
}

/// Listing over the cached dataset
async fn nodes(State(state): State<SharedState>, Query(params): Query<ListingParams>) -> Json<Listing> {
    metrics::record_request(metrics::ROUTE_NODES);
    let dataset = state.cache.get_or_load().await;
    let request = state.listing_request(params.page.as_deref(), params.view.as_deref(), params.search.as_deref());
    Json(build_listing(&dataset, &request))
}

/// Public key lookup over the cached dataset
async fn search_node(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>> {
    metrics::record_request(metrics::ROUTE_SEARCH);
    let query = normalize_query(&params.q)
        .ok_or_else(|| ServerError::InvalidQuery("search query must not be blank".to_string()))?;

    let dataset = state.cache.get_or_load().await;
    let result = search(&dataset.entries, query);
    metrics::record_search(result.found);
    tracing::debug!(found = result.found, "Search completed");

    Ok(Json(SearchResponse {
        key_format_valid: is_valid_public_key(query),
        searched: dataset.node_count(),
        result,
    }))
}

/// Nodes whose explicit rank lies in `start..=end`
async fn rank_range(
    State(state): State<SharedState>,
    Query(params): Query<RankRangeParams>,
) -> Result<Json<Vec<NodeRanking>>> {
    metrics::record_request(metrics::ROUTE_RANK_RANGE);
    if params.start > params.end {
        return Err(ServerError::InvalidQuery(format!(
            "start {} is greater than end {}",
            params.start, params.end
        )));
    }
    let dataset = state.cache.get_or_load().await;
    Ok(Json(dataset.nodes_in_rank_range(params.start, params.end)))
}

/// Cache status
async fn cache_status(State(state): State<SharedState>) -> Json<CacheStatus> {
    Json(state.cache.status())
}

/// Drop the cached dataset and load it again
async fn refresh(State(state): State<SharedState>) -> Json<RefreshResult> {
    metrics::record_request(metrics::ROUTE_REFRESH);
    let start = Instant::now();
    tracing::info!("Refreshing dataset");

    let dataset = state.cache.refresh().await;
    let stats = dataset.stats();

    Json(RefreshResult {
        node_count: stats.node_count,
        total_pages: stats.total_pages,
        last_updated_at: stats.last_updated_at,
        refresh_duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Prometheus exposition
async fn prometheus(State(state): State<SharedState>) -> Result<Response> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| ServerError::Metrics("metrics are disabled".to_string()))?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], handle.render()).into_response())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/live", get(live))
        .route("/health", get(health))
        .route("/metrics", get(prometheus))
        .route("/api/ranking", get(dataset))
        .route("/api/nodes", get(nodes))
        .route("/api/search", get(search_node))
        .route("/api/rank-range", get(rank_range))
        .route("/api/cache", get(cache_status))
        .route("/api/refresh", post(refresh))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
