use axum::{
    extract::{OriginalUri, State},
    http::{Method, StatusCode},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    catalog::{CatalogHandle, CatalogSource},
    db::{Cache, PreferenceRepository, RatingRepository},
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::AnalyticsService,
};

pub mod analytics;
pub mod catalog;
pub mod extract;
pub mod ratings;
pub mod recommendations;

/// Shared application state
pub struct AppState {
    pub catalog: CatalogHandle,
    pub catalog_source: CatalogSource,
    pub http_client: reqwest::Client,
    pub preferences: Arc<dyn PreferenceRepository>,
    pub ratings: Arc<dyn RatingRepository>,
    pub analytics: AnalyticsService,
}

impl AppState {
    /// Wires one store into both repository roles
    pub fn new<S>(
        catalog: CatalogHandle,
        catalog_source: CatalogSource,
        http_client: reqwest::Client,
        store: Arc<S>,
        cache: Option<Cache>,
        analytics_ttl_secs: u64,
    ) -> Self
    where
        S: PreferenceRepository + RatingRepository + 'static,
    {
        let preferences: Arc<dyn PreferenceRepository> = store.clone();
        let ratings: Arc<dyn RatingRepository> = store;

        Self {
            catalog,
            catalog_source,
            http_client,
            analytics: AnalyticsService::new(preferences.clone(), cache, analytics_ttl_secs),
            preferences,
            ratings,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/destinations", get(catalog::list_destinations))
        .route("/catalog/reload", post(catalog::reload))
        .route(
            "/recommendations",
            post(recommendations::recommend),
        )
        .route("/preferences", get(recommendations::list_preferences))
        .route(
            "/ratings",
            get(ratings::list_ratings).post(ratings::submit_rating),
        )
        .route("/destination-types", get(analytics::destination_types))
        .route("/travel-seasons", get(analytics::travel_seasons))
        .route("/municipalities", get(analytics::municipalities))
        .route("/top-destinations", get(analytics::top_destinations))
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let snapshot = state.catalog.snapshot().await;
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "destinations": snapshot.len(),
            "catalog_loaded_at": snapshot.loaded_at(),
        })),
    )
}

async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> (StatusCode, Json<Value>) {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    tracing::debug!(%method, path, "Route not found");
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "error",
            "message": format!("Not Found: {} {}", method, path),
        })),
    )
}
