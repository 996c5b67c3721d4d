use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    catalog, error::AppResult, middleware::request_id::RequestId, routes::AppState,
};

/// Handler returning every destination in the current catalog snapshot
pub async fn list_destinations(State(state): State<Arc<AppState>>) -> Json<Value> {
    let snapshot = state.catalog.snapshot().await;
    Json(json!({
        "status": "success",
        "destinations": snapshot.all(),
    }))
}

/// Handler that reloads the catalog from its configured source
///
/// The new snapshot replaces the old one in a single swap; if loading fails the
/// previous catalog stays in service.
pub async fn reload(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<Value>> {
    tracing::info!(
        request_id = %request_id,
        source = %state.catalog_source,
        "Reloading catalog"
    );

    let store = catalog::load(&state.catalog_source, &state.http_client).await?;
    let loaded = store.len();
    let previous = state.catalog.replace(store).await;

    tracing::info!(
        request_id = %request_id,
        previous = previous.len(),
        loaded,
        "Catalog replaced"
    );

    Ok(Json(json!({
        "status": "success",
        "destinations": loaded,
        "previous_destinations": previous.len(),
    })))
}
