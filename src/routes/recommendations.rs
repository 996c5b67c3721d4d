use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{PreferenceRequest, RecommendationResponse},
    routes::{extract::ApiJson, AppState},
    services::recommendations,
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    ApiJson(request): ApiJson<PreferenceRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        destination_type = ?request.destination_type,
        travel_purpose = ?request.travel_purpose,
        travel_season = ?request.travel_season,
        "Processing recommendation request"
    );

    let response =
        recommendations::submit(state.preferences.as_ref(), &state.catalog, request).await?;
    state.analytics.invalidate();

    tracing::info!(
        request_id = %request_id,
        preference_id = %response.saved_preference_id,
        count = response.recommendations.predictive.len(),
        "Recommendation request completed"
    );

    Ok(Json(response))
}

/// Handler listing saved preference records, newest first
pub async fn list_preferences(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    let preferences = state.preferences.list_preferences().await?;
    Ok(Json(json!({
        "status": "success",
        "preferences": preferences,
    })))
}
