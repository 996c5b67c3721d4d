use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::RatingRequest,
    routes::{extract::ApiJson, AppState},
    services::ratings::{self, RatingSummary},
};

pub async fn submit_rating(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<RatingRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let rating = ratings::submit_rating(state.ratings.as_ref(), request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "rating": rating,
        })),
    ))
}

pub async fn list_ratings(State(state): State<Arc<AppState>>) -> AppResult<Json<RatingSummary>> {
    Ok(Json(ratings::summarize(state.ratings.as_ref()).await?))
}
