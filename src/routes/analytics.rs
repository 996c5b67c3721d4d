use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{error::AppResult, routes::AppState, services::Dimension};

async fn distribution(state: &AppState, dimension: Dimension) -> AppResult<Json<Value>> {
    let distribution = state.analytics.distribution(dimension).await?;
    Ok(Json(json!({
        "status": "success",
        "distribution": distribution,
    })))
}

pub async fn destination_types(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    distribution(&state, Dimension::DestinationType).await
}

pub async fn travel_seasons(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    distribution(&state, Dimension::TravelSeason).await
}

pub async fn municipalities(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    distribution(&state, Dimension::Municipality).await
}

pub async fn top_destinations(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    let destinations = state.analytics.top_destinations().await?;
    Ok(Json(json!({
        "status": "success",
        "destinations": destinations,
    })))
}
