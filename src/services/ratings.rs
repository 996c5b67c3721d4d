use serde::Serialize;

use crate::{
    db::RatingRepository,
    error::AppResult,
    models::{Rating, RatingAverages, RatingRequest},
};

/// All ratings with their averages, as shown on the satisfaction dashboard
#[derive(Debug, Serialize)]
pub struct RatingSummary {
    pub status: &'static str,
    pub ratings: Vec<Rating>,
    pub averages: RatingAverages,
    pub total_ratings: usize,
}

/// Validates and stores a satisfaction rating
pub async fn submit_rating(
    repository: &dyn RatingRepository,
    request: RatingRequest,
) -> AppResult<Rating> {
    let rating = request.validate()?;
    repository.insert_rating(&rating).await?;

    tracing::info!(
        rating_id = %rating.id,
        system = rating.system_satisfaction_score,
        analytics = rating.analytics_satisfaction_score,
        "Rating stored"
    );

    Ok(rating)
}

pub async fn summarize(repository: &dyn RatingRepository) -> AppResult<RatingSummary> {
    let ratings = repository.list_ratings().await?;
    let averages = RatingAverages::from_ratings(&ratings);

    Ok(RatingSummary {
        status: "success",
        total_ratings: ratings.len(),
        averages,
        ratings,
    })
}
