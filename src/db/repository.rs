use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{PreferenceRecord, PrescriptiveSuggestion, Rating},
};

/// Storage for traveler preference records
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PreferenceRepository: Send + Sync {
    /// Stores a new record as submitted, before any matching
    async fn insert_preference(&self, record: &PreferenceRecord) -> AppResult<()>;

    /// Replaces the recommendations of a stored record
    async fn attach_recommendations(
        &self,
        id: Uuid,
        recommendations: &[PrescriptiveSuggestion],
    ) -> AppResult<()>;

    /// All stored records, newest first
    async fn list_preferences(&self) -> AppResult<Vec<PreferenceRecord>>;
}

/// Storage for satisfaction ratings
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RatingRepository: Send + Sync {
    async fn insert_rating(&self, rating: &Rating) -> AppResult<()>;

    /// All ratings, newest first
    async fn list_ratings(&self) -> AppResult<Vec<Rating>>;
}
