use tokio::sync::RwLock;
use uuid::Uuid;

use super::{PreferenceRepository, RatingRepository};
use crate::{
    error::{AppError, AppResult},
    models::{PreferenceRecord, PrescriptiveSuggestion, Rating},
};

/// Process-local store used when no database is configured, and in tests
#[derive(Default)]
pub struct MemoryStore {
    preferences: RwLock<Vec<PreferenceRecord>>,
    ratings: RwLock<Vec<Rating>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PreferenceRepository for MemoryStore {
    async fn insert_preference(&self, record: &PreferenceRecord) -> AppResult<()> {
        self.preferences.write().await.push(record.clone());
        Ok(())
    }

    async fn attach_recommendations(
        &self,
        id: Uuid,
        recommendations: &[PrescriptiveSuggestion],
    ) -> AppResult<()> {
        let mut preferences = self.preferences.write().await;
        let record = preferences
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| AppError::NotFound(format!("preference {}", id)))?;
        record.recommendations = recommendations.to_vec();
        Ok(())
    }

    async fn list_preferences(&self) -> AppResult<Vec<PreferenceRecord>> {
        let mut records = self.preferences.read().await.clone();
        // stable sort keeps insertion order reversed for equal timestamps
        records.reverse();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

#[async_trait::async_trait]
impl RatingRepository for MemoryStore {
    async fn insert_rating(&self, rating: &Rating) -> AppResult<()> {
        self.ratings.write().await.push(rating.clone());
        Ok(())
    }

    async fn list_ratings(&self) -> AppResult<Vec<Rating>> {
        let mut ratings = self.ratings.read().await.clone();
        ratings.reverse();
        ratings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(ratings)
    }
}
