use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, types::Json, FromRow, PgPool};
use std::num::NonZeroU32;
use uuid::Uuid;

use super::{PreferenceRepository, RatingRepository};
use crate::{
    error::{AppError, AppResult},
    models::{PreferenceRecord, PrescriptiveSuggestion, Rating},
};

/// Creates a PostgreSQL connection pool and applies pending migrations
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// PostgreSQL-backed store for preferences and ratings
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PreferenceRow {
    id: Uuid,
    budget: f64,
    destination_type: String,
    travel_season: String,
    travel_purpose: String,
    municipality: String,
    group_type: String,
    number_of_people: i32,
    trip_duration: i32,
    recommendations: Json<Vec<PrescriptiveSuggestion>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PreferenceRow> for PreferenceRecord {
    type Error = AppError;

    fn try_from(row: PreferenceRow) -> Result<Self, Self::Error> {
        Ok(PreferenceRecord {
            id: row.id,
            budget: row.budget,
            destination_type: row.destination_type,
            travel_season: row.travel_season,
            travel_purpose: row.travel_purpose,
            municipality: row.municipality,
            group_type: row.group_type,
            number_of_people: stored_count(row.number_of_people, "number_of_people")?,
            trip_duration: stored_count(row.trip_duration, "trip_duration")?,
            recommendations: row.recommendations.0,
            created_at: row.created_at,
        })
    }
}

fn stored_count(value: i32, column: &str) -> AppResult<NonZeroU32> {
    u32::try_from(value)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| AppError::Internal(format!("stored {} out of range: {}", column, value)))
}

fn to_db_count(value: NonZeroU32, column: &str) -> AppResult<i32> {
    i32::try_from(value.get())
        .map_err(|_| AppError::Validation(format!("{} is too large", column)))
}

#[derive(FromRow)]
struct RatingRow {
    id: Uuid,
    system_satisfaction_score: i16,
    analytics_satisfaction_score: i16,
    created_at: DateTime<Utc>,
}

impl TryFrom<RatingRow> for Rating {
    type Error = AppError;

    fn try_from(row: RatingRow) -> Result<Self, Self::Error> {
        let score = |value: i16| {
            u8::try_from(value)
                .map_err(|_| AppError::Internal(format!("stored score out of range: {}", value)))
        };

        Ok(Rating {
            id: row.id,
            system_satisfaction_score: score(row.system_satisfaction_score)?,
            analytics_satisfaction_score: score(row.analytics_satisfaction_score)?,
            created_at: row.created_at,
        })
    }
}

#[async_trait::async_trait]
impl PreferenceRepository for PgStore {
    async fn insert_preference(&self, record: &PreferenceRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO travel_preferences (
                id, budget, destination_type, travel_season, travel_purpose,
                municipality, group_type, number_of_people, trip_duration,
                recommendations, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(record.id)
        .bind(record.budget)
        .bind(&record.destination_type)
        .bind(&record.travel_season)
        .bind(&record.travel_purpose)
        .bind(&record.municipality)
        .bind(&record.group_type)
        .bind(to_db_count(record.number_of_people, "number_of_people")?)
        .bind(to_db_count(record.trip_duration, "trip_duration")?)
        .bind(Json(&record.recommendations))
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn attach_recommendations(
        &self,
        id: Uuid,
        recommendations: &[PrescriptiveSuggestion],
    ) -> AppResult<()> {
        let result = sqlx::query("UPDATE travel_preferences SET recommendations = $1 WHERE id = $2")
            .bind(Json(recommendations))
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("preference {}", id)));
        }

        Ok(())
    }

    async fn list_preferences(&self) -> AppResult<Vec<PreferenceRecord>> {
        let rows: Vec<PreferenceRow> = sqlx::query_as(
            r#"
            SELECT id, budget, destination_type, travel_season, travel_purpose,
                   municipality, group_type, number_of_people, trip_duration,
                   recommendations, created_at
            FROM travel_preferences
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PreferenceRecord::try_from).collect()
    }
}

#[async_trait::async_trait]
impl RatingRepository for PgStore {
    async fn insert_rating(&self, rating: &Rating) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO ratings (id, system_satisfaction_score, analytics_satisfaction_score, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(rating.id)
        .bind(i16::from(rating.system_satisfaction_score))
        .bind(i16::from(rating.analytics_satisfaction_score))
        .bind(rating.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_ratings(&self) -> AppResult<Vec<Rating>> {
        let rows: Vec<RatingRow> = sqlx::query_as(
            r#"
            SELECT id, system_satisfaction_score, analytics_satisfaction_score, created_at
            FROM ratings
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Rating::try_from).collect()
    }
}
