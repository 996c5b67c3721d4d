use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Highest score either satisfaction question accepts
pub const MAX_SATISFACTION_SCORE: u8 = 5;

/// Rating submission body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatingRequest {
    pub system_satisfaction_score: Option<i64>,
    pub analytics_satisfaction_score: Option<i64>,
}

/// One satisfaction rating event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    pub id: Uuid,
    pub system_satisfaction_score: u8,
    pub analytics_satisfaction_score: u8,
    pub created_at: DateTime<Utc>,
}

/// Mean of each score across all ratings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RatingAverages {
    pub system_satisfaction_score: f64,
    pub analytics_satisfaction_score: f64,
}

impl RatingRequest {
    pub fn validate(self) -> AppResult<Rating> {
        Ok(Rating {
            id: Uuid::new_v4(),
            system_satisfaction_score: score(
                self.system_satisfaction_score,
                "system_satisfaction_score",
            )?,
            analytics_satisfaction_score: score(
                self.analytics_satisfaction_score,
                "analytics_satisfaction_score",
            )?,
            created_at: Utc::now(),
        })
    }
}

fn score(value: Option<i64>, field: &str) -> AppResult<u8> {
    let value = value.ok_or_else(|| AppError::missing_field(field))?;
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= MAX_SATISFACTION_SCORE)
        .ok_or_else(|| {
            AppError::Validation(format!(
                "{} must be between 0 and {}",
                field, MAX_SATISFACTION_SCORE
            ))
        })
}

impl RatingAverages {
    pub fn from_ratings(ratings: &[Rating]) -> Self {
        if ratings.is_empty() {
            return Self::default();
        }

        let count = ratings.len() as f64;
        let system: u32 = ratings
            .iter()
            .map(|r| u32::from(r.system_satisfaction_score))
            .sum();
        let analytics: u32 = ratings
            .iter()
            .map(|r| u32::from(r.analytics_satisfaction_score))
            .sum();

        Self {
            system_satisfaction_score: f64::from(system) / count,
            analytics_satisfaction_score: f64::from(analytics) / count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(system: u8, analytics: u8) -> Rating {
        RatingRequest {
            system_satisfaction_score: Some(i64::from(system)),
            analytics_satisfaction_score: Some(i64::from(analytics)),
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_scores_accept_full_range() {
        let low = rating(0, 0);
        let high = rating(5, 5);
        assert_eq!(low.system_satisfaction_score, 0);
        assert_eq!(high.analytics_satisfaction_score, 5);
    }

    #[test]
    fn test_out_of_range_score_is_rejected() {
        let err = RatingRequest {
            system_satisfaction_score: Some(6),
            analytics_satisfaction_score: Some(3),
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "system_satisfaction_score must be between 0 and 5"
        );

        let err = RatingRequest {
            system_satisfaction_score: Some(3),
            analytics_satisfaction_score: Some(-1),
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_missing_score_is_rejected() {
        let err = RatingRequest {
            system_satisfaction_score: Some(3),
            analytics_satisfaction_score: None,
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required field: analytics_satisfaction_score"
        );
    }

    #[test]
    fn test_averages() {
        let ratings = vec![rating(5, 2), rating(4, 3), rating(3, 4)];
        let averages = RatingAverages::from_ratings(&ratings);
        assert_eq!(averages.system_satisfaction_score, 4.0);
        assert_eq!(averages.analytics_satisfaction_score, 3.0);
    }

    #[test]
    fn test_averages_of_nothing_are_zero() {
        assert_eq!(RatingAverages::from_ratings(&[]), RatingAverages::default());
    }
}
