use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use uuid::Uuid;

use super::PrescriptiveSuggestion;
use crate::error::{AppError, AppResult};

/// Largest accepted trip budget
pub const MAX_BUDGET: f64 = 1_000_000_000_000.0;

/// Recommendation request body as received over the wire
///
/// Every field is optional here so that a missing value is reported as a validation
/// failure naming the field, instead of a generic deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PreferenceRequest {
    pub budget: Option<f64>,
    pub destination_type: Option<String>,
    pub travel_season: Option<String>,
    pub travel_purpose: Option<String>,
    pub municipality: Option<String>,
    pub group_type: Option<String>,
    pub number_of_people: Option<i64>,
    pub trip_duration: Option<i64>,
}

/// A validated traveler request, persisted once before matching and once after
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreferenceRecord {
    pub id: Uuid,
    pub budget: f64,
    pub destination_type: String,
    pub travel_season: String,
    pub travel_purpose: String,
    pub municipality: String,
    pub group_type: String,
    pub number_of_people: NonZeroU32,
    /// Trip length in days
    pub trip_duration: NonZeroU32,
    pub recommendations: Vec<PrescriptiveSuggestion>,
    pub created_at: DateTime<Utc>,
}

impl PreferenceRequest {
    /// Validates the request into a [`PreferenceRecord`] with no recommendations yet
    ///
    /// The category fields the matcher relies on are checked first, in the order
    /// destination type, purpose, season, budget.
    pub fn validate(self) -> AppResult<PreferenceRecord> {
        let destination_type = required_text(self.destination_type, "destination_type")?;
        let travel_purpose = required_text(self.travel_purpose, "travel_purpose")?;
        let travel_season = required_text(self.travel_season, "travel_season")?;

        let budget = self.budget.ok_or_else(|| AppError::missing_field("budget"))?;
        if !budget.is_finite() || budget <= 0.0 {
            return Err(AppError::Validation(
                "budget must be a positive number".to_string(),
            ));
        }
        if budget > MAX_BUDGET {
            return Err(AppError::Validation(format!(
                "budget must not exceed {}",
                MAX_BUDGET
            )));
        }

        let municipality = required_text(self.municipality, "municipality")?;
        let group_type = required_text(self.group_type, "group_type")?;
        let number_of_people = positive_count(self.number_of_people, "number_of_people")?;
        let trip_duration = positive_count(self.trip_duration, "trip_duration")?;

        Ok(PreferenceRecord {
            id: Uuid::new_v4(),
            budget,
            destination_type,
            travel_season,
            travel_purpose,
            municipality,
            group_type,
            number_of_people,
            trip_duration,
            recommendations: Vec::new(),
            created_at: Utc::now(),
        })
    }
}

fn required_text(value: Option<String>, field: &str) -> AppResult<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        _ => Err(AppError::missing_field(field)),
    }
}

fn positive_count(value: Option<i64>, field: &str) -> AppResult<NonZeroU32> {
    let value = value.ok_or_else(|| AppError::missing_field(field))?;
    u32::try_from(value)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| AppError::Validation(format!("{} must be a positive integer", field)))
}
