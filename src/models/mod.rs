use serde::{Deserialize, Serialize};

pub mod destination;
pub mod preference;
pub mod rating;

pub use destination::{parse_budget, CatalogRowError, Destination};
pub use preference::{PreferenceRecord, PreferenceRequest};
pub use rating::{Rating, RatingAverages, RatingRequest};

/// A catalog destination scored against one preference record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    pub destination: String,
    pub destination_type: String,
    pub travel_purpose: String,
    pub travel_season: String,
    pub municipality: String,
    pub packing_tips: String,
    /// Catalog budget as written in the source
    pub budget: String,
    pub similarity_score: f64,
}

impl Suggestion {
    pub fn from_destination(destination: &Destination, similarity_score: f64) -> Self {
        Self {
            destination: destination.name.clone(),
            destination_type: destination.destination_type.clone(),
            travel_purpose: destination.travel_purpose.clone(),
            travel_season: destination.travel_season.clone(),
            municipality: destination.municipality.clone(),
            packing_tips: destination.packing_tips.clone(),
            budget: destination.budget_label.clone(),
            similarity_score,
        }
    }
}

/// Suggestion annotated with the traveler's trip economics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptiveSuggestion {
    #[serde(flatten)]
    pub suggestion: Suggestion,
    #[serde(with = "two_decimals")]
    pub daily_budget: f64,
    #[serde(with = "two_decimals")]
    pub total_budget: f64,
    pub trip_duration: u32,
}

/// Both views of one match run; equal length and order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecommendationViews {
    pub predictive: Vec<Suggestion>,
    pub prescriptive: Vec<PrescriptiveSuggestion>,
}

/// Response body for a recommendation request
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub status: &'static str,
    pub message: String,
    pub recommendations: RecommendationViews,
    pub saved_preference_id: uuid::Uuid,
}

/// Count of one category value across saved preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DistributionEntry {
    pub name: String,
    pub value: u64,
}

/// How often a destination has been recommended
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopDestination {
    pub name: String,
    pub recommendations: u64,
}

/// Money amounts travel as strings with exactly two decimals ("1300.00")
mod two_decimals {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:.2}", value))
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Amount::deserialize(deserializer)? {
            Amount::Number(value) => Ok(value),
            Amount::Text(text) => text.trim().parse::<f64>().map_err(de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dahican() -> Destination {
        Destination::new(
            "Dahican Beach",
            "beach",
            "relaxation",
            "summer",
            "Mati City",
            "5,000",
            "",
        )
        .unwrap()
    }

    #[test]
    fn test_suggestion_copies_raw_budget() {
        let suggestion = Suggestion::from_destination(&dahican(), 1.0);
        assert_eq!(suggestion.destination, "Dahican Beach");
        assert_eq!(suggestion.budget, "5,000");
        assert_eq!(suggestion.similarity_score, 1.0);
    }

    #[test]
    fn test_prescriptive_suggestion_wire_shape() {
        let prescriptive = PrescriptiveSuggestion {
            suggestion: Suggestion::from_destination(&dahican(), 1.0),
            daily_budget: 1300.0,
            total_budget: 5200.0,
            trip_duration: 4,
        };

        let json = serde_json::to_value(&prescriptive).unwrap();
        assert_eq!(json["destination"], "Dahican Beach");
        assert_eq!(json["daily_budget"], "1300.00");
        assert_eq!(json["total_budget"], "5200.00");
        assert_eq!(json["trip_duration"], 4);
        assert_eq!(json["similarity_score"], 1.0);

        let back: PrescriptiveSuggestion = serde_json::from_value(json).unwrap();
        assert_eq!(back, prescriptive);
    }

    #[test]
    fn test_money_accepts_numeric_json() {
        let json = serde_json::json!({
            "destination": "Dahican Beach",
            "destination_type": "beach",
            "travel_purpose": "relaxation",
            "travel_season": "summer",
            "municipality": "Mati City",
            "packing_tips": "",
            "budget": "5,000",
            "similarity_score": 0.8,
            "daily_budget": 812.5,
            "total_budget": "3250.00",
            "trip_duration": 4
        });
        let parsed: PrescriptiveSuggestion = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.daily_budget, 812.5);
        assert_eq!(parsed.total_budget, 3250.0);
    }
}
