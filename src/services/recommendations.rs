use std::time::Instant;

use super::{budget, matching};
use crate::{
    catalog::CatalogHandle,
    db::PreferenceRepository,
    error::AppResult,
    models::{
        Destination, PreferenceRecord, PreferenceRequest, RecommendationResponse,
        RecommendationViews,
    },
    services::matching::TierKind,
};

pub const EXACT_MATCH_MESSAGE: &str = "Recommendations found.";
pub const FALLBACK_MESSAGE: &str = "No exact matches found. Showing similar destinations.";
pub const NO_MATCH_MESSAGE: &str = "No matches found. Please try different preferences.";

/// Result of one recommendation run
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendations {
    /// Tier that produced the suggestions, `None` when nothing matched
    pub tier: Option<TierKind>,
    pub views: RecommendationViews,
}

impl Recommendations {
    /// User-facing summary of how the suggestions were found
    pub fn message(&self) -> &'static str {
        match self.tier {
            Some(TierKind::Exact) => EXACT_MATCH_MESSAGE,
            Some(TierKind::Fallback) => FALLBACK_MESSAGE,
            None => NO_MATCH_MESSAGE,
        }
    }
}

/// Matches a validated preference against a catalog and builds both views
///
/// Pure: no I/O, nothing shared is modified.
pub fn recommend(preference: &PreferenceRecord, catalog: &[Destination]) -> Recommendations {
    let matched = matching::match_destinations(preference, catalog);
    let prescriptive = budget::annotate(&matched.suggestions, preference);

    Recommendations {
        tier: matched.tier,
        views: RecommendationViews {
            predictive: matched.suggestions,
            prescriptive,
        },
    }
}

/// Handles a recommendation request end to end
///
/// The request is validated before anything else happens, so an invalid request is never
/// stored. A valid one is stored as submitted, matched against the current catalog
/// snapshot, then updated with its prescriptive recommendations.
pub async fn submit(
    repository: &dyn PreferenceRepository,
    catalog: &CatalogHandle,
    request: PreferenceRequest,
) -> AppResult<RecommendationResponse> {
    let start = Instant::now();
    let preference = request.validate()?;

    repository.insert_preference(&preference).await?;
    tracing::debug!(preference_id = %preference.id, "Preference stored");

    let snapshot = catalog.snapshot().await;
    let recommendations = recommend(&preference, snapshot.all());

    repository
        .attach_recommendations(preference.id, &recommendations.views.prescriptive)
        .await?;

    tracing::info!(
        preference_id = %preference.id,
        tier = ?recommendations.tier,
        matched = recommendations.views.predictive.len(),
        catalog_size = snapshot.len(),
        processing_time_ms = start.elapsed().as_millis(),
        "Recommendations computed"
    );

    Ok(RecommendationResponse {
        status: "success",
        message: recommendations.message().to_string(),
        recommendations: recommendations.views,
        saved_preference_id: preference.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::CatalogStore,
        db::MockPreferenceRepository,
        error::AppError,
        services::matching::{EXACT_MATCH_SCORE, FALLBACK_SCORE, MAX_SUGGESTIONS},
    };
    use mockall::predicate::always;

    fn dahican() -> Destination {
        Destination::new("Dahican Beach", "beach", "relaxation", "summer", "Mati City", "5000", "")
            .unwrap()
    }

    fn request(kind: &str, season: &str) -> PreferenceRequest {
        PreferenceRequest {
            budget: Some(5200.0),
            destination_type: Some(kind.to_string()),
            travel_season: Some(season.to_string()),
            travel_purpose: Some("relaxation".to_string()),
            municipality: Some("Mati City".to_string()),
            group_type: Some("Friends".to_string()),
            number_of_people: Some(3),
            trip_duration: Some(4),
        }
    }

    #[test]
    fn test_exact_match_example() {
        let preference = request("beach", "summer").validate().unwrap();
        let result = recommend(&preference, &[dahican()]);

        assert_eq!(result.tier, Some(TierKind::Exact));
        assert_eq!(result.message(), EXACT_MATCH_MESSAGE);

        let predictive = &result.views.predictive;
        assert_eq!(predictive.len(), 1);
        assert_eq!(predictive[0].destination, "Dahican Beach");
        assert_eq!(predictive[0].similarity_score, EXACT_MATCH_SCORE);

        let prescriptive = &result.views.prescriptive;
        assert_eq!(prescriptive.len(), 1);
        assert_eq!(prescriptive[0].daily_budget, 1300.0);
        assert_eq!(prescriptive[0].total_budget, 5200.0);

        let json = serde_json::to_value(&prescriptive[0]).unwrap();
        assert_eq!(json["daily_budget"], "1300.00");
        assert_eq!(json["total_budget"], "5200.00");
    }

    #[test]
    fn test_season_mismatch_example() {
        let preference = request("beach", "rainy").validate().unwrap();
        let result = recommend(&preference, &[dahican()]);

        assert_eq!(result.tier, Some(TierKind::Fallback));
        assert_eq!(result.message(), FALLBACK_MESSAGE);
        assert_eq!(result.views.predictive[0].similarity_score, FALLBACK_SCORE);
        assert_eq!(
            result.views.prescriptive[0].suggestion.similarity_score,
            FALLBACK_SCORE
        );
    }

    #[test]
    fn test_no_match_example() {
        let preference = request("mountain", "summer").validate().unwrap();
        let result = recommend(&preference, &[dahican()]);

        assert_eq!(result.tier, None);
        assert_eq!(result.message(), NO_MATCH_MESSAGE);
        assert!(result.views.predictive.is_empty());
        assert!(result.views.prescriptive.is_empty());
    }

    #[test]
    fn test_views_have_equal_length_and_cap() {
        let catalog: Vec<Destination> = (0..12)
            .map(|i| {
                let season = if i % 2 == 0 { "summer" } else { "rainy" };
                Destination::new(&format!("Spot {}", i), "beach", "relaxation", season, "Mati City", "5,100", "")
                    .unwrap()
            })
            .collect();

        for season in ["summer", "rainy", "holiday"] {
            let preference = request("beach", season).validate().unwrap();
            let result = recommend(&preference, &catalog);
            assert!(result.views.predictive.len() <= MAX_SUGGESTIONS);
            assert_eq!(result.views.predictive.len(), result.views.prescriptive.len());
            for (bare, rich) in result.views.predictive.iter().zip(&result.views.prescriptive) {
                assert_eq!(bare.destination, rich.suggestion.destination);
            }
        }
    }

    #[tokio::test]
    async fn test_submit_stores_then_attaches_prescriptive_view() {
        let catalog = CatalogHandle::new(CatalogStore::new(vec![dahican()]));
        let mut repository = MockPreferenceRepository::new();
        let mut sequence = mockall::Sequence::new();

        repository
            .expect_insert_preference()
            .withf(|record| record.recommendations.is_empty() && record.budget == 5200.0)
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(()));
        repository
            .expect_attach_recommendations()
            .withf(|_, recommendations| {
                recommendations.len() == 1 && recommendations[0].daily_budget == 1300.0
            })
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Ok(()));

        let response = submit(&repository, &catalog, request("beach", "summer"))
            .await
            .unwrap();

        assert_eq!(response.status, "success");
        assert_eq!(response.message, EXACT_MATCH_MESSAGE);
        assert_eq!(response.recommendations.predictive.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_rejects_invalid_request_without_storing() {
        let catalog = CatalogHandle::new(CatalogStore::new(vec![dahican()]));
        let mut repository = MockPreferenceRepository::new();
        repository.expect_insert_preference().times(0);
        repository
            .expect_attach_recommendations()
            .with(always(), always())
            .times(0);

        let mut invalid = request("beach", "summer");
        invalid.budget = None;

        let err = submit(&repository, &catalog, invalid).await.unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: budget");
    }

    #[tokio::test]
    async fn test_submit_surfaces_storage_failure() {
        let catalog = CatalogHandle::new(CatalogStore::new(vec![dahican()]));
        let mut repository = MockPreferenceRepository::new();
        repository
            .expect_insert_preference()
            .returning(|_| Err(AppError::Internal("disk full".to_string())));
        repository.expect_attach_recommendations().times(0);

        let err = submit(&repository, &catalog, request("beach", "summer"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_submit_with_empty_catalog_is_successful() {
        let catalog = CatalogHandle::new(CatalogStore::new(Vec::new()));
        let mut repository = MockPreferenceRepository::new();
        repository.expect_insert_preference().returning(|_| Ok(()));
        repository
            .expect_attach_recommendations()
            .withf(|_, recommendations| recommendations.is_empty())
            .returning(|_, _| Ok(()));

        let response = submit(&repository, &catalog, request("beach", "summer"))
            .await
            .unwrap();
        assert_eq!(response.message, NO_MATCH_MESSAGE);
        assert!(response.recommendations.prescriptive.is_empty());
    }
}
