use serde::{de::DeserializeOwned, Serialize};
use std::{collections::HashMap, future::Future, sync::Arc};

use crate::{
    cached,
    db::{Cache, CacheKey, PreferenceRepository},
    error::{AppError, AppResult},
    models::{DistributionEntry, PreferenceRecord, TopDestination},
};

/// How many destinations the top-destinations view lists
pub const TOP_DESTINATIONS_LIMIT: usize = 5;

/// Preference field a distribution is computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    DestinationType,
    TravelSeason,
    Municipality,
}

impl Dimension {
    fn cache_key(self) -> CacheKey {
        match self {
            Dimension::DestinationType => CacheKey::DestinationTypes,
            Dimension::TravelSeason => CacheKey::TravelSeasons,
            Dimension::Municipality => CacheKey::Municipalities,
        }
    }

    fn value(self, record: &PreferenceRecord) -> &str {
        match self {
            Dimension::DestinationType => &record.destination_type,
            Dimension::TravelSeason => &record.travel_season,
            Dimension::Municipality => &record.municipality,
        }
    }
}

/// Dashboard aggregates over saved preferences, cached in Redis when available
///
/// Cached views are dropped through [`AnalyticsService::invalidate`] whenever a
/// preference is saved, so the TTL only bounds staleness from other writers.
#[derive(Clone)]
pub struct AnalyticsService {
    repository: Arc<dyn PreferenceRepository>,
    cache: Option<Cache>,
    ttl_secs: u64,
}

impl AnalyticsService {
    pub fn new(
        repository: Arc<dyn PreferenceRepository>,
        cache: Option<Cache>,
        ttl_secs: u64,
    ) -> Self {
        Self {
            repository,
            cache,
            ttl_secs,
        }
    }

    /// Queues removal of every cached aggregate
    pub fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_in_background(&CacheKey::ALL);
        }
    }

    /// Number of saved preferences per value of `dimension`
    pub async fn distribution(&self, dimension: Dimension) -> AppResult<Vec<DistributionEntry>> {
        self.cached_or_compute(dimension.cache_key(), move || async move {
            let records = self.repository.list_preferences().await?;
            Ok::<_, AppError>(
                count_by(records.iter().map(|r| dimension.value(r)))
                    .into_iter()
                    .map(|(name, value)| DistributionEntry { name, value })
                    .collect::<Vec<_>>(),
            )
        })
        .await
    }

    /// Destinations that appear most often in saved recommendation lists
    pub async fn top_destinations(&self) -> AppResult<Vec<TopDestination>> {
        self.cached_or_compute(CacheKey::TopDestinations, move || async move {
            let records = self.repository.list_preferences().await?;
            let names = records
                .iter()
                .flat_map(|r| r.recommendations.iter())
                .map(|s| s.suggestion.destination.as_str());

            Ok::<_, AppError>(
                count_by(names)
                    .into_iter()
                    .take(TOP_DESTINATIONS_LIMIT)
                    .map(|(name, recommendations)| TopDestination {
                        name,
                        recommendations,
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .await
    }

    async fn cached_or_compute<T, F, Fut>(&self, key: CacheKey, compute: F) -> AppResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        match &self.cache {
            Some(cache) => cached!(cache, key, self.ttl_secs, compute()),
            None => compute().await,
        }
    }
}

/// Counts values case-insensitively, keeping the first spelling seen; sorted by count
/// descending, then name
fn count_by<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, u64)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, u64)> = Vec::new();

    for value in values {
        let position = *index.entry(value.to_lowercase()).or_insert_with(|| {
            counts.push((value.to_string(), 0));
            counts.len() - 1
        });
        counts[position].1 += 1;
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{create_redis_client, MemoryStore, MockPreferenceRepository},
        models::{Destination, PreferenceRequest, Suggestion},
        services::budget,
    };

    fn record(kind: &str, season: &str, municipality: &str, recommended: &[&str]) -> PreferenceRecord {
        let mut record = PreferenceRequest {
            budget: Some(2000.0),
            destination_type: Some(kind.to_string()),
            travel_season: Some(season.to_string()),
            travel_purpose: Some("relaxation".to_string()),
            municipality: Some(municipality.to_string()),
            group_type: Some("Family".to_string()),
            number_of_people: Some(4),
            trip_duration: Some(2),
        }
        .validate()
        .unwrap();

        let suggestions: Vec<Suggestion> = recommended
            .iter()
            .map(|name| {
                let destination =
                    Destination::new(name, kind, "relaxation", season, municipality, "2,000", "")
                        .unwrap();
                Suggestion::from_destination(&destination, 1.0)
            })
            .collect();
        record.recommendations = budget::annotate(&suggestions, &record);
        record
    }

    async fn service_with(records: Vec<PreferenceRecord>) -> AnalyticsService {
        let store = Arc::new(MemoryStore::new());
        for record in &records {
            store.insert_preference(record).await.unwrap();
        }
        AnalyticsService::new(store, None, 30)
    }

    #[test]
    fn test_count_by_groups_case_insensitively() {
        let counts = count_by(["Beach", "beach", "Mountain", "BEACH", "Cultural", "mountain"].into_iter());
        assert_eq!(
            counts,
            vec![
                ("Beach".to_string(), 3),
                ("Mountain".to_string(), 2),
                ("Cultural".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_count_by_breaks_ties_by_name() {
        let counts = count_by(["Nature", "Beach", "Island"].into_iter());
        let names: Vec<&str> = counts.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Beach", "Island", "Nature"]);
    }

    #[tokio::test]
    async fn test_distribution_per_dimension() {
        let service = service_with(vec![
            record("Beach", "Summer", "Mati City", &[]),
            record("Beach", "Rainy", "Cateel", &[]),
            record("Mountain", "Summer", "Mati City", &[]),
        ])
        .await;

        let types = service.distribution(Dimension::DestinationType).await.unwrap();
        assert_eq!(types[0], DistributionEntry { name: "Beach".to_string(), value: 2 });
        assert_eq!(types[1], DistributionEntry { name: "Mountain".to_string(), value: 1 });

        let seasons = service.distribution(Dimension::TravelSeason).await.unwrap();
        assert_eq!(seasons[0].name, "Summer");
        assert_eq!(seasons[0].value, 2);

        let municipalities = service.distribution(Dimension::Municipality).await.unwrap();
        assert_eq!(municipalities[0].name, "Mati City");
        assert_eq!(municipalities[0].value, 2);
    }

    #[tokio::test]
    async fn test_top_destinations_counts_recommendation_appearances() {
        let service = service_with(vec![
            record("Beach", "Summer", "Mati City", &["Dahican Beach", "Menzi Beach"]),
            record("Beach", "Summer", "Mati City", &["Dahican Beach"]),
            record("Island", "Summer", "Mati City", &["Pujada Island", "Waniban", "Sleeping Dinosaur", "Guang-guang", "Mayo Bay"]),
        ])
        .await;

        let top = service.top_destinations().await.unwrap();
        assert_eq!(top.len(), TOP_DESTINATIONS_LIMIT);
        assert_eq!(
            top[0],
            TopDestination {
                name: "Dahican Beach".to_string(),
                recommendations: 2
            }
        );
    }

    #[tokio::test]
    async fn test_empty_history_gives_empty_views() {
        let service = service_with(Vec::new()).await;
        assert!(service.distribution(Dimension::Municipality).await.unwrap().is_empty());
        assert!(service.top_destinations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_cache_falls_back_to_computing() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_preference(&record("Beach", "Summer", "Mati City", &["Dahican Beach"]))
            .await
            .unwrap();

        let client = create_redis_client("redis://127.0.0.1:1").unwrap();
        let (cache, _handle) = Cache::new(client);
        let service = AnalyticsService::new(store, Some(cache), 30);

        let types = service.distribution(Dimension::DestinationType).await.unwrap();
        assert_eq!(types, vec![DistributionEntry { name: "Beach".to_string(), value: 1 }]);

        service.invalidate();
        let top = service.top_destinations().await.unwrap();
        assert_eq!(top[0].name, "Dahican Beach");
    }

    #[tokio::test]
    async fn test_repository_errors_propagate() {
        let mut repository = MockPreferenceRepository::new();
        repository
            .expect_list_preferences()
            .returning(|| Err(AppError::Internal("down".to_string())));

        let service = AnalyticsService::new(Arc::new(repository), None, 30);
        assert!(service.top_destinations().await.is_err());
    }
}
