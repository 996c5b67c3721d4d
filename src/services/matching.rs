use serde::Serialize;

use crate::models::{Destination, PreferenceRecord, Suggestion};

/// Most suggestions a single request returns
pub const MAX_SUGGESTIONS: usize = 5;

/// Allowed distance between a destination's budget and the traveler's, as a fraction of
/// the traveler's budget
pub const BUDGET_TOLERANCE: f64 = 0.2;

pub const EXACT_MATCH_SCORE: f64 = 1.0;
pub const FALLBACK_SCORE: f64 = 0.8;

/// Which tier produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TierKind {
    Exact,
    Fallback,
}

impl std::fmt::Display for TierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TierKind::Exact => write!(f, "exact"),
            TierKind::Fallback => write!(f, "fallback"),
        }
    }
}

/// A match policy: destinations satisfying `predicate` are suggested with `score`
pub struct MatchTier {
    pub kind: TierKind,
    pub score: f64,
    pub predicate: fn(&Destination, &PreferenceRecord) -> bool,
}

/// Tiers in priority order; the first one yielding anything wins
pub const MATCH_TIERS: [MatchTier; 2] = [
    MatchTier {
        kind: TierKind::Exact,
        score: EXACT_MATCH_SCORE,
        predicate: exact_match,
    },
    MatchTier {
        kind: TierKind::Fallback,
        score: FALLBACK_SCORE,
        predicate: type_and_purpose_match,
    },
];

/// Outcome of running the tiers over a catalog
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Tier that produced the suggestions, `None` when nothing matched
    pub tier: Option<TierKind>,
    pub suggestions: Vec<Suggestion>,
}

/// Case-insensitive equality used for every category comparison
pub fn same_category(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}

/// Inclusive symmetric tolerance band around the traveler's budget
pub fn within_budget(destination_budget: f64, preferred_budget: f64) -> bool {
    (destination_budget - preferred_budget).abs() <= BUDGET_TOLERANCE * preferred_budget
}

fn type_and_purpose_match(destination: &Destination, preference: &PreferenceRecord) -> bool {
    same_category(&destination.destination_type, &preference.destination_type)
        && same_category(&destination.travel_purpose, &preference.travel_purpose)
}

fn exact_match(destination: &Destination, preference: &PreferenceRecord) -> bool {
    within_budget(destination.budget, preference.budget)
        && type_and_purpose_match(destination, preference)
        && same_category(&destination.travel_season, &preference.travel_season)
}

/// Runs `tiers` in order against `catalog`, returning the first non-empty result
///
/// Results keep catalog order and are capped at [`MAX_SUGGESTIONS`].
pub fn match_with_tiers(
    tiers: &[MatchTier],
    preference: &PreferenceRecord,
    catalog: &[Destination],
) -> MatchResult {
    for tier in tiers {
        let suggestions: Vec<Suggestion> = catalog
            .iter()
            .filter(|destination| (tier.predicate)(destination, preference))
            .take(MAX_SUGGESTIONS)
            .map(|destination| Suggestion::from_destination(destination, tier.score))
            .collect();

        if !suggestions.is_empty() {
            return MatchResult {
                tier: Some(tier.kind),
                suggestions,
            };
        }
    }

    MatchResult {
        tier: None,
        suggestions: Vec::new(),
    }
}

/// Matches a preference against the catalog with the standard tiers
pub fn match_destinations(preference: &PreferenceRecord, catalog: &[Destination]) -> MatchResult {
    match_with_tiers(&MATCH_TIERS, preference, catalog)
}
