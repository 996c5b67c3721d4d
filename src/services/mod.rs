pub mod analytics;
pub mod budget;
pub mod matching;
pub mod ratings;
pub mod recommendations;

pub use analytics::{AnalyticsService, Dimension};
pub use matching::{match_destinations, MatchResult, TierKind};
pub use recommendations::{recommend, Recommendations};
