//! Diagnostic query classification.
//!
//! Annotates responses with the channels most likely to have mattered for a
//! query. Explanatory output only; retrieval always runs both channels.

use newsqa_core::types::{QueryProfile, SearchType};

const TECHNICAL_TERMS: &[&str] = &[
    "technology",
    "technical",
    "equipment",
    "engine",
    "retrofit",
    "scrubber",
    "fuel",
    "lng",
    "hydrogen",
    "methanol",
    "battery",
    "propulsion",
    "system",
];

const GEOGRAPHIC_TERMS: &[&str] = &[
    "port", "harbor", "coastal", "river", "bay", "region", "shanghai", "ningbo", "shenzhen",
    "guangzhou", "qingdao", "tianjin", "hainan", "yangtze", "bohai",
];

const TEMPORAL_TERMS: &[&str] = &[
    "when", "year", "recent", "latest", "trend", "history", "2020", "2021", "2022", "2023",
    "2024", "2025",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct SearchStrategyAdvisor;

impl SearchStrategyAdvisor {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, query: &str) -> QueryProfile {
        let lower = query.to_lowercase();
        let hit = |terms: &[&str]| terms.iter().any(|t| lower.contains(t));

        let technical = hit(TECHNICAL_TERMS);
        let geographic = hit(GEOGRAPHIC_TERMS);
        let temporal = hit(TEMPORAL_TERMS);

        // Structured signal favors the category channel; the vector channel
        // is always in play.
        let mut favored_channels = vec![SearchType::Vector];
        if technical || geographic || temporal {
            favored_channels.push(SearchType::Category);
        }

        QueryProfile {
            technical,
            geographic,
            temporal,
            favored_channels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technical_query_is_flagged() {
        let profile = SearchStrategyAdvisor::new().classify("LNG engine retrofit options");
        assert!(profile.technical);
        assert!(profile.favored_channels.contains(&SearchType::Category));
    }

    #[test]
    fn geographic_and_temporal_signals() {
        let profile =
            SearchStrategyAdvisor::new().classify("recent pollution incidents near the Yangtze");
        assert!(profile.geographic);
        assert!(profile.temporal);
    }

    #[test]
    fn plain_query_favors_vector_only() {
        let profile = SearchStrategyAdvisor::new().classify("what happened last week");
        assert_eq!(profile.favored_channels, vec![SearchType::Vector]);
        assert!(!profile.technical);
    }
}
