//! Boolean filter tree evaluated by the similarity index.
//!
//! `All` / `Any` compose axis clauses the way a boolean query combines
//! must/should occurrences. Each leaf clause is internally disjunctive:
//! it holds if any of its terms matches the document on that axis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matching::MatchPolicy;
use crate::types::{NewsDocument, SearchFilters};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IndexFilter {
    All(Vec<IndexFilter>),
    Any(Vec<IndexFilter>),
    Theme(Vec<String>),
    Location(Vec<String>),
    Pollution(Vec<String>),
    TimeCategory(Vec<String>),
    PublishedBetween(DateTime<Utc>, DateTime<Utc>),
}

impl IndexFilter {
    /// AND-combined filter from caller-supplied structured constraints.
    /// Returns `None` when no constraint is present.
    pub fn from_search_filters(filters: &SearchFilters) -> Option<IndexFilter> {
        let mut clauses = Vec::new();
        if let Some(range) = filters.time_range {
            clauses.push(IndexFilter::PublishedBetween(range.start, range.end));
        }
        if !filters.locations.is_empty() {
            clauses.push(IndexFilter::Location(filters.locations.clone()));
        }
        if !filters.themes.is_empty() {
            clauses.push(IndexFilter::Theme(filters.themes.clone()));
        }
        match clauses.len() {
            0 => None,
            1 => clauses.pop(),
            _ => Some(IndexFilter::All(clauses)),
        }
    }

    pub fn matches(&self, doc: &NewsDocument, policy: MatchPolicy) -> bool {
        match self {
            IndexFilter::All(clauses) => clauses.iter().all(|c| c.matches(doc, policy)),
            IndexFilter::Any(clauses) => clauses.iter().any(|c| c.matches(doc, policy)),
            IndexFilter::Theme(terms) => terms.iter().any(|t| {
                policy.term_matches(t, &doc.theme)
                    || policy.matches_any(t, doc.categories.theme.iter().map(String::as_str))
            }),
            IndexFilter::Location(terms) => terms.iter().any(|t| {
                policy.matches_any(t, doc.locations.iter().map(String::as_str))
                    || policy.matches_any(t, doc.categories.location.iter().map(String::as_str))
            }),
            IndexFilter::Pollution(terms) => terms
                .iter()
                .any(|t| policy.matches_any(t, doc.categories.pollution.iter().map(String::as_str))),
            IndexFilter::TimeCategory(terms) => {
                terms.iter().any(|t| policy.term_matches(t, &doc.time_category))
            }
            IndexFilter::PublishedBetween(start, end) => match doc.publish_time {
                Some(ts) => ts >= *start && ts <= *end,
                None => false,
            },
        }
    }
}
