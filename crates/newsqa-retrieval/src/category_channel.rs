//! Category-taxonomy retrieval channel.
//!
//! Filter-driven rather than embedding-driven: the query's own vector is
//! only used for keyword extraction, never for ranking. Candidates come out
//! of the index's filter-only scan with an over-fetch margin and are
//! re-ranked by axis-weighted category overlap.

use std::sync::Arc;

use newsqa_core::config::RetrievalConfig;
use newsqa_core::error::Result;
use newsqa_core::filter::IndexFilter;
use newsqa_core::traits::{IndexHit, SimilarityIndex};
use newsqa_core::types::{
    clamp_score, CategoryAxis, CategoryMatch, NewsDocument, QueryKeywordSet, ScoredResult,
    SearchFilters, SearchType,
};

use crate::keywords::KeywordExtractor;

pub struct CategoryChannel {
    extractor: KeywordExtractor,
    index: Arc<dyn SimilarityIndex>,
    config: RetrievalConfig,
}

impl CategoryChannel {
    pub fn new(
        extractor: KeywordExtractor,
        index: Arc<dyn SimilarityIndex>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            extractor,
            index,
            config,
        }
    }

    /// Extracts category keywords, scans with a disjunctive filter, and
    /// re-ranks by overlap. Failures are absorbed to an empty sequence; an
    /// empty keyword set short-circuits without touching the index.
    pub async fn search_by_categories(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Vec<ScoredResult> {
        match self.try_search(query, filters).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("category search failed, returning empty result set: {e}");
                Vec::new()
            }
        }
    }

    async fn try_search(&self, query: &str, filters: &SearchFilters) -> Result<Vec<ScoredResult>> {
        let keywords = self.extractor.extract(query).await;
        if keywords.is_empty() {
            // No category signal to search on.
            return Ok(Vec::new());
        }

        let filter = build_filter(&keywords, filters);
        let fetch = self.config.top_k * self.config.overfetch_factor;
        let candidates = self.index.scan(&filter, fetch).await?;

        let mut results: Vec<ScoredResult> = candidates
            .into_iter()
            .map(|hit| self.score_candidate(hit, &keywords))
            .filter(|r| r.score >= self.config.category_score_floor)
            .collect();
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(self.config.top_k);
        Ok(results)
    }

    fn score_candidate(&self, hit: IndexHit, keywords: &QueryKeywordSet) -> ScoredResult {
        let policy = self.config.match_policy;
        let mut matched = 0usize;
        let mut weighted = 0.0f32;
        for axis in CategoryAxis::ALL {
            let terms = keywords.axis(axis);
            if terms.is_empty() {
                continue;
            }
            let labels = axis_labels(&hit.document, axis);
            let overlap = terms
                .iter()
                .filter(|t| policy.matches_any(t, labels.iter().copied()))
                .count();
            matched += overlap;
            weighted += overlap as f32 * self.config.axis_weights.for_axis(axis);
        }
        let category_score = weighted.min(1.0);

        // Scan hits carry no similarity; substitute the neutral base so the
        // blend stays fusion-comparable.
        let base = if hit.score > 0.0 {
            clamp_score(hit.score)
        } else {
            self.config.neutral_base_similarity
        };
        let score = clamp_score(
            self.config.similarity_weight * base + self.config.category_weight * category_score,
        );

        ScoredResult {
            document: hit.document,
            score,
            search_type: SearchType::Category,
            category_match: Some(CategoryMatch {
                score: category_score,
                matched_categories: matched,
            }),
        }
    }
}

/// Disjunctive filter over the non-empty axes, unioned with caller-supplied
/// location and time-range clauses as additional, separately evaluated
/// should-clauses.
fn build_filter(keywords: &QueryKeywordSet, filters: &SearchFilters) -> IndexFilter {
    let mut clauses = Vec::new();
    let terms = |axis: CategoryAxis| -> Vec<String> {
        keywords.axis(axis).iter().cloned().collect()
    };
    if !keywords.theme_categories.is_empty() {
        clauses.push(IndexFilter::Theme(terms(CategoryAxis::Theme)));
    }
    if !keywords.pollution_categories.is_empty() {
        clauses.push(IndexFilter::Pollution(terms(CategoryAxis::Pollution)));
    }
    if !keywords.location_categories.is_empty() {
        clauses.push(IndexFilter::Location(terms(CategoryAxis::Location)));
    }
    if !keywords.time_categories.is_empty() {
        clauses.push(IndexFilter::TimeCategory(terms(CategoryAxis::Time)));
    }
    if let Some(range) = filters.time_range {
        clauses.push(IndexFilter::PublishedBetween(range.start, range.end));
    }
    if !filters.locations.is_empty() {
        clauses.push(IndexFilter::Location(filters.locations.clone()));
    }
    IndexFilter::Any(clauses)
}

fn axis_labels(doc: &NewsDocument, axis: CategoryAxis) -> Vec<&str> {
    match axis {
        CategoryAxis::Theme => {
            let mut labels: Vec<&str> = doc.categories.theme.iter().map(String::as_str).collect();
            if !doc.theme.is_empty() {
                labels.push(doc.theme.as_str());
            }
            labels
        }
        CategoryAxis::Pollution => doc.categories.pollution.iter().map(String::as_str).collect(),
        CategoryAxis::Location => {
            let mut labels: Vec<&str> =
                doc.categories.location.iter().map(String::as_str).collect();
            labels.extend(doc.locations.iter().map(String::as_str));
            labels
        }
        CategoryAxis::Time => {
            if doc.time_category.is_empty() {
                Vec::new()
            } else {
                vec![doc.time_category.as_str()]
            }
        }
    }
}
