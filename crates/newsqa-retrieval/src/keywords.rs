//! Per-query keyword extraction against the category vocabulary.
//!
//! Two matchers feed the same `QueryKeywordSet`: plain dictionary substring
//! matching, and embedding similarity against the vocabulary terms (floor
//! 0.6, top 3 per axis by default). Synonyms route matched domain terms into
//! their proper axis. An empty set across all axes means the query carries no
//! category signal; that is a valid result, not an error.

use std::sync::Arc;

use newsqa_core::config::RetrievalConfig;
use newsqa_core::traits::EmbeddingProvider;
use newsqa_core::types::{CategoryAxis, QueryKeywordSet};
use newsqa_embed::cosine_similarity;

use crate::vocabulary::CategoryVocabulary;

pub struct KeywordExtractor {
    vocabulary: CategoryVocabulary,
    embedder: Arc<dyn EmbeddingProvider>,
    similarity_floor: f32,
    top_per_axis: usize,
}

impl KeywordExtractor {
    pub fn new(
        vocabulary: CategoryVocabulary,
        embedder: Arc<dyn EmbeddingProvider>,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            vocabulary,
            embedder,
            similarity_floor: config.keyword_similarity_floor,
            top_per_axis: config.keyword_top_per_axis,
        }
    }

    pub async fn extract(&self, query: &str) -> QueryKeywordSet {
        let mut keywords = QueryKeywordSet::default();
        let lower = query.to_lowercase();

        for axis in CategoryAxis::ALL {
            for term in self.vocabulary.terms(axis) {
                if lower.contains(term.as_str()) {
                    keywords.axis_mut(axis).insert(term.clone());
                }
            }
        }

        for (term, axis, canonical) in self.vocabulary.synonyms() {
            if lower.contains(term) {
                keywords.axis_mut(axis).insert(canonical.to_string());
            }
        }

        self.extend_by_similarity(query, &mut keywords).await;
        keywords
    }

    /// Best effort: an unreachable embedder leaves the dictionary matches in
    /// place rather than failing extraction.
    async fn extend_by_similarity(&self, query: &str, keywords: &mut QueryKeywordSet) {
        let query_vec = match self.embedder.embed(query).await {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!("keyword similarity extraction skipped: {e}");
                return;
            }
        };

        for axis in CategoryAxis::ALL {
            let mut scored: Vec<(f32, &String)> = Vec::new();
            for term in self.vocabulary.terms(axis) {
                let term_vec = match self.embedder.embed(term).await {
                    Ok(v) => v,
                    Err(e) => {
                        tracing::debug!("keyword similarity extraction skipped: {e}");
                        return;
                    }
                };
                let similarity = cosine_similarity(&query_vec, &term_vec);
                if similarity >= self.similarity_floor {
                    scored.push((similarity, term));
                }
            }
            scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
            for (_, term) in scored.into_iter().take(self.top_per_axis) {
                keywords.axis_mut(axis).insert(term.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsqa_embed::HashEmbedder;

    // 256-dim keeps the hash buckets of the vocabulary tokens and the
    // nonsense query disjoint, so the no-signal case stays truly empty.
    fn extractor() -> KeywordExtractor {
        KeywordExtractor::new(
            CategoryVocabulary::default(),
            Arc::new(HashEmbedder::new(256)),
            &RetrievalConfig::default(),
        )
    }

    #[tokio::test]
    async fn dictionary_terms_land_on_their_axis() {
        let keywords = extractor().extract("LNG adoption in Shanghai during 2024").await;
        assert!(keywords.theme_categories.contains("lng"));
        assert!(keywords.location_categories.contains("shanghai"));
        assert!(keywords.time_categories.contains("2024"));
    }

    #[tokio::test]
    async fn synonyms_route_into_the_proper_axis() {
        let keywords = extractor().extract("how bad is the smog near the port").await;
        assert!(keywords.pollution_categories.contains("air pollution"));

        let keywords = extractor().extract("are battery ships viable").await;
        assert!(keywords.theme_categories.contains("electric vessel"));
    }

    #[tokio::test]
    async fn embedding_similarity_recovers_exact_vocabulary_terms() {
        // The hash embedder maps identical token bags to identical vectors,
        // so a query that is exactly a vocabulary term clears the 0.6 floor.
        let keywords = extractor().extract("shore power").await;
        assert!(keywords.theme_categories.contains("shore power"));
    }

    #[tokio::test]
    async fn no_signal_yields_an_empty_set() {
        let keywords = extractor().extract("xyz123").await;
        assert!(keywords.is_empty());
    }
}
