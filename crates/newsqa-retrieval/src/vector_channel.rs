//! Dense-embedding retrieval channel.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use newsqa_core::config::RetrievalConfig;
use newsqa_core::error::{Error, Result};
use newsqa_core::filter::IndexFilter;
use newsqa_core::traits::{EmbeddingProvider, SimilarityIndex};
use newsqa_core::types::{clamp_score, ScoredResult, SearchFilters, SearchType};

use crate::expand::QueryExpander;

pub struct VectorChannel {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn SimilarityIndex>,
    expander: QueryExpander,
    config: RetrievalConfig,
}

impl VectorChannel {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn SimilarityIndex>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            index,
            expander: QueryExpander::new(),
            config,
        }
    }

    /// Similarity search with AND-combined structured filters. Backend
    /// failures are absorbed: logged and returned as an empty sequence.
    pub async fn search(&self, query: &str, filters: &SearchFilters) -> Vec<ScoredResult> {
        match self.try_search(query, filters).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("vector search failed, returning empty result set: {e}");
                Vec::new()
            }
        }
    }

    async fn try_search(&self, query: &str, filters: &SearchFilters) -> Result<Vec<ScoredResult>> {
        if query.trim().is_empty() {
            return Err(Error::MalformedInput("empty query".into()));
        }
        let vector = self.embedder.embed(query).await?;
        let filter = IndexFilter::from_search_filters(filters);
        let hits = self
            .index
            .query(
                &vector,
                filter.as_ref(),
                self.config.top_k,
                self.config.vector_score_floor,
            )
            .await?;
        Ok(hits
            .into_iter()
            .map(|hit| ScoredResult {
                score: clamp_score(hit.score),
                document: hit.document,
                search_type: SearchType::Vector,
                category_match: None,
            })
            .collect())
    }

    /// Runs the raw and the expanded query, merges by document identity
    /// keeping the higher score per duplicate, and sorts descending.
    pub async fn hybrid_search(&self, query: &str, filters: &SearchFilters) -> Vec<ScoredResult> {
        let expanded = self.expander.expand(query);
        let (raw, widened) = if expanded == query {
            (self.search(query, filters).await, Vec::new())
        } else {
            tokio::join!(self.search(query, filters), self.search(&expanded, filters))
        };

        let mut merged: Vec<ScoredResult> = Vec::new();
        let mut by_id: HashMap<String, usize> = HashMap::new();
        for result in raw.into_iter().chain(widened) {
            match by_id.entry(result.document.id.clone()) {
                Entry::Occupied(slot) => {
                    let existing = &mut merged[*slot.get()];
                    if result.score > existing.score {
                        *existing = result;
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(merged.len());
                    merged.push(result);
                }
            }
        }
        // sort_by is stable: equal scores keep raw-query insertion order
        merged.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        merged.truncate(self.config.top_k);
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use newsqa_core::traits::IndexHit;
    use newsqa_core::types::{DocumentCategories, NewsDocument};
    use newsqa_embed::HashEmbedder;
    use std::collections::BTreeSet;

    fn doc(id: &str) -> NewsDocument {
        NewsDocument {
            id: id.into(),
            title: format!("{id} title"),
            theme: String::new(),
            locations: vec![],
            keywords: BTreeSet::new(),
            categories: DocumentCategories::default(),
            time_category: String::new(),
            executor: String::new(),
            measure: String::new(),
            effect_data: String::new(),
            source_url: String::new(),
            publish_time: None,
            content: String::new(),
        }
    }

    fn hits(pairs: &[(&str, f32)]) -> Vec<IndexHit> {
        pairs
            .iter()
            .map(|(id, score)| IndexHit {
                id: (*id).to_string(),
                score: *score,
                document: doc(id),
            })
            .collect()
    }

    /// Serves one canned hit list for the raw query's vector and another for
    /// any other vector (the expanded query).
    struct CannedIndex {
        raw_vector: Vec<f32>,
        raw: Vec<(&'static str, f32)>,
        expanded: Vec<(&'static str, f32)>,
    }

    #[async_trait]
    impl SimilarityIndex for CannedIndex {
        async fn query(
            &self,
            vector: &[f32],
            _filter: Option<&IndexFilter>,
            _limit: usize,
            _score_floor: f32,
        ) -> Result<Vec<IndexHit>> {
            if vector == self.raw_vector.as_slice() {
                Ok(hits(&self.raw))
            } else {
                Ok(hits(&self.expanded))
            }
        }

        async fn scan(&self, _filter: &IndexFilter, _limit: usize) -> Result<Vec<IndexHit>> {
            Ok(Vec::new())
        }

        async fn upsert(&self, _document: NewsDocument, _vector: Vec<f32>) -> Result<()> {
            Ok(())
        }

        async fn delete(&self, _id: &str) -> Result<()> {
            Ok(())
        }

        async fn len(&self) -> Result<usize> {
            Ok(self.raw.len())
        }
    }

    struct FailingIndex;

    #[async_trait]
    impl SimilarityIndex for FailingIndex {
        async fn query(
            &self,
            _vector: &[f32],
            _filter: Option<&IndexFilter>,
            _limit: usize,
            _score_floor: f32,
        ) -> Result<Vec<IndexHit>> {
            Err(Error::BackendUnavailable("index offline".into()))
        }

        async fn scan(&self, _filter: &IndexFilter, _limit: usize) -> Result<Vec<IndexHit>> {
            Err(Error::BackendUnavailable("index offline".into()))
        }

        async fn upsert(&self, _document: NewsDocument, _vector: Vec<f32>) -> Result<()> {
            Ok(())
        }

        async fn delete(&self, _id: &str) -> Result<()> {
            Ok(())
        }

        async fn len(&self) -> Result<usize> {
            Ok(0)
        }
    }

    fn channel(index: Arc<dyn SimilarityIndex>) -> VectorChannel {
        VectorChannel::new(
            Arc::new(HashEmbedder::new(64)),
            index,
            RetrievalConfig::default(),
        )
    }

    #[tokio::test]
    async fn backend_failure_degrades_to_empty() {
        let channel = channel(Arc::new(FailingIndex));
        let results = channel.search("lng emission", &SearchFilters::default()).await;
        assert!(results.is_empty());
        let results = channel
            .hybrid_search("lng emission", &SearchFilters::default())
            .await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn empty_query_degrades_to_empty() {
        let channel = channel(Arc::new(CannedIndex {
            raw_vector: Vec::new(),
            raw: vec![("a", 0.9)],
            expanded: vec![],
        }));
        assert!(channel.search("  ", &SearchFilters::default()).await.is_empty());
    }

    #[tokio::test]
    async fn results_carry_vector_search_type_and_clamped_scores() {
        let raw_vector = HashEmbedder::new(64).embed_sync("xyz123");
        let channel = channel(Arc::new(CannedIndex {
            raw_vector,
            raw: vec![("a", 1.2), ("b", 0.4)],
            expanded: vec![],
        }));
        // "xyz123" has no expansion, so only the raw list is served.
        let results = channel.hybrid_search("xyz123", &SearchFilters::default()).await;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.search_type == SearchType::Vector));
        assert!(results[0].score <= 1.0);
    }

    #[tokio::test]
    async fn hybrid_search_dedups_by_id_keeping_the_higher_score() {
        let raw_vector = HashEmbedder::new(64).embed_sync("lng");
        let channel = channel(Arc::new(CannedIndex {
            raw_vector,
            raw: vec![("a", 0.5), ("b", 0.4)],
            expanded: vec![("a", 0.9), ("c", 0.3)],
        }));
        let results = channel.hybrid_search("lng", &SearchFilters::default()).await;
        let ids: Vec<&str> = results.iter().map(|r| r.document.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!((results[0].score - 0.9).abs() < f32::EPSILON);
    }
}
