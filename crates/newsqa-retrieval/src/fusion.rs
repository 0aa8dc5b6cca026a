//! Score fusion across the two retrieval channels.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::Duration;

use newsqa_core::config::RetrievalConfig;
use newsqa_core::error::{Error, Result};
use newsqa_core::types::{ScoredResult, SearchFilters, SearchType};

use crate::category_channel::CategoryChannel;
use crate::vector_channel::VectorChannel;

/// Merge both channels' results into one ranked, deduplicated sequence.
///
/// Vector results are inserted first; a category result for an id already
/// present keeps `max(score)` and flips the tag to `Both`, carrying over the
/// category-overlap annotation. The sort is stable, so equal scores preserve
/// vector-channel insertion order.
pub fn fuse(
    vector_results: Vec<ScoredResult>,
    category_results: Vec<ScoredResult>,
    top_k: usize,
) -> Result<Vec<ScoredResult>> {
    if vector_results
        .iter()
        .chain(category_results.iter())
        .any(|r| !r.score.is_finite())
    {
        return Err(Error::Operation("non-finite score in channel output".into()));
    }

    let mut merged: Vec<ScoredResult> = Vec::new();
    let mut by_id: HashMap<String, usize> = HashMap::new();
    for result in vector_results {
        match by_id.entry(result.document.id.clone()) {
            Entry::Occupied(slot) => {
                let existing = &mut merged[*slot.get()];
                if result.score > existing.score {
                    existing.score = result.score;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(merged.len());
                merged.push(result);
            }
        }
    }
    for result in category_results {
        match by_id.entry(result.document.id.clone()) {
            Entry::Occupied(slot) => {
                let existing = &mut merged[*slot.get()];
                existing.score = existing.score.max(result.score);
                existing.search_type = SearchType::Both;
                if existing.category_match.is_none() {
                    existing.category_match = result.category_match;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(merged.len());
                merged.push(result);
            }
        }
    }

    merged.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    merged.truncate(top_k);
    Ok(merged)
}

/// Runs both channels concurrently and fuses their output. Channels absorb
/// their own failures, so neither can block the other beyond the shared
/// timeout; a timed-out channel contributes an empty sequence, the same as a
/// failed one.
pub struct EnhancedRetriever {
    vector: VectorChannel,
    category: CategoryChannel,
    config: RetrievalConfig,
}

impl EnhancedRetriever {
    pub fn new(vector: VectorChannel, category: CategoryChannel, config: RetrievalConfig) -> Self {
        Self {
            vector,
            category,
            config,
        }
    }

    pub fn vector_channel(&self) -> &VectorChannel {
        &self.vector
    }

    pub async fn enhanced_hybrid_search(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Vec<ScoredResult> {
        let deadline = Duration::from_secs(self.config.timeout_secs);
        let (vector_results, category_results) = tokio::join!(
            bounded("vector", deadline, self.vector.hybrid_search(query, filters)),
            bounded(
                "category",
                deadline,
                self.category.search_by_categories(query, filters)
            ),
        );

        match fuse(
            vector_results.clone(),
            category_results,
            self.config.top_k,
        ) {
            Ok(fused) => fused,
            Err(e) => {
                tracing::warn!("fusion failed, falling back to vector channel alone: {e}");
                let mut fallback = vector_results;
                fallback.retain(|r| r.score.is_finite());
                fallback.truncate(self.config.top_k);
                fallback
            }
        }
    }
}

async fn bounded<F>(channel: &str, deadline: Duration, fut: F) -> Vec<ScoredResult>
where
    F: std::future::Future<Output = Vec<ScoredResult>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(results) => results,
        Err(_) => {
            tracing::warn!("{channel} channel timed out after {deadline:?}, treating as empty");
            Vec::new()
        }
    }
}
