use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use newsqa_core::error::Result;
use newsqa_core::filter::IndexFilter;
use newsqa_core::matching::MatchPolicy;
use newsqa_core::traits::{IndexHit, SimilarityIndex};
use newsqa_core::types::NewsDocument;
use newsqa_embed::cosine_similarity;

struct Entry {
    document: NewsDocument,
    vector: Vec<f32>,
}

/// Brute-force in-memory index. A BTreeMap keeps iteration (and therefore
/// scan order and equal-score ties) deterministic across runs.
pub struct MemoryIndex {
    entries: RwLock<BTreeMap<String, Entry>>,
    policy: MatchPolicy,
}

impl MemoryIndex {
    pub fn new(policy: MatchPolicy) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            policy,
        }
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new(MatchPolicy::default())
    }
}

#[async_trait]
impl SimilarityIndex for MemoryIndex {
    async fn query(
        &self,
        vector: &[f32],
        filter: Option<&IndexFilter>,
        limit: usize,
        score_floor: f32,
    ) -> Result<Vec<IndexHit>> {
        let entries = self.entries.read().await;
        let mut hits: Vec<IndexHit> = entries
            .values()
            .filter(|e| match filter {
                Some(f) => f.matches(&e.document, self.policy),
                None => true,
            })
            .map(|e| IndexHit {
                id: e.document.id.clone(),
                score: cosine_similarity(vector, &e.vector),
                document: e.document.clone(),
            })
            .filter(|hit| hit.score >= score_floor)
            .collect();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(limit);
        Ok(hits)
    }

    async fn scan(&self, filter: &IndexFilter, limit: usize) -> Result<Vec<IndexHit>> {
        let entries = self.entries.read().await;
        let hits = entries
            .values()
            .filter(|e| filter.matches(&e.document, self.policy))
            .take(limit)
            .map(|e| IndexHit {
                id: e.document.id.clone(),
                score: 0.0,
                document: e.document.clone(),
            })
            .collect();
        Ok(hits)
    }

    async fn upsert(&self, document: NewsDocument, vector: Vec<f32>) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(document.id.clone(), Entry { document, vector });
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.remove(id);
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries.read().await.len())
    }
}
