//! Embedding cache keyed by `(content hash, embedder id)`.
//!
//! Consulted prior to calling the provider and written through on misses.
//! The category channel re-embeds the same vocabulary terms on every query;
//! this keeps those lookups off the wire.

use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use newsqa_core::error::Result;
use newsqa_core::traits::EmbeddingProvider;

pub struct CachedEmbedder {
    provider: Arc<dyn EmbeddingProvider>,
    embedder_id: String,
    cache: Mutex<LruCache<String, Vec<f32>>>,
}

impl CachedEmbedder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, embedder_id: String, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            provider,
            embedder_id,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn key(&self, text: &str) -> String {
        format!("{}:{}", self.embedder_id, blake3::hash(text.as_bytes()).to_hex())
    }
}

#[async_trait]
impl EmbeddingProvider for CachedEmbedder {
    fn dim(&self) -> usize {
        self.provider.dim()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let key = self.key(text);
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(vector) = cache.get(&key) {
                return Ok(vector.clone());
            }
        }
        let vector = self.provider.embed(text).await?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(key, vector.clone());
        }
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingEmbedder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EmbeddingProvider for CountingEmbedder {
        fn dim(&self) -> usize {
            4
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1.0, 0.0, 0.0, 0.0])
        }
    }

    #[tokio::test]
    async fn repeated_text_hits_the_cache() {
        let counting = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
        });
        let cached = CachedEmbedder::new(counting.clone(), "test".into(), 8);

        cached.embed("emission").await.expect("embed");
        cached.embed("emission").await.expect("embed");
        cached.embed("spill").await.expect("embed");
        assert_eq!(counting.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn capacity_evicts_least_recently_used() {
        let counting = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
        });
        let cached = CachedEmbedder::new(counting.clone(), "test".into(), 1);

        cached.embed("a").await.expect("embed");
        cached.embed("b").await.expect("embed");
        cached.embed("a").await.expect("embed");
        assert_eq!(counting.calls.load(Ordering::SeqCst), 3);
    }
}
