//! Primary-then-fallback provider composition.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use newsqa_core::error::Result;
use newsqa_core::traits::EmbeddingProvider;

use crate::hash::HashEmbedder;

/// Tries the primary provider per call and degrades to the deterministic
/// lexical-hash vector when it is unreachable. The fallback is per-call, not
/// sticky: a recovered provider is used again on the next request.
pub struct FallbackEmbedder {
    primary: Option<Arc<dyn EmbeddingProvider>>,
    fallback: HashEmbedder,
    warned: AtomicBool,
}

impl FallbackEmbedder {
    pub fn new(primary: Option<Arc<dyn EmbeddingProvider>>, fallback: HashEmbedder) -> Self {
        Self {
            primary,
            fallback,
            warned: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for FallbackEmbedder {
    fn dim(&self) -> usize {
        self.fallback.dim()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(primary) = &self.primary {
            match primary.embed(text).await {
                Ok(vector) => return Ok(vector),
                Err(e) => {
                    if !self.warned.swap(true, Ordering::Relaxed) {
                        tracing::warn!("embedding provider unreachable, using lexical-hash fallback: {e}");
                    }
                }
            }
        }
        self.fallback.embed(text).await
    }
}
