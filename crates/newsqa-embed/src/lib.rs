//! newsqa-embed
//!
//! Embedding provider bindings: the HTTP provider, the deterministic
//! lexical-hash fallback, and the content-hash cache that sits in front of
//! either. The raw embedding computation itself is an external capability;
//! everything here is plumbing around the `EmbeddingProvider` seam.

pub mod cache;
pub mod fallback;
pub mod hash;
pub mod http;

use std::sync::Arc;

use newsqa_core::config::EmbeddingConfig;
use newsqa_core::error::Result;
use newsqa_core::traits::EmbeddingProvider;

pub use cache::CachedEmbedder;
pub use fallback::FallbackEmbedder;
pub use hash::HashEmbedder;
pub use http::HttpEmbedder;

/// Build the default provider stack: HTTP primary (when an endpoint is
/// configured) degrading per-call to the lexical-hash fallback, fronted by
/// the content-hash cache.
pub fn default_provider(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let use_hash = std::env::var("NEWSQA_USE_HASH_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let (primary, embedder_id): (Option<Arc<dyn EmbeddingProvider>>, String) =
        if use_hash || config.endpoint.trim().is_empty() {
            tracing::info!("embedding provider: lexical-hash fallback only");
            (None, "lexical-hash-v1".to_string())
        } else {
            let http = HttpEmbedder::new(config)?;
            (Some(Arc::new(http)), config.model.clone())
        };

    let stacked = FallbackEmbedder::new(primary, HashEmbedder::new(config.dimension));
    Ok(Arc::new(CachedEmbedder::new(
        Arc::new(stacked),
        embedder_id,
        config.cache_capacity,
    )))
}

/// Cosine similarity of two equal-dimension vectors; 0.0 on mismatch or
/// zero-norm input.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
