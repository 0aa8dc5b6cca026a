use newsqa_core::config::EmbeddingConfig;
use newsqa_core::traits::EmbeddingProvider;
use newsqa_embed::{cosine_similarity, default_provider, HashEmbedder};

#[tokio::test]
async fn default_provider_without_endpoint_uses_reproducible_hash_vectors() {
    let config = EmbeddingConfig {
        dimension: 64,
        ..EmbeddingConfig::default()
    };
    let provider = default_provider(&config).expect("provider");
    assert_eq!(provider.dim(), 64);

    let a = provider.embed("LNG emission reduction").await.expect("embed");
    let b = provider.embed("LNG emission reduction").await.expect("embed");
    assert_eq!(a, b);
    assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn provider_stack_matches_raw_hash_embedder() {
    let config = EmbeddingConfig {
        dimension: 32,
        ..EmbeddingConfig::default()
    };
    let provider = default_provider(&config).expect("provider");
    let raw = HashEmbedder::new(32);

    let stacked = provider.embed("oil spill cleanup").await.expect("embed");
    assert_eq!(stacked, raw.embed_sync("oil spill cleanup"));
}

#[test]
fn distinct_texts_are_not_parallel() {
    let embedder = HashEmbedder::new(128);
    let a = embedder.embed_sync("sulfur oxide scrubber retrofit");
    let b = embedder.embed_sync("ballast water treatment convention");
    assert!(cosine_similarity(&a, &b) < 0.99);
}
