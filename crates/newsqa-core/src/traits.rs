//! Collaborator seams. Concrete protocols live behind these traits so the
//! core stays substitutable against any HTTP or local-call binding.

use async_trait::async_trait;

use crate::error::Result;
use crate::filter::IndexFilter;
use crate::types::NewsDocument;

/// Produces fixed-dimension embedding vectors for arbitrary text.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn dim(&self) -> usize;
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// A hit returned by the similarity index, carrying the indexed payload.
#[derive(Debug, Clone)]
pub struct IndexHit {
    pub id: String,
    pub score: f32,
    pub document: NewsDocument,
}

/// Query-time surface of the similarity index.
///
/// `upsert`/`delete` exist for the ingestion path and local test fixtures;
/// the retrieval core never calls them per request.
#[async_trait]
pub trait SimilarityIndex: Send + Sync {
    async fn query(
        &self,
        vector: &[f32],
        filter: Option<&IndexFilter>,
        limit: usize,
        score_floor: f32,
    ) -> Result<Vec<IndexHit>>;

    /// Filter-only retrieval for channels that do not rank by the query's
    /// own embedding. Bindings without a native scan API may emulate this
    /// with a constant anchor vector internally.
    async fn scan(&self, filter: &IndexFilter, limit: usize) -> Result<Vec<IndexHit>>;

    async fn upsert(&self, document: NewsDocument, vector: Vec<f32>) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;

    async fn len(&self) -> Result<usize>;
}

/// Text-generation collaborator.
///
/// Implementations must surface auth/quota rejections as
/// `Error::AuthOrQuota`, distinguishably from transient failures, so the
/// synthesizer can downgrade permanently instead of hammering a broken
/// credential on every request.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String>;
}
