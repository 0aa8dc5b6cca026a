//! HTTP embedding provider for OpenAI-style `/embeddings` endpoints.

use async_trait::async_trait;
use std::time::Duration;

use newsqa_core::config::EmbeddingConfig;
use newsqa_core::error::{Error, Result};
use newsqa_core::traits::EmbeddingProvider;

pub struct HttpEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    dim: usize,
}

impl HttpEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::BackendUnavailable(format!("http client: {e}")))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: Some(config.api_key.clone()).filter(|k| !k.is_empty()),
            dim: config.dimension,
        })
    }

    /// Resolve the embeddings endpoint from the configured base URL.
    fn embeddings_url(&self) -> String {
        let base = self.endpoint.trim_end_matches('/');
        if base.ends_with("/embeddings") {
            base.to_string()
        } else if base.ends_with("/v1") {
            format!("{base}/embeddings")
        } else {
            format!("{base}/v1/embeddings")
        }
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let body = serde_json::json!({
            "model": self.model,
            "input": text,
        });
        let mut req = self.client.post(self.embeddings_url()).json(&body);
        if let Some(key) = &self.api_key {
            req = req.header("Authorization", format!("Bearer {key}"));
        }

        let resp = req
            .send()
            .await
            .map_err(|e| Error::BackendUnavailable(format!("embedding request: {e}")))?;
        let status = resp.status();
        if matches!(status.as_u16(), 401 | 403 | 429) {
            return Err(Error::AuthOrQuota(format!("embedding backend: {status}")));
        }
        if !status.is_success() {
            return Err(Error::BackendUnavailable(format!(
                "embedding backend: {status}"
            )));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| Error::BackendUnavailable(format!("embedding response: {e}")))?;
        let values = json["data"]
            .get(0)
            .and_then(|d| d["embedding"].as_array())
            .ok_or_else(|| Error::BackendUnavailable("embedding response missing data".into()))?;
        let vector: Vec<f32> = values
            .iter()
            .filter_map(serde_json::Value::as_f64)
            .map(|v| v as f32)
            .collect();
        if vector.len() != self.dim {
            return Err(Error::BackendUnavailable(format!(
                "embedding dimension mismatch: expected {}, got {}",
                self.dim,
                vector.len()
            )));
        }
        Ok(vector)
    }
}
