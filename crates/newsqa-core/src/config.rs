//! Configuration loading and path helpers.
//!
//! Figment merges built-in defaults, `config.toml`, an environment-specific
//! overlay, and `NEWSQA_*` environment variables. Every tunable the search
//! pipeline uses (fusion weights, score floors, caps, timeouts, bounds) is a
//! plain config field — tuned values, not derived invariants.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::matching::MatchPolicy;
use crate::types::CategoryAxis;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub embedding: EmbeddingConfig,
    pub generation: GenerationConfig,
    pub retrieval: RetrievalConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub news_dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            news_dir: "./dev_data/news".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub dimension: usize,
    /// Base URL of the embedding provider. Empty means the deterministic
    /// lexical-hash fallback is used from the start.
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub cache_capacity: usize,
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimension: 384,
            endpoint: String::new(),
            model: "text-embedding-3-small".to_string(),
            api_key: String::new(),
            cache_capacity: 2048,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Base URL of the generation backend. Empty means not configured and
    /// the synthesizer stays in templated mode.
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl GenerationConfig {
    pub fn is_configured(&self) -> bool {
        !self.base_url.trim().is_empty()
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            model: "qwen/qwen3-8b".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
            max_tokens: 512,
            temperature: 0.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub vector_score_floor: f32,
    pub category_score_floor: f32,
    /// Over-fetch multiplier for the category channel, leaving room to
    /// re-rank by category overlap.
    pub overfetch_factor: usize,
    pub similarity_weight: f32,
    pub category_weight: f32,
    /// Neutral base similarity substituted for filter-only candidates.
    pub neutral_base_similarity: f32,
    /// Cosine floor for embedding-similarity keyword extraction.
    pub keyword_similarity_floor: f32,
    /// Terms retained per axis from embedding-similarity extraction.
    pub keyword_top_per_axis: usize,
    pub timeout_secs: u64,
    pub match_policy: MatchPolicy,
    pub axis_weights: AxisWeights,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            vector_score_floor: 0.2,
            category_score_floor: 0.1,
            overfetch_factor: 2,
            similarity_weight: 0.6,
            category_weight: 0.4,
            neutral_base_similarity: 0.5,
            keyword_similarity_floor: 0.6,
            keyword_top_per_axis: 3,
            timeout_secs: 12,
            match_policy: MatchPolicy::default(),
            axis_weights: AxisWeights::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisWeights {
    pub theme: f32,
    pub pollution: f32,
    pub location: f32,
    pub time: f32,
}

impl AxisWeights {
    pub fn for_axis(&self, axis: CategoryAxis) -> f32 {
        match axis {
            CategoryAxis::Theme => self.theme,
            CategoryAxis::Pollution => self.pollution,
            CategoryAxis::Location => self.location,
            CategoryAxis::Time => self.time,
        }
    }
}

impl Default for AxisWeights {
    fn default() -> Self {
        Self {
            theme: 0.4,
            pollution: 0.3,
            location: 0.2,
            time: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Turns kept per session, oldest dropped on overflow.
    pub max_turns: usize,
    /// Sessions kept in the store, least-recently-used evicted.
    pub max_sessions: usize,
    /// Recent turns embedded into the grounding prompt.
    pub history_in_prompt: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_turns: 10,
            max_sessions: 512,
            history_in_prompt: 3,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("NEWSQA_").split("__"));

        let config: Config = figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.retrieval.top_k == 0 {
            return Err(Error::InvalidConfig("retrieval.top_k must be > 0".into()));
        }
        if self.retrieval.overfetch_factor == 0 {
            return Err(Error::InvalidConfig(
                "retrieval.overfetch_factor must be > 0".into(),
            ));
        }
        for (name, value) in [
            ("retrieval.vector_score_floor", self.retrieval.vector_score_floor),
            ("retrieval.category_score_floor", self.retrieval.category_score_floor),
            ("retrieval.similarity_weight", self.retrieval.similarity_weight),
            ("retrieval.category_weight", self.retrieval.category_weight),
            ("retrieval.neutral_base_similarity", self.retrieval.neutral_base_similarity),
            ("retrieval.keyword_similarity_floor", self.retrieval.keyword_similarity_floor),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        let blend = self.retrieval.similarity_weight + self.retrieval.category_weight;
        if blend <= 0.0 || blend > 1.0 + f32::EPSILON {
            return Err(Error::InvalidConfig(format!(
                "similarity_weight + category_weight must be in (0, 1], got {blend}"
            )));
        }
        if self.embedding.dimension == 0 {
            return Err(Error::InvalidConfig("embedding.dimension must be > 0".into()));
        }
        if self.session.max_turns == 0 || self.session.max_sessions == 0 {
            return Err(Error::InvalidConfig(
                "session bounds must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after
/// expansion. Absolute paths are returned as-is.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() {
        p
    } else {
        base.join(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = Config::default();
        config.validate().expect("default config is valid");
        assert_eq!(config.retrieval.top_k, 10);
        assert!((config.retrieval.axis_weights.theme - 0.4).abs() < f32::EPSILON);
        assert_eq!(config.session.max_turns, 10);
    }

    #[test]
    fn zero_top_k_rejected() {
        let mut config = Config::default();
        config.retrieval.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_floor_rejected() {
        let mut config = Config::default();
        config.retrieval.vector_score_floor = 1.3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn blend_weights_must_stay_in_unit_interval() {
        let mut config = Config::default();
        config.retrieval.similarity_weight = 0.9;
        config.retrieval.category_weight = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults_elsewhere() {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string("[retrieval]\ntop_k = 5\n"));
        let config: Config = figment.extract().expect("extract");
        assert_eq!(config.retrieval.top_k, 5);
        assert!((config.retrieval.similarity_weight - 0.6).abs() < f32::EPSILON);
        assert_eq!(config.embedding.dimension, 384);
    }

    #[test]
    fn axis_weight_lookup() {
        let weights = AxisWeights::default();
        assert!((weights.for_axis(CategoryAxis::Pollution) - 0.3).abs() < f32::EPSILON);
        assert!((weights.for_axis(CategoryAxis::Time) - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn expand_path_keeps_plain_relative_paths() {
        let p = expand_path("dev_data/news");
        assert_eq!(p, PathBuf::from("dev_data/news"));
        let resolved = resolve_with_base(Path::new("/base"), "dev_data/news");
        assert_eq!(resolved, PathBuf::from("/base/dev_data/news"));
    }
}
