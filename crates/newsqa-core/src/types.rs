//! Domain types shared by the retrieval channels and the answer layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type DocId = String;

/// One news record, immutable per version.
///
/// - `id`: stable external identifier (the fusion dedup key)
/// - `theme`/`categories`: taxonomy labels attached by the ingestion pipeline
/// - `content`: flattened text the embedding vector was computed from
///
/// Documents are created and updated by an external ingestion process; this
/// core only reads them back out of the similarity index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsDocument {
    pub id: DocId,
    pub title: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub keywords: BTreeSet<String>,
    #[serde(default)]
    pub categories: DocumentCategories,
    #[serde(default)]
    pub time_category: String,
    #[serde(default)]
    pub executor: String,
    #[serde(default)]
    pub measure: String,
    #[serde(default)]
    pub effect_data: String,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub publish_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub content: String,
}

/// Per-axis category labels attached at indexing time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentCategories {
    #[serde(default)]
    pub theme: BTreeSet<String>,
    #[serde(default)]
    pub location: BTreeSet<String>,
    #[serde(default)]
    pub pollution: BTreeSet<String>,
}

/// Which retrieval channel produced a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    Vector,
    Category,
    Both,
}

/// One category dimension used for structured matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryAxis {
    Theme,
    Pollution,
    Location,
    Time,
}

impl CategoryAxis {
    pub const ALL: [CategoryAxis; 4] = [
        CategoryAxis::Theme,
        CategoryAxis::Pollution,
        CategoryAxis::Location,
        CategoryAxis::Time,
    ];
}

/// How well a candidate's category labels overlapped the query keywords.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CategoryMatch {
    /// Axis-weighted overlap, capped at 1.0.
    pub score: f32,
    /// Raw count of matched labels across all axes.
    pub matched_categories: usize,
}

/// A retrieval hit, produced fresh per query and never persisted.
///
/// `score` is a fusion-comparable value in `[0, 1]` even though the two
/// channels compute it differently (cosine similarity vs. weighted category
/// overlap). That is a deliberate, documented approximation, not a
/// unit-correct probability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredResult {
    pub document: NewsDocument,
    pub score: f32,
    pub search_type: SearchType,
    #[serde(default)]
    pub category_match: Option<CategoryMatch>,
}

/// Per-query keyword extraction output, one term set per axis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryKeywordSet {
    pub theme_categories: BTreeSet<String>,
    pub pollution_categories: BTreeSet<String>,
    pub location_categories: BTreeSet<String>,
    pub time_categories: BTreeSet<String>,
}

impl QueryKeywordSet {
    /// No signal on any axis. A valid empty result, not an error.
    pub fn is_empty(&self) -> bool {
        self.theme_categories.is_empty()
            && self.pollution_categories.is_empty()
            && self.location_categories.is_empty()
            && self.time_categories.is_empty()
    }

    pub fn axis(&self, axis: CategoryAxis) -> &BTreeSet<String> {
        match axis {
            CategoryAxis::Theme => &self.theme_categories,
            CategoryAxis::Pollution => &self.pollution_categories,
            CategoryAxis::Location => &self.location_categories,
            CategoryAxis::Time => &self.time_categories,
        }
    }

    pub fn axis_mut(&mut self, axis: CategoryAxis) -> &mut BTreeSet<String> {
        match axis {
            CategoryAxis::Theme => &mut self.theme_categories,
            CategoryAxis::Pollution => &mut self.pollution_categories,
            CategoryAxis::Location => &mut self.location_categories,
            CategoryAxis::Time => &mut self.time_categories,
        }
    }
}

/// Inclusive publish-time window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Structured constraints supplied alongside a query. Each field is
/// independently optional; the vector channel combines them with logical AND.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub time_range: Option<TimeRange>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub themes: Vec<String>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.time_range.is_none() && self.locations.is_empty() && self.themes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// Source reference shown to the user. Always derived from the ranked
/// results, independent of which degradation path produced the answer text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub id: DocId,
    pub title: String,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub publish_time: Option<DateTime<Utc>>,
    pub score: f32,
    pub search_type: SearchType,
}

impl Citation {
    pub fn from_result(result: &ScoredResult) -> Self {
        Self {
            id: result.document.id.clone(),
            title: result.document.title.clone(),
            source_url: result.document.source_url.clone(),
            publish_time: result.document.publish_time,
            score: result.score,
            search_type: result.search_type,
        }
    }
}

/// One entry in a session's bounded history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub sources: Option<Vec<Citation>>,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            sources: None,
        }
    }

    pub fn assistant(content: impl Into<String>, sources: Vec<Citation>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            sources: Some(sources),
        }
    }
}

/// Diagnostic classification of a query. Annotates which channels were most
/// relevant; never gates control flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryProfile {
    pub technical: bool,
    pub geographic: bool,
    pub temporal: bool,
    pub favored_channels: Vec<SearchType>,
}

/// Final response for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaResponse {
    pub session_id: String,
    pub answer: String,
    pub sources: Vec<Citation>,
    pub strategy: QueryProfile,
}

/// Clamp a channel score into the fusion-comparable `[0, 1]` range.
pub fn clamp_score(score: f32) -> f32 {
    score.clamp(0.0, 1.0)
}
