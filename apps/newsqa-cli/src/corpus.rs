//! News corpus loading for the demo binaries.
//!
//! Reads `.json` files under a directory tree; each file holds one
//! `NewsDocument` or an array of them. Import/normalization proper is an
//! external concern — this is just enough to exercise the pipeline locally.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use newsqa_core::traits::{EmbeddingProvider, SimilarityIndex};
use newsqa_core::types::NewsDocument;

pub fn load_documents(dir: &Path) -> Result<Vec<NewsDocument>> {
    let mut documents = Vec::new();
    for path in list_json_files(dir) {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let mut parsed = parse_documents(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        documents.append(&mut parsed);
    }
    Ok(documents)
}

fn parse_documents(content: &str) -> Result<Vec<NewsDocument>> {
    if content.trim_start().starts_with('[') {
        Ok(serde_json::from_str(content)?)
    } else {
        Ok(vec![serde_json::from_str(content)?])
    }
}

fn list_json_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    files
}

/// Embed and upsert each document, with a progress bar for larger corpora.
pub async fn index_documents(
    index: Arc<dyn SimilarityIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    documents: Vec<NewsDocument>,
) -> Result<usize> {
    if documents.is_empty() {
        return Ok(0);
    }
    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} records {msg}")?
            .progress_chars("#>-"),
    );
    let mut indexed = 0usize;
    for document in documents {
        let vector = embedder.embed(&document.content).await?;
        index.upsert(document, vector).await?;
        indexed += 1;
        pb.set_position(indexed as u64);
    }
    pb.finish_with_message("done");
    Ok(indexed)
}
