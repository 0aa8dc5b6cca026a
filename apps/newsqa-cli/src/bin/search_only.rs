use std::env;
use std::sync::Arc;

use newsqa_cli::corpus;
use newsqa_core::config::{expand_path, Config};
use newsqa_core::types::{SearchFilters, SearchType};
use newsqa_embed::default_provider;
use newsqa_index::MemoryIndex;
use newsqa_retrieval::{
    CategoryChannel, CategoryVocabulary, EnhancedRetriever, KeywordExtractor, VectorChannel,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <query> [news_dir]", args[0]);
        eprintln!("Example: {} 'lng emission reduction' ./dev_data/news", args[0]);
        std::process::exit(1);
    }
    let query = &args[1];

    let config = Config::load()?;
    let news_dir = args
        .get(2)
        .map(expand_path)
        .unwrap_or_else(|| expand_path(&config.data.news_dir));

    println!("🔍 newsqa-search-only");
    println!("=====================");
    println!("Query: {query}");
    println!("News directory: {}", news_dir.display());

    let embedder = default_provider(&config.embedding)?;
    let index = Arc::new(MemoryIndex::new(config.retrieval.match_policy));
    let documents = corpus::load_documents(&news_dir)?;
    let indexed = corpus::index_documents(index.clone(), embedder.clone(), documents).await?;
    println!("📊 Indexed {indexed} news records");

    let retrieval = config.retrieval.clone();
    let vector = VectorChannel::new(embedder.clone(), index.clone(), retrieval.clone());
    let extractor = KeywordExtractor::new(CategoryVocabulary::default(), embedder, &retrieval);
    let category = CategoryChannel::new(extractor, index, retrieval.clone());
    let retriever = EnhancedRetriever::new(vector, category, retrieval);

    let results = retriever
        .enhanced_hybrid_search(query, &SearchFilters::default())
        .await;

    println!();
    println!("🔍 Found {} results for: \"{query}\"", results.len());
    for (i, result) in results.iter().enumerate() {
        let channel = match result.search_type {
            SearchType::Vector => "vector",
            SearchType::Category => "category",
            SearchType::Both => "both",
        };
        println!(
            "\n  {}. score={:.4}  [{}]  id={}  {}",
            i + 1,
            result.score,
            channel,
            result.document.id,
            result.document.title
        );
        if let Some(category_match) = result.category_match {
            println!(
                "     🏷️  category overlap: {:.2} ({} matched labels)",
                category_match.score, category_match.matched_categories
            );
        }
    }

    Ok(())
}
