use std::io::{self, Write};
use std::sync::Arc;

use newsqa_answer::{GenerationClient, QaEngine};
use newsqa_core::config::{expand_path, Config};
use newsqa_core::traits::GenerationBackend;
use newsqa_core::types::{SearchFilters, SearchType};
use newsqa_cli::corpus;
use newsqa_embed::default_provider;
use newsqa_index::MemoryIndex;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("📰 newsqa interactive Q&A");
    println!("=========================");

    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {e}");
        e
    })?;

    let embedder = default_provider(&config.embedding)?;
    let index = Arc::new(MemoryIndex::new(config.retrieval.match_policy));

    let news_dir = expand_path(&config.data.news_dir);
    let documents = corpus::load_documents(&news_dir)?;
    if documents.is_empty() {
        println!("⚠️  No news records found under {}", news_dir.display());
        println!("   Answers will be \"not found\" until records are indexed.");
    }
    let indexed = corpus::index_documents(index.clone(), embedder.clone(), documents).await?;
    println!("📊 Indexed {indexed} news records");

    let backend: Option<Arc<dyn GenerationBackend>> = if config.generation.is_configured() {
        Some(Arc::new(GenerationClient::new(&config.generation)?))
    } else {
        println!("⚠️  No generation backend configured; using templated answers");
        None
    };

    let engine = QaEngine::build(&config, embedder, index, backend);

    println!();
    println!("🎯 Commands:");
    println!("  /help     - Show this help message");
    println!("  /clear    - Reset the conversation");
    println!("  /stats    - Show session statistics");
    println!("  /quit     - Exit");
    println!("  <text>    - Ask a question");
    println!();

    let session_id = "cli";
    loop {
        print!("ask> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/help" | "/h" => show_help(),
            "/clear" | "/c" => {
                engine.clear_session(session_id);
                println!("🧹 Conversation cleared");
            }
            "/stats" | "/s" => {
                println!("📈 Session turns: {}", engine.history(session_id).len());
                println!("📉 Degraded generation mode: {}", engine.is_degraded());
            }
            "/quit" | "/q" | "quit" | "exit" => {
                println!("👋 Goodbye!");
                break;
            }
            question => {
                match engine.ask(session_id, question, &SearchFilters::default()).await {
                    Ok(response) => print_response(&response),
                    Err(e) => println!("❌ {e}"),
                }
            }
        }
        println!();
    }

    Ok(())
}

fn print_response(response: &newsqa_core::types::QaResponse) {
    println!();
    println!("{}", response.answer);
    if response.sources.is_empty() {
        return;
    }
    println!();
    println!("📚 Sources:");
    for (i, source) in response.sources.iter().enumerate() {
        let channel = match source.search_type {
            SearchType::Vector => "vector",
            SearchType::Category => "category",
            SearchType::Both => "both",
        };
        print!(
            "  {}. score={:.3}  [{}]  {}",
            i + 1,
            source.score,
            channel,
            source.title
        );
        if !source.source_url.is_empty() {
            print!("  ({})", source.source_url);
        }
        println!();
    }
    let profile = &response.strategy;
    let mut tags = Vec::new();
    if profile.technical {
        tags.push("technical");
    }
    if profile.geographic {
        tags.push("geographic");
    }
    if profile.temporal {
        tags.push("temporal");
    }
    if !tags.is_empty() {
        println!("🧭 Query profile: {}", tags.join(", "));
    }
}

fn show_help() {
    println!("🔍 newsqa Help");
    println!("==============");
    println!();
    println!("Ask natural-language questions about the indexed news corpus.");
    println!("Answers are grounded in retrieved records and always list sources.");
    println!();
    println!("🔧 Commands:");
    println!("  /help, /h      Show this help");
    println!("  /clear, /c     Reset the conversation history");
    println!("  /stats, /s     Show session statistics");
    println!("  /quit, /q      Exit");
}
