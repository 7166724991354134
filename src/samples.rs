//! Sample corpus, batch search demo, and self-test.
//!
//! Thin wrappers over the engine's public operations, used by the
//! `load-samples`, `demo`, and `selftest` commands.

use anyhow::Result;

use crate::config::Config;
use crate::engine::SearchEngine;
use crate::models::SearchResult;
use crate::progress::BuildProgressReporter;

/// The five-document starter corpus.
const SAMPLE_DOCUMENTS: [(&str, &str); 5] = [
    (
        "Introduction to Artificial Intelligence",
        "Artificial intelligence is a branch of computer science that seeks to create \
         systems capable of performing tasks that normally require human intelligence. \
         This includes learning, reasoning, perception, and natural language \
         understanding. Machine learning algorithms are fundamental to the development \
         of modern AI systems.",
    ),
    (
        "Natural Language Processing",
        "Natural language processing is a subfield of AI focused on the interaction \
         between computers and human language. It covers tasks such as sentiment \
         analysis, machine translation, text generation, and semantic search. \
         Transformer models have revolutionized the field in recent years.",
    ),
    (
        "Machine Learning and Deep Learning",
        "Machine learning is a method of data analysis that automates analytical model \
         building. Deep learning, a subset of machine learning, uses neural networks \
         with many layers to model and understand complex data. These techniques are \
         especially useful for pattern recognition, computer vision, and natural \
         language processing.",
    ),
    (
        "Recommender Systems",
        "Recommender systems are algorithms that suggest relevant items to users, such \
         as products, movies, or content. They use techniques like collaborative \
         filtering, content-based filtering, and hybrid methods. These systems are \
         fundamental to platforms like Netflix, Amazon, and Spotify for personalizing \
         the user experience.",
    ),
    (
        "Databases and Big Data",
        "Relational databases have been the standard for storing structured information \
         for decades. With the growth of big data, new technologies have emerged such \
         as NoSQL databases, distributed systems, and real-time processing tools. These \
         technologies handle massive data volumes with high velocity and variety.",
    ),
];

/// Queries exercised by the batch search demo.
const DEMO_QUERIES: [&str; 5] = [
    "what is artificial intelligence",
    "machine learning and neural networks",
    "recommender systems for streaming platforms",
    "NoSQL databases",
    "natural language processing with transformers",
];

/// Insert the sample corpus. Returns the new document identifiers.
pub async fn load_sample_documents(engine: &SearchEngine) -> Result<Vec<String>> {
    let mut ids = Vec::with_capacity(SAMPLE_DOCUMENTS.len());
    for (title, content) in SAMPLE_DOCUMENTS {
        let doc_id = engine
            .add_document(title, content, None, Some("text".to_string()))
            .await?;
        ids.push(doc_id);
    }
    Ok(ids)
}

/// Run the batch search demo: one query per sample topic, printed with
/// scores and excerpts.
pub async fn run_demo_searches(engine: &SearchEngine) -> Result<()> {
    for query in DEMO_QUERIES {
        println!("query: \"{}\"", query);

        let results = engine.search(query, 3).await?;
        if results.is_empty() {
            println!("  No results.");
        } else {
            print_results(&results);
        }
        println!();
    }
    Ok(())
}

/// Print a ranked result list.
pub fn print_results(results: &[SearchResult]) {
    for (i, result) in results.iter().enumerate() {
        println!("{}. [{:.3}] {}", i + 1, result.similarity, result.title);
        println!(
            "    excerpt: \"{}\"",
            excerpt(&result.text).replace('\n', " ")
        );
        println!("    doc: {}", result.doc_id);
    }
}

fn excerpt(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= 100 {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(100).collect();
    format!("{}...", cut)
}

/// End-to-end smoke test against a throwaway database in the system temp
/// directory: add a document, build the index, search, and check the
/// aggregates. Cleans up after itself and fails on the first broken step.
pub async fn run_selftest(progress: &dyn BuildProgressReporter) -> Result<()> {
    let dir = std::env::temp_dir().join(format!("semdex-selftest-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir)?;

    let result = selftest_inner(&dir, progress).await;

    // Remove the throwaway database regardless of outcome.
    let _ = std::fs::remove_dir_all(&dir);

    result
}

async fn selftest_inner(dir: &std::path::Path, progress: &dyn BuildProgressReporter) -> Result<()> {
    let config = Config::minimal(dir.join("selftest.db"));
    let mut engine = SearchEngine::open(&config).await?;

    println!("selftest: adding document...");
    let doc_id = engine
        .add_document(
            "Self Test Document",
            "This is a self test document verifying that ingestion, indexing, and \
             semantic search work end to end.",
            None,
            Some("test".to_string()),
        )
        .await?;
    println!("  ok ({})", doc_id);

    println!("selftest: building index...");
    let chunks = engine.build_index(progress).await?;
    anyhow::ensure!(engine.is_indexed(), "engine still unindexed after build");
    println!("  ok ({} chunks)", chunks);

    println!("selftest: searching...");
    let results = engine.search("self test document", 1).await?;
    anyhow::ensure!(!results.is_empty(), "search returned no results");
    anyhow::ensure!(results[0].doc_id == doc_id, "search hit the wrong document");
    println!("  ok ({} results)", results.len());

    println!("selftest: checking stats...");
    let stats = engine.get_document_stats().await?;
    anyhow::ensure!(stats.total_documents == 1, "unexpected document count");
    let analytics = engine.get_search_analytics().await?;
    anyhow::ensure!(analytics.total_searches == 1, "unexpected search count");
    println!("  ok");

    engine.close().await;

    println!("selftest: all checks passed");
    Ok(())
}
