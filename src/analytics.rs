//! Read-side analytics over the metadata store.
//!
//! Wraps the store's two aggregate queries and formats them for the
//! `semdex stats` command. Every call re-queries the database; nothing is
//! cached and nothing is mutated.

use anyhow::Result;

use crate::config::Config;
use crate::db;
use crate::error;
use crate::migrate;
use crate::models::{DocumentStats, SearchAnalytics};
use crate::store::MetadataStore;

/// Default number of recent queries shown by the stats command.
const RECENT_QUERIES_SHOWN: usize = 5;

/// Document statistics straight from the store.
pub async fn document_stats(store: &MetadataStore) -> error::Result<DocumentStats> {
    store.aggregate_document_stats().await
}

/// Search analytics straight from the store.
pub async fn search_analytics(
    store: &MetadataStore,
    limit: i64,
) -> error::Result<SearchAnalytics> {
    store.aggregate_query_stats(limit).await
}

/// Run the stats command: query the database and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    migrate::run_migrations(&pool).await?;
    let store = MetadataStore::new(pool);

    let doc_stats = document_stats(&store).await?;
    let search_stats = search_analytics(&store, 10).await?;

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("semdex — Corpus Stats");
    println!("=====================");
    println!();
    println!("  Database:        {}", config.db.path.display());
    println!("  Size:            {}", format_bytes(db_size));
    println!();
    println!("  Documents:       {}", doc_stats.total_documents);
    println!("  Words:           {}", doc_stats.total_words);
    println!("  Embedding model: {}", config.embedding.model);

    if !doc_stats.file_types.is_empty() {
        println!();
        println!("  By file type:");
        for (file_type, count) in &doc_stats.file_types {
            println!("    {:<16} {:>6}", file_type, count);
        }
    }

    println!();
    println!("  Searches:        {}", search_stats.total_searches);
    println!(
        "  Avg time:        {:.3}s",
        search_stats.avg_execution_time_seconds
    );
    println!(
        "  Avg results:     {:.1}",
        search_stats.avg_results_per_search
    );

    if !search_stats.recent_queries.is_empty() {
        println!();
        println!("  Recent queries:");
        for query in search_stats.recent_queries.iter().take(RECENT_QUERIES_SHOWN) {
            println!("    - {}", query);
        }
    }

    println!();

    store.close().await;
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
