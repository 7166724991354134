//! # semdex CLI
//!
//! The `semdex` binary is the console surface over the search engine. It
//! provides commands for database initialization, document ingestion,
//! semantic search, analytics display, and a self-test.
//!
//! ## Usage
//!
//! ```bash
//! semdex --config ./semdex.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `semdex init` | Create the SQLite database and run schema migrations |
//! | `semdex add` | Add one document to the corpus |
//! | `semdex load-samples` | Insert the five-document starter corpus |
//! | `semdex search "<query>"` | Build the in-memory index and run one query |
//! | `semdex demo` | Load samples if needed, run the batch search demo, show analytics |
//! | `semdex stats` | Display corpus and query-log statistics |
//! | `semdex selftest` | End-to-end smoke test against a throwaway database |
//!
//! The vector index is in-memory and non-persistent, so `search` and
//! `demo` rebuild it from the stored corpus at the start of each run.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use semdex::config;
use semdex::engine::SearchEngine;
use semdex::progress::ProgressMode;
use semdex::{analytics, db, migrate, samples};

/// semdex — a document ingestion, embedding, and semantic retrieval engine
/// backed by SQLite.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file with `[db]`, `[chunking]`, `[retrieval]`, and `[embedding]`
/// sections.
#[derive(Parser)]
#[command(
    name = "semdex",
    about = "semdex — a document ingestion, embedding, and semantic retrieval engine",
    version,
    long_about = "semdex stores document metadata and a query log in SQLite, chunks document \
    content into overlapping token windows, embeds each chunk, and answers similarity-ranked \
    queries from an in-memory vector index rebuilt on each run."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./semdex.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the documents and query_log
    /// tables. This command is idempotent — running it multiple times is
    /// safe.
    Init,

    /// Add one document to the corpus.
    ///
    /// The document gets a generated identifier and a word count derived
    /// from its content. It will appear in search results after the next
    /// index build (`search` and `demo` build one automatically).
    Add {
        /// Document title.
        title: String,

        /// Document content (the text that gets chunked and embedded).
        content: String,

        /// Originating file path, if any.
        #[arg(long)]
        file_path: Option<String>,

        /// File type label (e.g. `text`, `markdown`).
        #[arg(long)]
        file_type: Option<String>,
    },

    /// Insert the five-document starter corpus.
    LoadSamples,

    /// Search the stored corpus.
    ///
    /// Builds the in-memory vector index over all stored documents, embeds
    /// the query, and prints the top results with similarity scores.
    Search {
        /// The search query string.
        query: String,

        /// Maximum number of results (defaults to retrieval.default_top_k).
        #[arg(long)]
        top_k: Option<usize>,
    },

    /// Run the batch search demo.
    ///
    /// Loads the sample corpus when the store is empty, builds the index,
    /// runs a fixed set of queries, and prints the analytics summary.
    Demo,

    /// Display corpus and query-log statistics.
    Stats,

    /// Run the end-to-end self-test against a throwaway database.
    Selftest,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let progress = ProgressMode::default_for_tty().reporter();

    // Selftest brings its own throwaway environment — no config needed.
    if let Commands::Selftest = cli.command {
        samples::run_selftest(progress.as_ref()).await?;
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let pool = db::connect(&cfg).await?;
            migrate::run_migrations(&pool).await?;
            pool.close().await;
            println!("Database initialized successfully.");
        }
        Commands::Add {
            title,
            content,
            file_path,
            file_type,
        } => {
            let engine = SearchEngine::open(&cfg).await?;
            let doc_id = engine
                .add_document(&title, &content, file_path, file_type)
                .await?;
            println!("added {}", doc_id);
            engine.close().await;
        }
        Commands::LoadSamples => {
            let engine = SearchEngine::open(&cfg).await?;
            let ids = samples::load_sample_documents(&engine).await?;
            println!("loaded {} sample documents", ids.len());
            engine.close().await;
        }
        Commands::Search { query, top_k } => {
            let mut engine = SearchEngine::open(&cfg).await?;
            let top_k = top_k.unwrap_or(engine.default_top_k());

            engine.build_index(progress.as_ref()).await?;
            let results = engine.search(&query, top_k).await?;

            if results.is_empty() {
                println!("No results.");
            } else {
                samples::print_results(&results);
            }
            engine.close().await;
        }
        Commands::Demo => {
            let mut engine = SearchEngine::open(&cfg).await?;

            let stats = engine.get_document_stats().await?;
            if stats.total_documents == 0 {
                let ids = samples::load_sample_documents(&engine).await?;
                println!("loaded {} sample documents", ids.len());
            }

            engine.build_index(progress.as_ref()).await?;
            samples::run_demo_searches(&engine).await?;
            engine.close().await;

            analytics::run_stats(&cfg).await?;
        }
        Commands::Stats => {
            analytics::run_stats(&cfg).await?;
        }
        Commands::Selftest => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
