//! Core data models used throughout semdex.
//!
//! These types represent the documents, chunks, query-log rows, and search
//! results that flow through the ingestion and retrieval pipeline.

use std::collections::BTreeMap;

use serde::Serialize;

/// Input for creating a document record. `created_at`/`updated_at` are
/// assigned by the store at insert time.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub doc_id: String,
    pub title: String,
    pub content: String,
    pub file_path: Option<String>,
    pub file_type: Option<String>,
    pub word_count: i64,
    pub embedding_model: String,
}

/// Document metadata row as stored in SQLite. `doc_id` is unique and
/// immutable after creation; documents are never deleted by the core.
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    pub doc_id: String,
    pub title: String,
    pub content: String,
    pub file_path: Option<String>,
    pub file_type: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub word_count: i64,
    pub embedding_model: String,
}

/// A bounded segment of a document's content — the unit that is embedded
/// and indexed. Chunks are derived fresh on every index build and are owned
/// transiently by the vector index; they are never persisted.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Deterministic identifier: `{doc_id}:{position}`.
    pub id: String,
    pub doc_id: String,
    /// Zero-based window position within the source document.
    pub position: i64,
    pub text: String,
    /// SHA-256 of `text`, for determinism checks.
    pub hash: String,
}

/// One immutable row of the query log, written once per search call.
#[derive(Debug, Clone)]
pub struct QueryLogEntry {
    pub query_text: String,
    pub timestamp: i64,
    pub results_count: i64,
    /// Arithmetic mean of result similarities; 0.0 for an empty result set.
    pub avg_similarity: f64,
    pub execution_time_seconds: f64,
}

/// A ranked search result: the matching chunk plus document metadata
/// joined from the store. Enrichment fields are `None` when the document
/// record is missing — a tolerated condition, not an error.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub doc_id: String,
    pub title: String,
    /// Text of the matching chunk.
    pub text: String,
    /// Chunk position within the source document.
    pub position: i64,
    /// Cosine similarity in `[-1.0, 1.0]`.
    pub similarity: f64,
    pub file_path: Option<String>,
    pub file_type: Option<String>,
    pub created_at: Option<i64>,
    pub word_count: Option<i64>,
}

/// Aggregate document statistics from the metadata store.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentStats {
    pub total_documents: i64,
    pub total_words: i64,
    /// Count per file type; NULL types land in the `"unknown"` bucket.
    pub file_types: BTreeMap<String, i64>,
}

/// Aggregate query-log statistics from the metadata store.
#[derive(Debug, Clone, Serialize)]
pub struct SearchAnalytics {
    pub total_searches: i64,
    pub avg_execution_time_seconds: f64,
    pub avg_results_per_search: f64,
    /// Most recent query texts, newest first.
    pub recent_queries: Vec<String>,
}

/// Whitespace-delimited token count, the `word_count` derivation rule.
pub fn word_count(text: &str) -> i64 {
    text.split_whitespace().count() as i64
}
