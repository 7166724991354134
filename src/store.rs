//! SQLite-backed metadata store.
//!
//! Persists document records and query-log records and serves the two
//! aggregate queries behind the analytics reporter. Identifier uniqueness
//! is enforced by the `documents.doc_id` UNIQUE constraint, so concurrent
//! inserts of the same identifier cannot both succeed — the database
//! arbitrates, not a check-then-insert in application code.

use std::collections::BTreeMap;

use sqlx::{Row, SqlitePool};

use crate::error::{Error, Result};
use crate::models::{
    DocumentRecord, DocumentStats, NewDocument, QueryLogEntry, SearchAnalytics,
};

pub struct MetadataStore {
    pool: SqlitePool,
}

impl MetadataStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new document record.
    ///
    /// Fails with [`Error::DuplicateIdentifier`] when `doc_id` is already
    /// present; any other database failure surfaces as
    /// [`Error::StorageUnavailable`]. Each call is its own transaction.
    pub async fn insert_document(&self, doc: &NewDocument) -> Result<()> {
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO documents (doc_id, title, content, file_path, file_type, created_at, updated_at, word_count, embedding_model)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&doc.doc_id)
        .bind(&doc.title)
        .bind(&doc.content)
        .bind(&doc.file_path)
        .bind(&doc.file_type)
        .bind(now)
        .bind(now)
        .bind(doc.word_count)
        .bind(&doc.embedding_model)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(Error::DuplicateIdentifier {
                    doc_id: doc.doc_id.clone(),
                })
            }
            Err(e) => Err(Error::StorageUnavailable(e)),
        }
    }

    /// Look up a document by its identifier. A missing key is `Ok(None)`,
    /// never an error.
    pub async fn find_document(&self, doc_id: &str) -> Result<Option<DocumentRecord>> {
        let row = sqlx::query(
            "SELECT doc_id, title, content, file_path, file_type, created_at, updated_at, word_count, embedding_model FROM documents WHERE doc_id = ?",
        )
        .bind(doc_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| document_from_row(&row)))
    }

    /// All document records, in insertion order. The store is the single
    /// source of truth for index builds.
    pub async fn list_documents(&self) -> Result<Vec<DocumentRecord>> {
        let rows = sqlx::query(
            "SELECT doc_id, title, content, file_path, file_type, created_at, updated_at, word_count, embedding_model FROM documents ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(document_from_row).collect())
    }

    /// Append one row to the query log.
    pub async fn insert_query_log(&self, entry: &QueryLogEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO query_log (query_text, timestamp, results_count, avg_similarity, execution_time_seconds)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.query_text)
        .bind(entry.timestamp)
        .bind(entry.results_count)
        .bind(entry.avg_similarity)
        .bind(entry.execution_time_seconds)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Total document count, summed word counts, and a per-file-type
    /// breakdown with an `"unknown"` bucket for NULL types.
    pub async fn aggregate_document_stats(&self) -> Result<DocumentStats> {
        let total_documents: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
            .fetch_one(&self.pool)
            .await?;

        let total_words: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(word_count), 0) FROM documents")
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query(
            r#"
            SELECT COALESCE(file_type, 'unknown') AS file_type, COUNT(*) AS doc_count
            FROM documents
            GROUP BY COALESCE(file_type, 'unknown')
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut file_types = BTreeMap::new();
        for row in &rows {
            file_types.insert(row.get("file_type"), row.get("doc_count"));
        }

        Ok(DocumentStats {
            total_documents,
            total_words,
            file_types,
        })
    }

    /// Query-log aggregates plus the `limit` most recent query texts,
    /// newest first; timestamp ties fall back to insertion order (later
    /// rows first).
    pub async fn aggregate_query_stats(&self, limit: i64) -> Result<SearchAnalytics> {
        let total_searches: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM query_log")
            .fetch_one(&self.pool)
            .await?;

        let avg_execution_time_seconds: f64 =
            sqlx::query_scalar("SELECT COALESCE(AVG(execution_time_seconds), 0.0) FROM query_log")
                .fetch_one(&self.pool)
                .await?;

        let avg_results_per_search: f64 =
            sqlx::query_scalar("SELECT COALESCE(AVG(results_count), 0.0) FROM query_log")
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query(
            "SELECT query_text FROM query_log ORDER BY timestamp DESC, id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let recent_queries = rows.iter().map(|row| row.get("query_text")).collect();

        Ok(SearchAnalytics {
            total_searches,
            avg_execution_time_seconds,
            avg_results_per_search,
            recent_queries,
        })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn document_from_row(row: &sqlx::sqlite::SqliteRow) -> DocumentRecord {
    DocumentRecord {
        doc_id: row.get("doc_id"),
        title: row.get("title"),
        content: row.get("content"),
        file_path: row.get("file_path"),
        file_type: row.get("file_type"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        word_count: row.get("word_count"),
        embedding_model: row.get("embedding_model"),
    }
}
