use anyhow::Result;
use sqlx::SqlitePool;

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    // Create documents table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            doc_id TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            file_path TEXT,
            file_type TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            word_count INTEGER NOT NULL,
            embedding_model TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create query log table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS query_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            query_text TEXT NOT NULL,
            timestamp INTEGER NOT NULL,
            results_count INTEGER NOT NULL,
            avg_similarity REAL NOT NULL,
            execution_time_seconds REAL NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_documents_file_type ON documents(file_type)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_query_log_timestamp ON query_log(timestamp DESC)")
        .execute(pool)
        .await?;

    Ok(())
}
