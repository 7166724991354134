//! Error taxonomy for the semdex core.
//!
//! Library operations return [`Result`] with a typed [`Error`] so callers can
//! distinguish a duplicate identifier from an unavailable store or an unbuilt
//! index. The CLI boundary converts to `anyhow` for display.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A document with this `doc_id` already exists in the metadata store.
    #[error("duplicate document identifier: {doc_id}")]
    DuplicateIdentifier { doc_id: String },

    /// The underlying SQLite store failed or is unreachable.
    #[error("metadata store unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),

    /// Persisting a new document failed; no partial state is retained.
    #[error("failed to persist document {doc_id}: {source}")]
    DocumentPersist {
        doc_id: String,
        #[source]
        source: Box<Error>,
    },

    /// Chunking parameters violate `0 <= overlap < chunk_size`.
    #[error("invalid chunk config: overlap ({overlap}) must be smaller than chunk size ({chunk_size})")]
    InvalidChunkConfig { chunk_size: usize, overlap: usize },

    /// Building the vector index failed; the engine stays unindexed.
    #[error("index build failed: {0}")]
    IndexBuild(#[source] anyhow::Error),

    /// A search was attempted before any successful index build.
    #[error("index not built; run build_index before searching")]
    IndexNotBuilt,

    /// The search request itself is malformed (e.g. `top_k` of zero).
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}
