//! In-memory vector index.
//!
//! Holds chunk vectors with their payloads and answers top-k
//! nearest-neighbor queries by brute-force cosine similarity. The index is
//! never persisted: every build populates a fresh instance, and the engine
//! swaps it in whole. Scans are linear, which is the right trade at this
//! corpus scale.

use crate::embedding::cosine_similarity;

/// Metadata carried alongside each vector so search results can be
/// assembled without a second pass over the chunker.
#[derive(Debug, Clone)]
pub struct ChunkPayload {
    pub doc_id: String,
    pub title: String,
    pub text: String,
    pub position: i64,
}

struct Entry {
    chunk_id: String,
    vector: Vec<f32>,
    payload: ChunkPayload,
}

/// A query hit: chunk identity, similarity score, and payload.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk_id: String,
    /// Cosine similarity in `[-1.0, 1.0]`.
    pub similarity: f64,
    pub payload: ChunkPayload,
}

#[derive(Default)]
pub struct VectorIndex {
    entries: Vec<Entry>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a vector, replacing any existing entry with the same
    /// `chunk_id`.
    pub fn upsert(&mut self, chunk_id: &str, vector: Vec<f32>, payload: ChunkPayload) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.chunk_id == chunk_id) {
            existing.vector = vector;
            existing.payload = payload;
            return;
        }
        self.entries.push(Entry {
            chunk_id: chunk_id.to_string(),
            vector,
            payload,
        });
    }

    /// Return the `top_k` entries nearest to `vector`, ordered by
    /// non-increasing similarity. Ties keep insertion order (the sort is
    /// stable).
    pub fn query(&self, vector: &[f32], top_k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|e| ScoredChunk {
                chunk_id: e.chunk_id.clone(),
                similarity: cosine_similarity(vector, &e.vector) as f64,
                payload: e.payload.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);
        scored
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(doc_id: &str) -> ChunkPayload {
        ChunkPayload {
            doc_id: doc_id.to_string(),
            title: format!("title {}", doc_id),
            text: format!("text {}", doc_id),
            position: 0,
        }
    }

    #[test]
    fn query_orders_by_descending_similarity() {
        let mut index = VectorIndex::new();
        index.upsert("c1", vec![1.0, 0.0], payload("d1"));
        index.upsert("c2", vec![0.0, 1.0], payload("d2"));
        index.upsert("c3", vec![0.7, 0.7], payload("d3"));

        let hits = index.query(&[1.0, 0.0], 3);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].chunk_id, "c1");
        assert_eq!(hits[1].chunk_id, "c3");
        assert_eq!(hits[2].chunk_id, "c2");
        assert!(hits[0].similarity >= hits[1].similarity);
        assert!(hits[1].similarity >= hits[2].similarity);
    }

    #[test]
    fn query_truncates_to_top_k() {
        let mut index = VectorIndex::new();
        for i in 0..10 {
            index.upsert(&format!("c{}", i), vec![1.0, i as f32], payload("d"));
        }
        assert_eq!(index.query(&[1.0, 1.0], 3).len(), 3);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut index = VectorIndex::new();
        index.upsert("first", vec![1.0, 0.0], payload("d1"));
        index.upsert("second", vec![1.0, 0.0], payload("d2"));

        let hits = index.query(&[1.0, 0.0], 2);
        assert_eq!(hits[0].chunk_id, "first");
        assert_eq!(hits[1].chunk_id, "second");
    }

    #[test]
    fn upsert_replaces_existing_chunk() {
        let mut index = VectorIndex::new();
        index.upsert("c1", vec![1.0, 0.0], payload("d1"));
        index.upsert("c1", vec![0.0, 1.0], payload("d1"));

        assert_eq!(index.len(), 1);
        let hits = index.query(&[0.0, 1.0], 1);
        assert!((hits[0].similarity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn empty_index_returns_no_hits() {
        let index = VectorIndex::new();
        assert!(index.query(&[1.0], 5).is_empty());
        assert!(index.is_empty());
    }
}
