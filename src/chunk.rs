//! Sliding-window text chunker.
//!
//! Splits document content into overlapping windows of whitespace tokens.
//! Each window holds `chunk_size` tokens and the next window starts
//! `chunk_size - overlap` tokens later; the final window may be shorter.
//!
//! Each chunk receives a deterministic identifier derived from its document
//! ID and position, plus a SHA-256 hash of its text. Identical input and
//! configuration always produce an identical chunk sequence.

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::models::Chunk;

/// Window parameters, decoupled from application config.
#[derive(Debug, Clone, Copy)]
pub struct ChunkConfig {
    /// Tokens per window.
    pub chunk_size: usize,
    /// Tokens shared between neighboring windows. Must satisfy
    /// `0 <= overlap < chunk_size`.
    pub overlap: usize,
}

impl ChunkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.overlap >= self.chunk_size {
            return Err(Error::InvalidChunkConfig {
                chunk_size: self.chunk_size,
                overlap: self.overlap,
            });
        }
        Ok(())
    }
}

/// Split text into an iterator of overlapping token-window chunks.
///
/// The sequence is lazy and finite; calling `split` again with the same
/// input restarts it from the beginning. Empty or whitespace-only text
/// yields no chunks.
pub fn split(doc_id: &str, text: &str, config: &ChunkConfig) -> Result<Chunks> {
    config.validate()?;

    let tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();

    Ok(Chunks {
        doc_id: doc_id.to_string(),
        tokens,
        chunk_size: config.chunk_size,
        step: config.chunk_size - config.overlap,
        offset: 0,
        position: 0,
    })
}

/// Lazy chunk sequence produced by [`split`].
#[derive(Debug, Clone)]
pub struct Chunks {
    doc_id: String,
    tokens: Vec<String>,
    chunk_size: usize,
    step: usize,
    offset: usize,
    position: i64,
}

impl Iterator for Chunks {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.offset >= self.tokens.len() {
            return None;
        }

        let end = (self.offset + self.chunk_size).min(self.tokens.len());
        let text = self.tokens[self.offset..end].join(" ");
        let chunk = make_chunk(&self.doc_id, self.position, &text);

        // A window reaching the last token ends the sequence; advancing by
        // `step` past it would only re-emit a suffix of this window.
        if end == self.tokens.len() {
            self.offset = self.tokens.len();
        } else {
            self.offset += self.step;
        }
        self.position += 1;

        Some(chunk)
    }
}

fn make_chunk(doc_id: &str, position: i64, text: &str) -> Chunk {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let hash = format!("{:x}", hasher.finalize());

    Chunk {
        id: format!("{}:{}", doc_id, position),
        doc_id: doc_id.to_string(),
        position,
        text: text.to_string(),
        hash,
    }
}
