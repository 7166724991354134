//! # semdex
//!
//! A document ingestion, embedding, and semantic retrieval engine backed
//! by SQLite.
//!
//! semdex stores document metadata and a query log in SQLite, chunks
//! document content into overlapping token windows, embeds each chunk, and
//! answers similarity-ranked queries from an in-memory vector index that
//! is rebuilt in full on every `build_index` call.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌───────────────┐   ┌───────────┐
//! │ Documents │──▶│ Chunk + Embed  │──▶│  Vector    │
//! │ (SQLite)  │   │ (build_index) │   │  Index     │
//! └─────┬─────┘   └───────────────┘   └─────┬─────┘
//!       │                                   │
//!       │  metadata join         top-k query │
//!       ▼                                   ▼
//! ┌─────────────────────────────────────────────┐
//! │              SearchEngine.search            │
//! │   ranked results + query-log bookkeeping    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! semdex init                   # create database
//! semdex load-samples           # insert the starter corpus
//! semdex search "machine learning"
//! semdex demo                   # batch searches + analytics
//! semdex stats                  # corpus and query-log statistics
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`chunk`] | Sliding-window text chunking |
//! | [`embedding`] | Embedding provider abstraction |
//! | [`index`] | In-memory vector index |
//! | [`engine`] | Search engine orchestration |
//! | [`store`] | SQLite metadata store |
//! | [`analytics`] | Read-side statistics |
//! | [`samples`] | Sample corpus, demo, and self-test |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |
//! | [`progress`] | Index-build progress reporting |
//! | [`error`] | Typed error taxonomy |

pub mod analytics;
pub mod chunk;
pub mod config;
pub mod db;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod index;
pub mod migrate;
pub mod models;
pub mod progress;
pub mod samples;
pub mod store;
