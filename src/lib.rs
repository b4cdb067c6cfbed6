//! ```text
//! crawl: Crawler ──► IngestionPipeline ──► text::normalize
//!                                      ──► EmbeddingProvider
//!                                      ──► DocumentStore::insert
//!
//! ask:   question ──► EmbeddingProvider ──► DocumentStore::query_similar
//!                                       ──► snippet enrichment
//!                                       ──► CompletionProvider (per hit)
//!
//! http:  axum routes ──► one PgVectorStore per request
//! ```
//!
pub mod completions;
pub mod config;
pub mod crawler;
pub mod embeddings;
pub mod errors;
pub mod http;
pub mod ingest;
pub mod qa;
pub mod store;
pub mod text;
