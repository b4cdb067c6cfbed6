//! Ingestion pipeline: normalize → embed → store, one page at a time.

use std::sync::Arc;

use tracing::debug;

use crate::embeddings::EmbeddingProvider;
use crate::errors::RagError;
use crate::store::DocumentStore;
use crate::text::normalize;

/// Orchestrates persisting a single page's text.
#[derive(Clone)]
pub struct IngestionPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn DocumentStore>,
}

impl IngestionPipeline {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn DocumentStore>) -> Self {
        Self { embedder, store }
    }

    /// Cleans `content`, embeds it as a single document, and stores it under
    /// `url`. A failure in any step abandons this page only; the caller
    /// decides whether to keep going.
    pub async fn ingest(&self, content: &str, url: &str) -> Result<(), RagError> {
        let cleaned = normalize(content);
        debug!(url, chars = cleaned.len(), "normalized page text");

        let embeddings = self
            .embedder
            .embed_batch(std::slice::from_ref(&cleaned))
            .await?;
        let embedding = embeddings
            .into_iter()
            .next()
            .ok_or_else(|| RagError::Embedding("provider returned no vectors".to_string()))?;

        self.store.insert(url, &embedding, &cleaned).await
    }
}
