//! Embedding providers.
//!
//! [`EmbeddingProvider`] abstracts batch embedding generation so pipelines
//! can run against the remote OpenAI model in production and the
//! deterministic [`MockEmbeddingProvider`] in tests.

use async_trait::async_trait;
use rig::client::EmbeddingsClient;
use rig::embeddings::EmbeddingModel;
use rig::providers::openai;

use crate::config::EMBEDDING_DIMENSIONS;
use crate::errors::RagError;

/// Batch embedding generation.
///
/// Implementations return exactly one vector per input, in input order, or
/// fail as a whole; partial batches are never returned.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError>;

    /// Dimensionality of the produced vectors.
    fn dimensions(&self) -> usize;
}

/// OpenAI embeddings through rig.
pub struct OpenAiEmbeddingProvider {
    model: openai::EmbeddingModel,
}

impl OpenAiEmbeddingProvider {
    pub fn new(api_key: &str, model: &str) -> Self {
        let client = openai::Client::new(api_key).expect("failed to construct OpenAI client");
        Self {
            model: client.embedding_model_with_ndims(model, EMBEDDING_DIMENSIONS),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        let embeddings = self
            .model
            .embed_texts(texts.to_vec())
            .await
            .map_err(|err| RagError::Embedding(err.to_string()))?;

        if embeddings.len() != texts.len() {
            return Err(RagError::Embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }

        Ok(embeddings
            .into_iter()
            .map(|embedding| embedding.vec.into_iter().map(|v| v as f32).collect())
            .collect())
    }

    fn dimensions(&self) -> usize {
        EMBEDDING_DIMENSIONS
    }
}

/// Deterministic provider that hashes each input into a fixed-size vector.
///
/// Identical inputs always produce identical vectors, which makes retrieval
/// tests reproducible without network access.
pub struct MockEmbeddingProvider {
    dimensions: usize,
}

impl MockEmbeddingProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        Ok(texts
            .iter()
            .map(|text| hash_to_vec(text, self.dimensions))
            .collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn hash_to_vec(text: &str, dimensions: usize) -> Vec<f32> {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    let seed = hasher.finish();
    (0..dimensions)
        .map(|i| {
            let bits = seed.rotate_left((i % 64) as u32) ^ ((i as u64) << 24);
            (bits as f32) / u32::MAX as f32
        })
        .collect()
}
