//! Shared test doubles: an in-memory document store and scriptable
//! completion providers.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;

use siterag::completions::CompletionProvider;
use siterag::errors::RagError;
use siterag::store::{DocumentStore, SimilarDocument, format_snippet, SNIPPET_UNAVAILABLE};

#[derive(Clone, Debug)]
struct StoredDocument {
    id: i32,
    url: String,
    embedding: Vec<f32>,
    content: String,
}

/// In-memory [`DocumentStore`] mirroring the pgvector store's semantics:
/// first-write-wins per URL, cosine-ranked retrieval, snippet sentinel.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    documents: Vec<StoredDocument>,
    next_id: i32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// URLs in insertion order, for traversal assertions.
    pub fn stored_urls(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .documents
            .iter()
            .map(|doc| doc.url.clone())
            .collect()
    }

    pub fn content_of(&self, url: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .documents
            .iter()
            .find(|doc| doc.url == url)
            .map(|doc| doc.content.clone())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, url: &str, embedding: &[f32], content: &str) -> Result<(), RagError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.documents.iter().any(|doc| doc.url == url) {
            return Ok(());
        }
        inner.next_id += 1;
        let id = inner.next_id;
        inner.documents.push(StoredDocument {
            id,
            url: url.to_string(),
            embedding: embedding.to_vec(),
            content: content.to_string(),
        });
        Ok(())
    }

    async fn query_similar(
        &self,
        embedding: &[f32],
        top_k: i64,
    ) -> Result<Vec<SimilarDocument>, RagError> {
        if top_k <= 0 {
            return Ok(Vec::new());
        }
        let inner = self.inner.lock().unwrap();
        let mut scored: Vec<SimilarDocument> = inner
            .documents
            .iter()
            .map(|doc| SimilarDocument {
                id: doc.id,
                url: doc.url.clone(),
                content: doc.content.clone(),
                similarity: cosine_similarity(&doc.embedding, embedding),
            })
            .collect();
        scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        scored.truncate(top_k as usize);
        Ok(scored)
    }

    async fn snippet(&self, id: i32) -> Result<String, RagError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .documents
            .iter()
            .find(|doc| doc.id == id)
            .map(|doc| format_snippet(&doc.content))
            .unwrap_or_else(|| SNIPPET_UNAVAILABLE.to_string()))
    }

    async fn reset(&self) -> Result<(), RagError> {
        self.inner.lock().unwrap().documents.clear();
        Ok(())
    }

    async fn count(&self) -> Result<i64, RagError> {
        Ok(self.inner.lock().unwrap().documents.len() as i64)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    let norm_a: f64 = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|y| f64::from(*y).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Embedding provider that returns the same fixed vector for every input.
/// Lets tests pick the query vector independently of the stored ones.
pub struct ConstEmbeddingProvider {
    vector: Vec<f32>,
}

impl ConstEmbeddingProvider {
    pub fn new(vector: Vec<f32>) -> Self {
        Self { vector }
    }
}

#[async_trait]
impl siterag::embeddings::EmbeddingProvider for ConstEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        Ok(texts.iter().map(|_| self.vector.clone()).collect())
    }

    fn dimensions(&self) -> usize {
        self.vector.len()
    }
}

/// Completion provider that echoes a canned answer, optionally failing when
/// the prompt contains a marker string.
pub struct ScriptedCompletionProvider {
    pub answer: String,
    pub fail_when_contains: Option<String>,
}

impl ScriptedCompletionProvider {
    pub fn answering(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            fail_when_contains: None,
        }
    }

    pub fn failing_on(marker: impl Into<String>) -> Self {
        Self {
            answer: "stub answer".to_string(),
            fail_when_contains: Some(marker.into()),
        }
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletionProvider {
    async fn complete(&self, _system: &str, prompt: &str) -> Result<String, RagError> {
        if let Some(marker) = &self.fail_when_contains {
            if prompt.contains(marker) {
                return Err(RagError::Completion("scripted failure".to_string()));
            }
        }
        Ok(self.answer.clone())
    }
}
