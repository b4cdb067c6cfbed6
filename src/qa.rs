//! Question answering: similarity retrieval plus per-result LLM answers.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::completions::CompletionProvider;
use crate::embeddings::EmbeddingProvider;
use crate::errors::RagError;
use crate::store::DocumentStore;

/// System instruction applied to every answer completion.
const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Number of similar documents consulted per question.
pub const DEFAULT_TOP_K: i64 = 3;

/// Everything returned for one question: the raw similarity hits plus the
/// per-hit LLM answers.
#[derive(Clone, Debug, Serialize)]
pub struct AnswerSet {
    pub vector_similarity: Vec<SimilarityHit>,
    pub llm_search: Vec<LlmAnswer>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SimilarityHit {
    pub id: i32,
    pub url: String,
    pub similarity: f64,
    pub snippet: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct LlmAnswer {
    pub id: i32,
    pub url: String,
    pub answer: String,
    pub similarity: f64,
}

/// Question-answering pipeline over a [`DocumentStore`].
#[derive(Clone)]
pub struct AnswerPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    completer: Arc<dyn CompletionProvider>,
}

impl AnswerPipeline {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        completer: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            embedder,
            completer,
        }
    }

    /// Answers `question` against the documents in `store`.
    ///
    /// Embedding and retrieval failures abort the whole call. A completion
    /// failure for one retrieved document is logged and drops only that
    /// document's entry from `llm_search`; the similarity hit stays.
    pub async fn answer(
        &self,
        store: &dyn DocumentStore,
        question: &str,
        top_k: i64,
    ) -> Result<AnswerSet, RagError> {
        info!(question, top_k, "answering question");

        let texts = [question.to_string()];
        let question_embedding = self
            .embedder
            .embed_batch(&texts)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RagError::Embedding("provider returned no vectors".to_string()))?;

        let matches = store.query_similar(&question_embedding, top_k).await?;
        debug!(count = matches.len(), "similarity hits");

        let mut vector_similarity = Vec::with_capacity(matches.len());
        for doc in &matches {
            let snippet = store.snippet(doc.id).await?;
            vector_similarity.push(SimilarityHit {
                id: doc.id,
                url: doc.url.clone(),
                similarity: round2(doc.similarity),
                snippet,
            });
        }

        let mut llm_search = Vec::with_capacity(vector_similarity.len());
        for hit in &vector_similarity {
            let context = if hit.snippet.is_empty() {
                hit.url.as_str()
            } else {
                hit.snippet.as_str()
            };
            let prompt = format!(
                "Based on the following content, answer the question: {question}\n\nContent: {context}"
            );
            match self.completer.complete(SYSTEM_PROMPT, &prompt).await {
                Ok(answer) => llm_search.push(LlmAnswer {
                    id: hit.id,
                    url: hit.url.clone(),
                    answer,
                    similarity: hit.similarity,
                }),
                Err(err) => {
                    error!(id = hit.id, url = %hit.url, error = %err, "completion failed; omitting result");
                }
            }
        }

        Ok(AnswerSet {
            vector_similarity,
            llm_search,
        })
    }
}

/// Rounds a similarity score to two decimals for presentation.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
