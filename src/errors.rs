use thiserror::Error;

/// Error type shared by the crawl, ingestion, and question-answering
/// pipelines.
///
/// Containment rules differ per variant: [`RagError::Fetch`] and
/// [`RagError::InvalidDocument`] are caught at the crawler's per-URL
/// boundary, [`RagError::Completion`] is caught per retrieved result during
/// question answering, and the remaining variants abort the enclosing
/// operation.
#[derive(Debug, Error)]
pub enum RagError {
    /// HTTP-level failure while fetching a page.
    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The remote embedding call failed; no partial batches are returned.
    #[error("embedding generation failed: {0}")]
    Embedding(String),

    /// The remote completion call failed.
    #[error("completion failed: {0}")]
    Completion(String),

    /// Database connectivity or query failure.
    #[error("storage failure: {0}")]
    Store(String),

    /// Missing or malformed startup configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A fetched document could not be parsed.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}
