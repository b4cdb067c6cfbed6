//! Chat-completion providers used to compose answers from retrieved
//! content.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::openai;

use crate::errors::RagError;

/// Token cap applied to every answer completion.
const MAX_ANSWER_TOKENS: u64 = 150;

/// Bounded-length completion under a fixed system instruction.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, RagError>;
}

/// OpenAI chat completions through rig.
pub struct OpenAiCompletionProvider {
    client: openai::Client,
    model: String,
}

impl OpenAiCompletionProvider {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            client: openai::Client::new(api_key).expect("failed to construct OpenAI client"),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletionProvider {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, RagError> {
        let agent = self
            .client
            .agent(&self.model)
            .preamble(system)
            .max_tokens(MAX_ANSWER_TOKENS)
            .build();

        let answer = agent
            .prompt(prompt)
            .await
            .map_err(|err| RagError::Completion(err.to_string()))?;

        let answer = answer.trim();
        if answer.is_empty() {
            return Err(RagError::Completion("completion returned no text".into()));
        }
        Ok(answer.to_string())
    }
}
