//! Generation module - drafting document text with a language model.
//!
//! - `prompt` - turns an order into the model instruction
//! - `assembler` - runs one order through the completion provider
//! - `openai` - chat completions client

pub mod assembler;
pub mod openai;
pub mod prompt;

pub use assembler::DocumentAssembler;
pub use openai::OpenAiClient;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("text generation failed: {0}")]
    Provider(String),
    #[error("text generation request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("text generation returned no content")]
    EmptyCompletion,
}

/// One system + user exchange with a bounded output length.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

/// Prompt-in, text-out language model.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError>;
}
