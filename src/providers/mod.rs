// LLM provider client
//
// The model is treated as a black-box completion service behind the
// CompletionBackend trait, so the orchestration loop can be exercised with
// scripted fakes in tests.

use anyhow::Result;
use async_trait::async_trait;

pub mod openai;
pub mod types;

pub use openai::OpenAiClient;
pub use types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice, FunctionCall,
    FunctionDeclaration, ToolCall, ToolDeclaration, Usage,
};

/// A chat-completion service supporting the function-calling protocol.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send a completion request and wait for the full response.
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse>;
}
