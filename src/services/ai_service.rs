use crate::error::ApiError;

/// One system + user prompt pair sent to the completion provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the provider for a JSON object reply.
    pub json_mode: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Completion {
    /// `None` when the provider answered without usable text.
    pub content: Option<String>,
    /// Provider accounting data, forwarded to the caller untouched.
    pub usage: Option<serde_json::Value>,
}

/// Trait for LLM completion providers (OpenAI, compatible gateways, test stubs)
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ApiError>;
}
