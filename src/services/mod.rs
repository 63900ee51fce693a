pub mod ai_service; // Completion provider seam
pub mod openai; // OpenAI chat-completions client

pub use ai_service::{Completion, CompletionProvider, CompletionRequest};
pub use openai::OpenAIService;
