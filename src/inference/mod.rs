pub mod provider;
pub mod providers;
pub mod summarizer;
pub mod types;

pub use provider::{CompletionProvider, CompletionRequest, ProviderError};
pub use providers::{ChatClient, ResponsesProvider};
pub use summarizer::Summarizer;
pub use types::StreamEvent;
