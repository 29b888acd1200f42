use crate::{ChatRequest, Error};

/// A completion backend that turns a chat request into reply text.
/// Streaming is an implementation detail: the reply is returned once the
/// stream has been fully reduced.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync + 'static {
    /// Generate the reply for a chat completion request.
    async fn generate(&self, request: &ChatRequest) -> Result<String, Error>;
}
