use super::types::{ChatRequest, OpenAIError, StreamChunk};
use crate::accumulator::StreamReducer;
use crate::config::AiConfig;
use crate::line_stream::LineStreamExt;
use crate::provider::CompletionProvider;
use crate::Error;
use reqwest::{Client, StatusCode};

/// Provider for any endpoint speaking the OpenAI `/chat/completions` protocol.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleProvider {
    client: Client,
    api_key: String,
    base_url: String,
    reducer: StreamReducer,
}

impl OpenAICompatibleProvider {
    /// Create a new provider from endpoint settings.
    pub fn new(config: &AiConfig) -> Result<Self, Error> {
        if config.accept_invalid_certs {
            tracing::warn!(
                base_url = %config.base_url,
                "TLS certificate verification is disabled for the completion endpoint"
            );
        }

        let client = Client::builder()
            .connect_timeout(config.timeout)
            .read_timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            reducer: StreamReducer::new(),
        })
    }

    /// Full URL of the completion endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait::async_trait]
impl CompletionProvider for OpenAICompatibleProvider {
    async fn generate(&self, request: &ChatRequest) -> Result<String, Error> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            // Only read for the log; a failed response is never reduced as a stream
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                error = %OpenAIError::describe(&body),
                "completion API returned an error"
            );
            return Err(Error::status(status.as_u16(), body));
        }

        let lines = response.bytes_stream().lines();
        Ok(self.reducer.reduce(lines, StreamChunk::into_content).await)
    }
}
