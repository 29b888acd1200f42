use crate::types::ChatMessage;
use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub stream: bool,
}

impl ChatRequest {
    /// Create a streaming request carrying one user message and no history.
    pub fn single_turn(model: impl Into<String>, user_message: impl Into<String>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(user_message)],
            temperature,
            stream: true,
        }
    }
}

/// One `data:` payload of a streaming chat completion.
///
/// Every field is defaulted so that chunks without content (role-only deltas,
/// usage reports, keep-alives) still parse and simply yield nothing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

/// A choice inside a streaming chunk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The incremental part of a choice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

impl StreamChunk {
    /// Text delta of the first choice (`choices[0].delta.content`), if any.
    pub fn content(&self) -> Option<&str> {
        self.choices.first()?.delta.content.as_deref()
    }

    /// Owned variant of [`StreamChunk::content`].
    pub fn into_content(self) -> Option<String> {
        self.choices.into_iter().next()?.delta.content
    }
}

/// OpenAI error response.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIError {
    pub error: ErrorDetails,
}

/// Error details from an OpenAI-compatible API.
#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)] // For error handling and debugging
pub struct ErrorDetails {
    pub message: String,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

impl OpenAIError {
    /// Best readable description of an error body: the API's message, else the raw body.
    pub fn describe(body: &str) -> String {
        serde_json::from_str::<OpenAIError>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest::single_turn("test-model", "Hi there", 0.5);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "test-model",
                "messages": [{"role": "user", "content": "Hi there"}],
                "temperature": 0.5,
                "stream": true
            })
        );
    }

    #[test]
    fn test_chunk_content_access() {
        let chunk: StreamChunk =
            serde_json::from_str(r#"{"id":"x","choices":[{"index":0,"delta":{"content":"Hel"}}]}"#)
                .unwrap();
        assert_eq!(chunk.content(), Some("Hel"));
        assert_eq!(chunk.into_content(), Some("Hel".to_string()));
    }

    #[test]
    fn test_chunk_without_content() {
        let role_only: StreamChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{"role":"assistant"}}]}"#).unwrap();
        assert_eq!(role_only.content(), None);

        let no_choices: StreamChunk = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(no_choices.content(), None);

        let empty: StreamChunk = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.into_content(), None);

        let finished: StreamChunk = serde_json::from_str(
            r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#,
        )
        .unwrap();
        assert_eq!(finished.choices[0].finish_reason.as_deref(), Some("stop"));
        assert_eq!(finished.content(), None);
    }

    #[test]
    fn test_chunk_with_wrong_shape_is_rejected() {
        assert!(serde_json::from_str::<StreamChunk>(r#"{"choices":"nope"}"#).is_err());
        assert!(serde_json::from_str::<StreamChunk>(r#"[1,2,3]"#).is_err());
    }

    #[test]
    fn test_describe_error_body() {
        let body = r#"{"error":{"message":"model not found","type":"invalid_request_error"}}"#;
        assert_eq!(OpenAIError::describe(body), "model not found");
        assert_eq!(OpenAIError::describe(" Bad Gateway \n"), "Bad Gateway");
    }
}
