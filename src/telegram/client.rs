use super::types::{
    ApiResponse, ChatAction, GetUpdates, Message, SendChatAction, SendMessage, Update, User,
};
use crate::config::TelegramConfig;
use crate::Error;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Extra time granted to a long-poll request on top of its poll timeout.
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Minimal Telegram Bot API client.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    token: String,
    api_url: String,
    poll_timeout: Duration,
}

impl TelegramClient {
    /// Create a new client from Telegram settings.
    pub fn new(config: &TelegramConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.poll_timeout + POLL_GRACE)
            .build()?;

        Ok(Self {
            client,
            token: config.token.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            poll_timeout: config.poll_timeout,
        })
    }

    /// Call a Bot API method and unwrap its envelope.
    async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, Error>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        // The token is part of the URL, keep it out of error messages
        let response = self
            .client
            .post(format!("{}/bot{}/{}", self.api_url, self.token, method))
            .json(params)
            .send()
            .await
            .map_err(|e| Error::Http(e.without_url()))?;

        let envelope: ApiResponse<R> = response
            .json()
            .await
            .map_err(|e| Error::Http(e.without_url()))?;

        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse {
                description,
                error_code,
                ..
            } => Err(Error::provider(
                "Telegram",
                format!(
                    "{method} failed ({}): {}",
                    error_code.map_or_else(|| "no code".to_string(), |c| c.to_string()),
                    description.unwrap_or_else(|| "no description".to_string())
                ),
            )),
        }
    }

    /// Identity of the bot behind the token.
    pub async fn get_me(&self) -> Result<User, Error> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-poll for updates newer than `offset`.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, Error> {
        let params = GetUpdates {
            offset,
            timeout: self.poll_timeout.as_secs(),
            allowed_updates: vec!["message".to_string()],
        };
        self.call("getUpdates", &params).await
    }

    /// Send a plain-text message.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message, Error> {
        self.call("sendMessage", &SendMessage { chat_id, text }).await
    }

    /// Show a chat action such as "typing" to the user.
    pub async fn send_chat_action(&self, chat_id: i64, action: ChatAction) -> Result<bool, Error> {
        self.call("sendChatAction", &SendChatAction { chat_id, action })
            .await
    }
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("api_url", &self.api_url)
            .field("poll_timeout", &self.poll_timeout)
            .finish_non_exhaustive()
    }
}
