//! Process configuration read from the environment.

use crate::Error;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_AI_BASE_URL: &str = "http://localhost:8000/v1";
pub const DEFAULT_AI_API_KEY: &str = "token-abc123";
pub const DEFAULT_AI_MODEL: &str = "HelpingAI/Dhanishtha-2.0-preview";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_AI_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for the completion endpoint.
#[derive(Clone, PartialEq)]
pub struct AiConfig {
    /// API root, `/chat/completions` is appended to it.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    /// Connect and per-read timeout of the completion call.
    pub timeout: Duration,
    /// Skip TLS certificate verification. Off unless explicitly enabled.
    pub accept_invalid_certs: bool,
}

impl AiConfig {
    /// Create configuration for an endpoint with default model settings.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Use a different model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Use a different timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_AI_BASE_URL.to_string(),
            api_key: DEFAULT_AI_API_KEY.to_string(),
            model: DEFAULT_AI_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_AI_TIMEOUT,
            accept_invalid_certs: false,
        }
    }
}

impl fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

/// Settings for the Telegram side.
#[derive(Clone, PartialEq)]
pub struct TelegramConfig {
    pub token: String,
    /// Bot API root, `/bot<token>/<method>` is appended to it.
    pub api_url: String,
    /// Long-poll timeout passed to `getUpdates`.
    pub poll_timeout: Duration,
}

impl TelegramConfig {
    /// Create configuration for the public Bot API.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        }
    }

    /// Point the client at another Bot API server.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("poll_timeout", &self.poll_timeout)
            .finish()
    }
}

/// Complete bot configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    pub telegram: TelegramConfig,
    pub ai: AiConfig,
}

impl BotConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let token = var("TELEGRAM_TOKEN")
            .ok_or_else(|| Error::config("TELEGRAM_TOKEN environment variable is not set"))?;

        let mut telegram = TelegramConfig::new(token.trim());
        if let Some(api_url) = var("TELEGRAM_API_URL") {
            telegram = telegram.with_api_url(api_url);
        }
        if let Some(secs) = parse_var::<u64>(&var, "TELEGRAM_POLL_TIMEOUT_SECS")? {
            telegram.poll_timeout = Duration::from_secs(secs);
        }

        let mut ai = AiConfig::new(
            var("AI_BASE_URL").unwrap_or_else(|| DEFAULT_AI_BASE_URL.to_string()),
            var("AI_API_KEY").unwrap_or_else(|| DEFAULT_AI_API_KEY.to_string()),
        );
        if let Some(model) = var("AI_MODEL") {
            ai.model = model;
        }
        if let Some(temperature) = parse_var::<f32>(&var, "AI_TEMPERATURE")? {
            ai.temperature = temperature;
        }
        if let Some(secs) = parse_var::<u64>(&var, "AI_TIMEOUT_SECS")? {
            ai.timeout = Duration::from_secs(secs);
        }
        if let Some(flag) = var("AI_ACCEPT_INVALID_CERTS") {
            ai.accept_invalid_certs = parse_flag(&flag).ok_or_else(|| {
                Error::config(format!(
                    "AI_ACCEPT_INVALID_CERTS must be true or false, got '{flag}'"
                ))
            })?;
        }

        Ok(Self { telegram, ai })
    }
}

fn parse_var<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, Error> {
    var(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|_| Error::config(format!("{key} has an invalid value: '{raw}'")))
        })
        .transpose()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
