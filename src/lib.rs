//! Relay between a Telegram bot and an OpenAI-compatible completion endpoint.
//!
//! Each incoming text message is sent as a single-turn, streaming chat
//! completion request; the streamed deltas are reduced into one reply that is
//! posted back to the chat.

pub mod accumulator;
pub mod bot;
pub mod config;
pub mod error;
pub mod line_stream;
pub mod logging;
pub mod provider;
pub mod providers;
pub mod telegram;
pub mod types;

// Re-export core types for easy usage
pub use accumulator::{ReducerConfig, ResponseAccumulator, StreamReducer, EMPTY_RESPONSE_FALLBACK};
pub use config::{AiConfig, BotConfig, TelegramConfig};
pub use error::Error;
pub use line_stream::{LineStream, LineStreamExt};
pub use provider::CompletionProvider;
pub use providers::openai::{ChatRequest, OpenAICompatibleProvider, StreamChunk};
pub use types::*;
