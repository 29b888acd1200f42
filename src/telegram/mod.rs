//! Telegram Bot API access.

pub mod client;
pub mod types;

pub use client::TelegramClient;
pub use types::{ChatAction, Message, Update, User};
