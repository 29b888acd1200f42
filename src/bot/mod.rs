//! Telegram bot on top of the completion provider.

pub mod commands;
pub mod dispatcher;
pub mod handler;
pub mod replies;

pub use commands::{classify, Command, Input};
pub use dispatcher::{log_failure, Dispatcher, ErrorHook, UpdateFailure};
pub use handler::BotHandler;
