use super::commands::{classify, Command, Input};
use super::replies;
use crate::config::AiConfig;
use crate::provider::CompletionProvider;
use crate::telegram::{ChatAction, Message, TelegramClient, Update};
use crate::{ChatRequest, Error};
use std::sync::Arc;

/// Handles a single update: commands get static text, everything else is
/// relayed to the completion provider.
///
/// Holds no mutable state, so one instance serves all concurrent updates.
pub struct BotHandler {
    telegram: TelegramClient,
    provider: Arc<dyn CompletionProvider>,
    model: String,
    temperature: f32,
    bot_username: Option<String>,
}

impl BotHandler {
    /// Create a new handler.
    pub fn new(
        telegram: TelegramClient,
        provider: Arc<dyn CompletionProvider>,
        ai: &AiConfig,
    ) -> Self {
        Self {
            telegram,
            provider,
            model: ai.model.clone(),
            temperature: ai.temperature,
            bot_username: None,
        }
    }

    /// Username of the bot, used to recognise commands addressed to it.
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    /// Handle one update. Errors returned here come from talking to Telegram;
    /// completion failures are turned into reply text instead.
    pub async fn handle_update(&self, update: Update) -> Result<(), Error> {
        let Some(message) = update.message else {
            return Ok(());
        };
        let Some(text) = message.text.as_deref() else {
            return Ok(());
        };

        match classify(text, self.bot_username.as_deref()) {
            Input::Command(Command::Start) => self.reply(&message, replies::START_TEXT).await,
            Input::Command(Command::Help) => self.reply(&message, replies::HELP_TEXT).await,
            Input::Text(text) => self.relay(&message, text).await,
            Input::Ignored => {
                tracing::debug!(chat_id = message.chat.id, "ignoring unsupported command");
                Ok(())
            }
        }
    }

    async fn relay(&self, message: &Message, text: &str) -> Result<(), Error> {
        let user = message.sender_name();
        tracing::info!(user, chat_id = message.chat.id, "Received message: {text}");

        self.telegram
            .send_chat_action(message.chat.id, ChatAction::Typing)
            .await?;

        let answer = self.ai_reply(text).await;
        self.reply(message, &answer).await?;

        tracing::info!(user, chat_id = message.chat.id, "Sent response");
        Ok(())
    }

    /// Ask the model about `text`. Never fails: errors become apologetic replies.
    pub async fn ai_reply(&self, text: &str) -> String {
        let request = ChatRequest::single_turn(self.model.as_str(), text, self.temperature);

        match self.provider.generate(&request).await {
            Ok(answer) => answer,
            Err(e) => {
                match &e {
                    Error::Status { .. } => {}
                    e if e.is_transport() => tracing::error!(error = %e, "Request error"),
                    e => tracing::error!(error = ?e, "Unexpected error"),
                }
                replies::for_error(&e).to_string()
            }
        }
    }

    async fn reply(&self, message: &Message, text: &str) -> Result<(), Error> {
        for part in replies::split_message(text, replies::MAX_MESSAGE_UTF16) {
            self.telegram.send_message(message.chat.id, part).await?;
        }
        Ok(())
    }
}
