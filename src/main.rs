use llm_relay_bot::bot::{BotHandler, Dispatcher};
use llm_relay_bot::logging::{init_logging, LoggingConfig};
use llm_relay_bot::telegram::TelegramClient;
use llm_relay_bot::{BotConfig, Error, OpenAICompatibleProvider};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_logging(LoggingConfig::default());

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Bot stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Error> {
    let config = BotConfig::from_env()?;

    tracing::info!(
        model = %config.ai.model,
        base_url = %config.ai.base_url,
        "Starting AI Telegram Bot..."
    );

    let telegram = TelegramClient::new(&config.telegram)?;
    let provider = Arc::new(OpenAICompatibleProvider::new(&config.ai)?);

    let me = telegram.get_me().await?;
    let mut handler = BotHandler::new(telegram.clone(), provider, &config.ai);
    if let Some(username) = me.username {
        tracing::info!(username = %username, "Authorized");
        handler = handler.with_bot_username(username);
    }

    tracing::info!("Bot is running...");
    Dispatcher::new(telegram, handler)
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutdown requested");
        })
        .await;

    Ok(())
}
