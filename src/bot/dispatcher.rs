//! Long-polling update loop.

use super::handler::BotHandler;
use crate::telegram::TelegramClient;
use crate::Error;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinSet};

/// Pause after a failed `getUpdates` call before polling again.
const POLL_ERROR_PAUSE: Duration = Duration::from_secs(3);

/// Something went wrong while handling an update.
#[derive(Debug)]
pub enum UpdateFailure {
    /// The handler returned an error.
    Handler { update_id: i64, error: Error },
    /// The handler task panicked.
    Panicked { message: String },
}

/// Receives every [`UpdateFailure`]; these are never shown to users.
pub type ErrorHook = Arc<dyn Fn(UpdateFailure) + Send + Sync>;

/// Default error hook: log the failure.
pub fn log_failure(failure: UpdateFailure) {
    match failure {
        UpdateFailure::Handler { update_id, error } => {
            tracing::error!(update_id, error = %error, "Exception while handling an update");
        }
        UpdateFailure::Panicked { message } => {
            tracing::error!(panic = %message, "Update handler panicked");
        }
    }
}

/// Polls Telegram for updates and runs each one on its own task.
pub struct Dispatcher {
    telegram: TelegramClient,
    handler: Arc<BotHandler>,
    error_hook: ErrorHook,
}

impl Dispatcher {
    /// Create a new dispatcher that logs update failures.
    pub fn new(telegram: TelegramClient, handler: BotHandler) -> Self {
        Self {
            telegram,
            handler: Arc::new(handler),
            error_hook: Arc::new(log_failure),
        }
    }

    /// Replace the error hook.
    pub fn with_error_hook(mut self, hook: ErrorHook) -> Self {
        self.error_hook = hook;
        self
    }

    /// Poll until `shutdown` completes, then wait for in-flight updates.
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut shutdown = std::pin::pin!(shutdown);
        let mut tasks: JoinSet<Result<(), (i64, Error)>> = JoinSet::new();
        let mut offset = None;

        loop {
            while let Some(result) = tasks.try_join_next() {
                self.report(result);
            }

            let polled = tokio::select! {
                _ = &mut shutdown => break,
                polled = self.telegram.get_updates(offset) => polled,
            };

            match polled {
                Ok(updates) => {
                    for update in updates {
                        offset = Some(update.update_id + 1);

                        let handler = Arc::clone(&self.handler);
                        let update_id = update.update_id;
                        tasks.spawn(async move {
                            handler
                                .handle_update(update)
                                .await
                                .map_err(|error| (update_id, error))
                        });
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to fetch updates");
                    tokio::select! {
                        _ = &mut shutdown => break,
                        _ = tokio::time::sleep(POLL_ERROR_PAUSE) => {}
                    }
                }
            }
        }

        tracing::info!(in_flight = tasks.len(), "Stopping, waiting for in-flight updates");
        while let Some(result) = tasks.join_next().await {
            self.report(result);
        }
    }

    fn report(&self, result: Result<Result<(), (i64, Error)>, JoinError>) {
        let failure = match result {
            Ok(Ok(())) => return,
            Ok(Err((update_id, error))) => UpdateFailure::Handler { update_id, error },
            Err(e) if e.is_panic() => UpdateFailure::Panicked {
                message: panic_message(e),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Update task was cancelled");
                return;
            }
        };
        (self.error_hook)(failure);
    }
}

fn panic_message(error: JoinError) -> String {
    let payload = error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
