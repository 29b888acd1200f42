//! Logging initialisation.

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_TARGET: &str = "llm_relay_bot";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    pub colorize: bool,
    /// Targets enabled at `level` when `RUST_LOG` is not set.
    pub log_targets: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            colorize: true,
            log_targets: vec![DEFAULT_LOG_TARGET.to_string()],
        }
    }
}

const fn level_to_str(level: Level) -> &'static str {
    match level {
        Level::TRACE => "trace",
        Level::DEBUG => "debug",
        Level::INFO => "info",
        Level::WARN => "warn",
        Level::ERROR => "error",
    }
}

fn build_filter_string(targets: &[String], level: Level) -> String {
    let level = level_to_str(level);
    if targets.is_empty() {
        return format!("{DEFAULT_LOG_TARGET}={level}");
    }
    targets
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber. `RUST_LOG` overrides the configured filter.
/// Calling it again is a no-op.
pub fn init_logging(config: LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(build_filter_string(&config.log_targets, config.level)));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_ansi(config.colorize)
        .with_file(true)
        .with_line_number(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .try_init();
}
