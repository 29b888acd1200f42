//! Reduction of a streamed completion into a single reply text.

use crate::Error;
use futures_util::{Stream, StreamExt};
use serde::de::DeserializeOwned;

/// Reply used when the stream produced no text at all.
pub const EMPTY_RESPONSE_FALLBACK: &str = "I couldn't generate a response.";

/// How raw stream lines are recognised.
#[derive(Debug, Clone, PartialEq)]
pub struct ReducerConfig {
    /// Prefix stripped from a line before parsing (`data:`).
    pub intro: String,
    /// Lines (after stripping the intro) that carry no payload.
    pub skip_markers: Vec<String>,
    /// Returned by [`ResponseAccumulator::finalize`] when nothing was accumulated.
    pub fallback: String,
}

impl Default for ReducerConfig {
    /// Server-sent events as emitted by OpenAI-compatible `/chat/completions`.
    fn default() -> Self {
        Self {
            intro: "data:".to_string(),
            skip_markers: vec!["[DONE]".to_string(), String::new()],
            fallback: EMPTY_RESPONSE_FALLBACK.to_string(),
        }
    }
}

impl ReducerConfig {
    /// The payload of a line, or `None` for sentinel lines.
    pub fn payload<'a>(&self, line: &'a str) -> Option<&'a str> {
        let line = line.trim();
        let payload = match line.strip_prefix(self.intro.as_str()) {
            Some(rest) => rest.trim_start(),
            None => line,
        };

        if self.skip_markers.iter().any(|marker| marker == payload) {
            None
        } else {
            Some(payload)
        }
    }
}

/// Accumulates text fragments extracted from stream lines.
#[derive(Debug, Default)]
pub struct ResponseAccumulator {
    config: ReducerConfig,
    content: String,
    /// Lines that could not be parsed and were skipped.
    skipped: usize,
}

impl ResponseAccumulator {
    /// Create a new accumulator for OpenAI-style streams.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an accumulator with custom line handling.
    pub fn with_config(config: ReducerConfig) -> Self {
        Self {
            config,
            content: String::new(),
            skipped: 0,
        }
    }

    /// Process one raw line.
    ///
    /// The payload is parsed as `T`; lines that fail to parse are counted
    /// and skipped, they never abort the accumulation.
    pub fn process_line<T, F>(&mut self, line: &str, extract: F)
    where
        T: DeserializeOwned,
        F: FnOnce(T) -> Option<String>,
    {
        let Some(payload) = self.config.payload(line) else {
            return;
        };

        match serde_json::from_str::<T>(payload) {
            Ok(chunk) => {
                if let Some(fragment) = extract(chunk) {
                    self.content.push_str(&fragment);
                }
            }
            Err(e) => {
                self.skipped += 1;
                tracing::debug!(error = %e, "skipping unparseable stream line");
            }
        }
    }

    /// Get the text accumulated so far (untrimmed).
    pub fn current_content(&self) -> &str {
        &self.content
    }

    /// Number of lines skipped because they were not valid chunks.
    pub fn skipped_lines(&self) -> usize {
        self.skipped
    }

    /// Finalize into the reply text: trimmed, or the fallback if empty.
    pub fn finalize(self) -> String {
        let text = self.content.trim();
        if text.is_empty() {
            self.config.fallback
        } else {
            text.to_string()
        }
    }
}

/// Drives a [`ResponseAccumulator`] over a stream of lines.
#[derive(Debug, Clone, Default)]
pub struct StreamReducer {
    config: ReducerConfig,
}

impl StreamReducer {
    /// Create a reducer for OpenAI-style streams.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reducer with custom line handling.
    pub fn with_config(config: ReducerConfig) -> Self {
        Self { config }
    }

    /// Consume `lines` until the stream ends and return the reply text.
    ///
    /// Errors from the stream are not propagated: an undecodable line is
    /// skipped and a dropped connection ends the stream, keeping what was
    /// received so far.
    pub async fn reduce<S, T, F>(&self, lines: S, mut extract: F) -> String
    where
        S: Stream<Item = Result<String, Error>>,
        T: DeserializeOwned,
        F: FnMut(T) -> Option<String>,
    {
        let mut accumulator = ResponseAccumulator::with_config(self.config.clone());
        let mut lines = std::pin::pin!(lines);

        while let Some(line) = lines.next().await {
            match line {
                Ok(line) => accumulator.process_line(&line, &mut extract),
                Err(e) => tracing::warn!(
                    error = %e,
                    received = accumulator.current_content().len(),
                    "error while reading completion stream"
                ),
            }
        }

        if accumulator.skipped_lines() > 0 {
            tracing::debug!(skipped = accumulator.skipped_lines(), "completion stream had malformed lines");
        }

        accumulator.finalize()
    }
}
