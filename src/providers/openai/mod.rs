//! OpenAI-compatible chat completions.

pub mod client;
pub mod types;

pub use client::OpenAICompatibleProvider;
pub use types::{ChatRequest, ChunkChoice, ChunkDelta, StreamChunk};
