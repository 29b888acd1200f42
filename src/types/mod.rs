//! Core types used throughout the library.

pub mod message;

// Re-export commonly used types
pub use message::*;
