//! All AI completion functionality

pub mod client;
pub mod prompt_builder;

pub use client::{CompletionBackend, LlmClient, estimate_tokens};
