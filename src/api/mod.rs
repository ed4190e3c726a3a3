//! Serverless functions: the translate, summarize, and transcribe proxies

pub mod handler;
pub mod helpers;
pub mod parsing;
pub mod summarize;
pub mod transcribe;
pub mod translate;

// Re-export the main handler for convenience
pub use handler::{handler, route, serve};
