//! MediTranslate - doctor-patient chat with real-time machine translation and
//! AI-generated consultation summaries.
//!
//! The crate has two halves:
//! 1. The serverless functions (`api`) that shape prompts and forward them to
//!    an AI completion gateway, keeping the gateway credential server-side
//! 2. The browser-side conversation core (`chat`): the message store, the
//!    gateway clients that call the functions, and the consultation session
//!
//! # Architecture
//!
//! The system uses:
//! - AWS Lambda (`lambda_runtime`) behind an API gateway for the functions
//! - reqwest for every outbound HTTP call
//! - openai-api-rs message types for prompt construction
//! - Tokio for async runtime and the store's notification channel
//!
//! # Example
//!
//! ```no_run
//! use meditranslate::chat::ConsultationSession;
//! use meditranslate::core::config::ClientConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     meditranslate::setup_logging();
//!
//!     let config = ClientConfig::from_env()?;
//!     let mut session = ConsultationSession::connect(config);
//!
//!     let message = session.send_text("Where does it hurt?").await;
//!     println!("{} -> {}", message.original_text, message.translated_text);
//!
//!     match session.generate_summary().await {
//!         Ok(summary) => println!("{summary}"),
//!         Err(e) => eprintln!("{}", meditranslate::chat::summary::user_facing_message(&e)),
//!     }
//!
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod ai;
pub mod api;
pub mod chat;
pub mod core;
pub mod errors;

pub use errors::MediError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration. It should be called once at process start.
///
/// # Example
///
/// ```
/// meditranslate::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    tracing_subscriber::registry().with(fmt_layer).init();
}
