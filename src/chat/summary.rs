use tracing::{error, info};

use super::gateway::SummaryGateway;
use crate::core::models::{Message, SummaryTurn};
use crate::errors::{MediError, PAYMENT_REQUIRED_MESSAGE, RATE_LIMITED_MESSAGE};

/// Canonical failure message shown to users when summarization fails.
pub const SUMMARY_FAILURE_MESSAGE: &str = "Failed to generate summary";

/// Requests a structured summary of the whole conversation.
///
/// # Errors
///
/// Returns `EmptyConversation` without calling the gateway when there is
/// nothing to summarize; gateway errors are returned unchanged.
pub async fn request_summary(
    gateway: &dyn SummaryGateway,
    messages: &[Message],
) -> Result<String, MediError> {
    if messages.is_empty() {
        return Err(MediError::EmptyConversation);
    }

    let turns: Vec<SummaryTurn> = messages.iter().map(SummaryTurn::from).collect();
    info!(turns = turns.len(), "Requesting conversation summary");

    gateway.summarize(&turns).await.inspect_err(|e| {
        error!("Summary error: {}", e);
    })
}

/// Notification text for a failed summary request.
#[must_use]
pub fn user_facing_message(error: &MediError) -> &'static str {
    match error {
        MediError::EmptyConversation => "No messages to summarize",
        MediError::RateLimited => RATE_LIMITED_MESSAGE,
        MediError::QuotaExhausted => PAYMENT_REQUIRED_MESSAGE,
        _ => SUMMARY_FAILURE_MESSAGE,
    }
}
