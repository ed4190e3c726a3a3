use serde_json::Value;
use tracing::{error, info};

use super::{helpers, parsing};
use crate::ai::CompletionBackend;
use crate::ai::prompt_builder::build_summary_prompt;
use crate::core::models::{SummarizeRequest, SummarizeResponse};
use crate::errors::MediError;

pub const UNAVAILABLE_MESSAGE: &str = "Summary service unavailable";

/// `POST /summarize`: `{messages: [{role, content}]}` → `{summary}`.
pub async fn handle_summarize(backend: &dyn CompletionBackend, payload: &Value) -> Value {
    let request: SummarizeRequest = match parsing::parse_json_body(payload) {
        Ok(r) => r,
        Err(e) => {
            error!("Summarize request parse error: {}", e);
            return helpers::err_response(e.status_code(), &e.to_string());
        }
    };

    match summarize(backend, &request).await {
        Ok(summary) => helpers::ok_json(&SummarizeResponse {
            summary: Some(summary),
        }),
        Err(e) => {
            error!("Summary error: {}", e);
            helpers::error_for(&e, UNAVAILABLE_MESSAGE)
        }
    }
}

pub async fn summarize(
    backend: &dyn CompletionBackend,
    request: &SummarizeRequest,
) -> Result<String, MediError> {
    if request.messages.is_empty() {
        return Err(MediError::EmptyConversation);
    }

    info!(turns = request.messages.len(), "Summarizing conversation");

    backend.complete(build_summary_prompt(&request.messages)).await
}
