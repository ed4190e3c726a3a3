use serde_json::Value;
use tracing::{error, info};

use super::{helpers, parsing};
use crate::ai::CompletionBackend;
use crate::ai::prompt_builder::build_transcription_prompt;
use crate::core::models::{TranscribeRequest, TranscribeResponse};
use crate::errors::MediError;

pub const UNAVAILABLE_MESSAGE: &str = "Transcription service unavailable";

/// `POST /transcribe`: `{audioBase64, language, role?}` → `{transcription}`.
pub async fn handle_transcribe(backend: &dyn CompletionBackend, payload: &Value) -> Value {
    let request: TranscribeRequest = match parsing::parse_json_body(payload) {
        Ok(r) => r,
        Err(e) => {
            error!("Transcribe request parse error: {}", e);
            return helpers::err_response(e.status_code(), &e.to_string());
        }
    };

    match transcribe(backend, &request).await {
        Ok(transcription) => helpers::ok_json(&TranscribeResponse {
            transcription: Some(transcription),
        }),
        Err(e) => {
            error!("Transcription error: {}", e);
            helpers::error_for(&e, UNAVAILABLE_MESSAGE)
        }
    }
}

pub async fn transcribe(
    backend: &dyn CompletionBackend,
    request: &TranscribeRequest,
) -> Result<String, MediError> {
    if request.audio_base64.trim().is_empty() {
        return Err(MediError::InvalidRequest("audioBase64 is empty".to_string()));
    }

    info!(
        language = %request.language,
        audio_chars = request.audio_base64.len(),
        "Transcribing audio"
    );

    let text = backend
        .complete(build_transcription_prompt(&request.language, request.role))
        .await?;
    Ok(text.trim().to_string())
}
