use serde_json::Value;
use tracing::{error, info};

use super::{helpers, parsing};
use crate::ai::CompletionBackend;
use crate::ai::prompt_builder::build_translation_prompt;
use crate::core::models::{TranslateRequest, TranslateResponse};
use crate::errors::MediError;

pub const UNAVAILABLE_MESSAGE: &str = "Translation service unavailable";

/// `POST /translate`: `{text, sourceLanguage, targetLanguage, role}` → `{translatedText}`.
pub async fn handle_translate(backend: &dyn CompletionBackend, payload: &Value) -> Value {
    let request: TranslateRequest = match parsing::parse_json_body(payload) {
        Ok(r) => r,
        Err(e) => {
            error!("Translate request parse error: {}", e);
            return helpers::err_response(e.status_code(), &e.to_string());
        }
    };

    match translate(backend, &request).await {
        Ok(translated_text) => helpers::ok_json(&TranslateResponse {
            translated_text: Some(translated_text),
        }),
        Err(e) => {
            error!("Translation error: {}", e);
            helpers::error_for(&e, UNAVAILABLE_MESSAGE)
        }
    }
}

/// Translates one message. Same-language pairs and blank text are returned
/// unchanged without an upstream call.
pub async fn translate(
    backend: &dyn CompletionBackend,
    request: &TranslateRequest,
) -> Result<String, MediError> {
    if request.text.trim().is_empty()
        || request
            .source_language
            .trim()
            .eq_ignore_ascii_case(request.target_language.trim())
    {
        info!(role = %request.role, "Skipping translation: nothing to translate");
        return Ok(request.text.clone());
    }

    info!(
        role = %request.role,
        source = %request.source_language,
        target = %request.target_language,
        chars = request.text.chars().count(),
        "Translating message"
    );

    let prompt = build_translation_prompt(
        &request.text,
        &request.source_language,
        &request.target_language,
        request.role,
    );
    let translated = backend.complete(prompt).await?;
    Ok(translated.trim().to_string())
}
