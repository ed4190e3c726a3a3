//! Prompt shaping for the translate, summarize, and transcribe functions.

use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};

use crate::core::models::{Role, SummaryTurn};

/// Max characters kept from a caller-supplied language name.
pub const MAX_LANGUAGE_LEN: usize = 40;

/// Fixed section headings of the consultation summary, in output order.
pub const SUMMARY_SECTIONS: [&str; 4] = ["Symptoms", "Diagnosis", "Medications", "Recommendations"];

/// Sentence the model writes for a section with nothing to report.
pub const EMPTY_SECTION_PLACEHOLDER: &str = "Not discussed in conversation.";

const SUMMARY_SYSTEM_PROMPT: &str = "You are a medical AI assistant analyzing a doctor-patient conversation.
Based on the conversation, provide a structured summary with the following sections:

## Symptoms
List all symptoms mentioned by the patient, including severity and duration if mentioned.

## Diagnosis
Provide any diagnoses discussed or suspected conditions based on the conversation.

## Medications
List any medications mentioned, prescribed, or discussed, including dosage if specified.

## Recommendations
Include any lifestyle changes, follow-up appointments, or additional tests recommended.

Be concise but thorough. If a section has no relevant information, write \"Not discussed in conversation.\"";

/// Language names are interpolated into system prompts, so strip control
/// characters and hard-truncate.
#[must_use]
pub fn sanitize_language(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_LANGUAGE_LEN)
        .collect()
}

fn message(role: MessageRole, text: String) -> ChatCompletionMessage {
    ChatCompletionMessage {
        role,
        content: Content::Text(text),
        name: None,
        tool_calls: None,
        tool_call_id: None,
    }
}

fn register_hint(role: Role) -> &'static str {
    match role {
        Role::Doctor => {
            "The speaker is a doctor addressing a patient. Keep medical terms accurate, \
             but phrase them so a layperson can follow."
        }
        Role::Patient => {
            "The speaker is a patient describing their situation to a doctor. Keep the \
             patient's own wording for symptoms, severity and duration; do not add diagnoses."
        }
    }
}

#[must_use]
pub fn build_translation_prompt(
    text: &str,
    source_language: &str,
    target_language: &str,
    role: Role,
) -> Vec<ChatCompletionMessage> {
    let source = sanitize_language(source_language);
    let target = sanitize_language(target_language);

    let system = format!(
        "You are a professional medical interpreter translating a consultation from {source} to {target}. \
         {hint} Preserve names, numbers, dosages and units exactly. \
         Output ONLY the {target} translation, with no quotes, notes or explanations.",
        hint = register_hint(role),
    );

    vec![
        message(MessageRole::system, system),
        message(MessageRole::user, text.to_string()),
    ]
}

/// One `role: content` line per turn, in conversation order.
#[must_use]
pub fn format_conversation(turns: &[SummaryTurn]) -> String {
    turns
        .iter()
        .map(|t| format!("{}: {}", t.role, t.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[must_use]
pub fn build_summary_prompt(turns: &[SummaryTurn]) -> Vec<ChatCompletionMessage> {
    vec![
        message(MessageRole::system, SUMMARY_SYSTEM_PROMPT.to_string()),
        message(
            MessageRole::user,
            format!(
                "Please analyze this doctor-patient conversation:\n\n{}",
                format_conversation(turns)
            ),
        ),
    ]
}

/// No speech-to-text engine sits behind the transcribe function; the model
/// produces a short plausible utterance for the speaker instead.
#[must_use]
pub fn build_transcription_prompt(
    language: &str,
    role: Option<Role>,
) -> Vec<ChatCompletionMessage> {
    let language = sanitize_language(language);
    let speaker = role.unwrap_or(if language.eq_ignore_ascii_case("hindi") {
        Role::Patient
    } else {
        Role::Doctor
    });

    vec![
        message(
            MessageRole::system,
            format!(
                "You are simulating an audio transcription. Generate a realistic {language} medical \
                 conversation snippet that a {speaker} might say. Keep it brief (1-2 sentences) and \
                 medically relevant."
            ),
        ),
        message(
            MessageRole::user,
            "Generate a sample medical conversation snippet.".to_string(),
        ),
    ]
}
