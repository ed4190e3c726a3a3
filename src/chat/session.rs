//! A doctor-patient consultation: role and language selection, search, and
//! the transient summary, layered over the message store.

use std::sync::Arc;

use tracing::{error, info};

use super::gateway::{FunctionsClient, SummaryGateway, TranscriptionGateway};
use super::store::{MessageStore, SendRequest};
use super::summary::request_summary;
use crate::core::config::ClientConfig;
use crate::core::languages::{
    DEFAULT_DOCTOR_LANGUAGE, DEFAULT_PATIENT_LANGUAGE, find_language, language_pair,
};
use crate::core::models::{AudioAttachment, Message, Role, TranscribeRequest};
use crate::errors::MediError;

/// Text used for an audio message whose transcription came back empty.
pub const AUDIO_PLACEHOLDER_TEXT: &str = "Audio message";

/// Notification text when an audio message cannot be processed.
pub const AUDIO_FAILURE_MESSAGE: &str = "Failed to process audio";

pub struct ConsultationSession {
    store: MessageStore,
    summarizer: Arc<dyn SummaryGateway>,
    transcriber: Arc<dyn TranscriptionGateway>,
    role: Role,
    doctor_language: String,
    patient_language: String,
    search_query: String,
    summary: Option<String>,
}

impl ConsultationSession {
    #[must_use]
    pub fn new(
        store: MessageStore,
        summarizer: Arc<dyn SummaryGateway>,
        transcriber: Arc<dyn TranscriptionGateway>,
    ) -> Self {
        Self {
            store,
            summarizer,
            transcriber,
            role: Role::Doctor,
            doctor_language: DEFAULT_DOCTOR_LANGUAGE.to_string(),
            patient_language: DEFAULT_PATIENT_LANGUAGE.to_string(),
            search_query: String::new(),
            summary: None,
        }
    }

    /// Wires every gateway to one shared functions client.
    #[must_use]
    pub fn connect(config: ClientConfig) -> Self {
        let client = Arc::new(FunctionsClient::new(config));
        Self::new(MessageStore::new(client.clone()), client.clone(), client)
    }

    #[must_use]
    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    #[must_use]
    pub fn doctor_language(&self) -> &str {
        &self.doctor_language
    }

    #[must_use]
    pub fn patient_language(&self) -> &str {
        &self.patient_language
    }

    /// # Errors
    ///
    /// Returns `UnsupportedLanguage` for names outside the language table.
    pub fn set_doctor_language(&mut self, name: &str) -> Result<(), MediError> {
        let language =
            find_language(name).ok_or_else(|| MediError::UnsupportedLanguage(name.to_string()))?;
        self.doctor_language = language.name.to_string();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `UnsupportedLanguage` for names outside the language table.
    pub fn set_patient_language(&mut self, name: &str) -> Result<(), MediError> {
        let language =
            find_language(name).ok_or_else(|| MediError::UnsupportedLanguage(name.to_string()))?;
        self.patient_language = language.name.to_string();
        Ok(())
    }

    /// `(source, target)` for a message from the active role.
    #[must_use]
    pub fn language_pair(&self) -> (&str, &str) {
        language_pair(self.role, &self.doctor_language, &self.patient_language)
    }

    #[must_use]
    pub fn input_placeholder(&self) -> String {
        format!("Type in {}...", self.language_pair().0)
    }

    fn send_request(&self, text: String) -> SendRequest {
        let (source, target) = self.language_pair();
        SendRequest::new(text, self.role, source, target)
    }

    pub async fn send_text(&self, text: &str) -> Message {
        self.store.send_message(self.send_request(text.to_string())).await
    }

    /// Transcribes a recording in the author's language, then sends the
    /// transcription with the recording attached.
    ///
    /// # Errors
    ///
    /// A transcription failure is returned and nothing is appended.
    pub async fn send_audio(
        &self,
        audio: AudioAttachment,
        audio_base64: &str,
    ) -> Result<Message, MediError> {
        let request = TranscribeRequest {
            audio_base64: audio_base64.to_string(),
            language: self.language_pair().0.to_string(),
            role: Some(self.role),
        };

        let transcription = self.transcriber.transcribe(&request).await.inspect_err(|e| {
            error!("{}: {}", AUDIO_FAILURE_MESSAGE, e);
        })?;

        let text = if transcription.trim().is_empty() {
            AUDIO_PLACEHOLDER_TEXT.to_string()
        } else {
            transcription
        };

        info!(duration_secs = audio.duration_secs, "Sending transcribed audio message");
        Ok(self
            .store
            .send_message(self.send_request(text).with_audio(audio))
            .await)
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Messages to render: the search view while a query is set.
    #[must_use]
    pub fn visible_messages(&self) -> Vec<Message> {
        if self.search_query.is_empty() {
            self.store.messages()
        } else {
            self.store.search_messages(&self.search_query)
        }
    }

    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Generates a summary of the full history and keeps it until the next
    /// successful generation or `clear`.
    ///
    /// # Errors
    ///
    /// On failure the previous summary, if any, is left in place.
    pub async fn generate_summary(&mut self) -> Result<&str, MediError> {
        let history = self.store.messages();
        let summary = request_summary(self.summarizer.as_ref(), &history).await?;
        Ok(self.summary.insert(summary).as_str())
    }

    pub fn clear(&mut self) {
        self.store.clear_messages();
        self.summary = None;
    }
}
