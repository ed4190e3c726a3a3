//! Client side of the deployed functions.
//!
//! Each trait is a single-shot call with no retry; the store and session
//! decide what a failure means.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::core::config::ClientConfig;
use crate::core::models::{
    ErrorBody, SummarizeRequest, SummarizeResponse, SummaryTurn, TranscribeRequest,
    TranscribeResponse, TranslateRequest, TranslateResponse,
};
use crate::errors::MediError;

#[async_trait]
pub trait TranslationGateway: Send + Sync {
    /// Returns the translated text, which may be empty.
    ///
    /// # Errors
    ///
    /// Transport failures, non-2xx statuses, and a response without
    /// `translatedText` are all errors.
    async fn translate(&self, request: &TranslateRequest) -> Result<String, MediError>;
}

#[async_trait]
pub trait SummaryGateway: Send + Sync {
    /// # Errors
    ///
    /// Returns `RateLimited`, `QuotaExhausted`, or `Unavailable` as reported
    /// by the function.
    async fn summarize(&self, turns: &[SummaryTurn]) -> Result<String, MediError>;
}

#[async_trait]
pub trait TranscriptionGateway: Send + Sync {
    /// Returns the transcription, empty when the function produced none.
    ///
    /// # Errors
    ///
    /// Same taxonomy as the other gateways.
    async fn transcribe(&self, request: &TranscribeRequest) -> Result<String, MediError>;
}

/// HTTP client for the translate, summarize, and transcribe functions.
pub struct FunctionsClient {
    http: Client,
    config: ClientConfig,
}

impl FunctionsClient {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    async fn invoke<B, R>(&self, function: &str, body: &B) -> Result<R, MediError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let url = self
            .config
            .function_url(function)
            .map_err(MediError::Config)?;

        debug!(function, url = %url, "Invoking function");

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.config.anon_key)
            .header("apikey", &self.config.anon_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&raw)
                .map(|b| b.error)
                .unwrap_or_else(|_| format!("{function} failed with status {status}"));
            warn!(function, status = status.as_u16(), error = %detail, "Function returned an error");
            return Err(MediError::from_status(status.as_u16(), detail));
        }

        let parsed = response.json::<R>().await.map_err(|e| {
            MediError::MalformedResponse(format!("{function} response: {e}"))
        })?;
        Ok(parsed)
    }
}

#[async_trait]
impl TranslationGateway for FunctionsClient {
    async fn translate(&self, request: &TranslateRequest) -> Result<String, MediError> {
        let response: TranslateResponse = self.invoke("translate", request).await?;
        response
            .translated_text
            .ok_or_else(|| MediError::MalformedResponse("missing translatedText".to_string()))
    }
}

#[async_trait]
impl SummaryGateway for FunctionsClient {
    async fn summarize(&self, turns: &[SummaryTurn]) -> Result<String, MediError> {
        let request = SummarizeRequest {
            messages: turns.to_vec(),
        };
        let response: SummarizeResponse = self.invoke("summarize", &request).await?;
        response
            .summary
            .ok_or_else(|| MediError::MalformedResponse("missing summary".to_string()))
    }
}

#[async_trait]
impl TranscriptionGateway for FunctionsClient {
    async fn transcribe(&self, request: &TranscribeRequest) -> Result<String, MediError> {
        let response: TranscribeResponse = self.invoke("transcribe", request).await?;
        Ok(response.transcription.unwrap_or_default())
    }
}
