//! Functions entrypoint - thin router that delegates to one module per function.
//!
//! This module handles:
//! - CORS pre-flight probes (answered before configuration is loaded)
//! - Method and path validation
//! - Building the completion client from configuration
//! - Dispatch to `translate`, `summarize`, or `transcribe`

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info, warn};

use super::{helpers, parsing, summarize, transcribe, translate};
use crate::ai::{CompletionBackend, LlmClient};
use crate::core::config::AppConfig;

pub use self::function_handler as handler;

/// The deployed functions, addressed by the last path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Translate,
    Summarize,
    Transcribe,
}

impl Function {
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let last = path.trim_end_matches('/').rsplit('/').next()?;
        match last {
            "translate" => Some(Self::Translate),
            "summarize" => Some(Self::Summarize),
            "transcribe" => Some(Self::Transcribe),
            _ => None,
        }
    }
}

/// Lambda handler for the functions entrypoint.
///
/// # Errors
///
/// Never fails the invocation for request or upstream problems; those are
/// returned as JSON error responses with CORS headers.
#[tracing::instrument(level = "info", skip(event))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    Ok(serve(AppConfig::from_env(), &event.payload).await)
}

/// Handles one proxy event against the completion gateway described by
/// `config`. Pre-flight and routing failures are answered before the
/// configuration is looked at.
pub async fn serve(config: Result<AppConfig, String>, payload: &Value) -> Value {
    let function = match resolve(payload) {
        Ok(f) => f,
        Err(response) => return response,
    };

    let config = match config {
        Ok(c) => c,
        Err(e) => {
            error!("Config error: {}", e);
            return helpers::err_response(500, &e);
        }
    };

    let client = match LlmClient::new(&config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to initialize completion client: {}", e);
            return helpers::err_response(500, &e.to_string());
        }
    };

    dispatch(&client, function, payload).await
}

/// Routes a proxy event to its function using the given completion backend.
pub async fn route(backend: &dyn CompletionBackend, payload: &Value) -> Value {
    match resolve(payload) {
        Ok(function) => dispatch(backend, function, payload).await,
        Err(response) => response,
    }
}

/// Picks the function for a request, or the response to send without one
/// (pre-flight, wrong method, unknown path).
fn resolve(payload: &Value) -> Result<Function, Value> {
    let method = parsing::request_method(payload).unwrap_or_else(|| "POST".to_string());

    if method == "OPTIONS" {
        return Err(helpers::preflight());
    }

    let path = parsing::request_path(payload).unwrap_or("");
    info!(method = %method, raw_path = %path, "Request received");

    if method != "POST" {
        warn!(method = %method, "Method not allowed");
        return Err(helpers::err_response(405, "Method not allowed"));
    }

    Function::from_path(path).ok_or_else(|| {
        warn!(raw_path = %path, "Unknown function");
        helpers::err_response(404, "Not found")
    })
}

async fn dispatch(backend: &dyn CompletionBackend, function: Function, payload: &Value) -> Value {
    if let Some(client_info) = payload
        .get("headers")
        .and_then(|h| parsing::get_header_value(h, "x-client-info"))
    {
        info!(client_info = %client_info, ?function, "Dispatching");
    }

    match function {
        Function::Translate => translate::handle_translate(backend, payload).await,
        Function::Summarize => summarize::handle_summarize(backend, payload).await,
        Function::Transcribe => transcribe::handle_transcribe(backend, payload).await,
    }
}
