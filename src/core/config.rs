use std::env;
use std::time::Duration;
use url::Url;

pub const DEFAULT_AI_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
pub const DEFAULT_AI_MODEL: &str = "google/gemini-3-flash-preview";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Configuration for the serverless functions. The credential never leaves
/// the server side.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ai_gateway_api_key: String,
    pub ai_gateway_url: Url,
    pub ai_model: String,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests never touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ai_gateway_api_key = lookup("AI_GATEWAY_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| "AI_GATEWAY_API_KEY is not configured".to_string())?;

        let raw_url =
            lookup("AI_GATEWAY_URL").unwrap_or_else(|| DEFAULT_AI_GATEWAY_URL.to_string());
        let ai_gateway_url =
            Url::parse(&raw_url).map_err(|e| format!("AI_GATEWAY_URL: {}", e))?;

        let ai_model = lookup("AI_MODEL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AI_MODEL.to_string());

        let timeout_secs = match lookup("AI_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| format!("AI_REQUEST_TIMEOUT_SECS: {}", e))?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            ai_gateway_api_key,
            ai_gateway_url,
            ai_model,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Configuration for the browser-side functions client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub functions_base_url: Url,
    pub anon_key: String,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup("MEDITRANSLATE_FUNCTIONS_URL")
            .ok_or_else(|| "MEDITRANSLATE_FUNCTIONS_URL is not configured".to_string())?;
        let anon_key = lookup("MEDITRANSLATE_ANON_KEY")
            .ok_or_else(|| "MEDITRANSLATE_ANON_KEY is not configured".to_string())?;

        Ok(Self {
            functions_base_url: normalize_base_url(&raw)?,
            anon_key,
        })
    }

    /// Absolute URL of one deployed function.
    pub fn function_url(&self, name: &str) -> Result<Url, String> {
        self.functions_base_url
            .join(name)
            .map_err(|e| format!("function url for {name}: {e}"))
    }
}

// `Url::join` drops the last path segment unless the base ends with '/'.
fn normalize_base_url(raw: &str) -> Result<Url, String> {
    let mut base = raw.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Url::parse(&base).map_err(|e| format!("MEDITRANSLATE_FUNCTIONS_URL: {}", e))
}
