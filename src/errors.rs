use thiserror::Error;

/// Fixed user-facing text for an upstream rate limit.
pub const RATE_LIMITED_MESSAGE: &str = "Rate limit exceeded. Please try again later.";

/// Fixed user-facing text for an exhausted upstream quota.
pub const PAYMENT_REQUIRED_MESSAGE: &str = "Payment required. Please add credits.";

#[derive(Debug, Error)]
pub enum MediError {
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Payment required. Please add credits.")]
    QuotaExhausted,

    #[error("{0}")]
    Unavailable(String),

    #[error("Failed to send HTTP request: {0}")]
    Http(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No messages to summarize")]
    EmptyConversation,

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("{0}")]
    Config(String),
}

impl MediError {
    /// Maps an upstream HTTP status onto the error taxonomy.
    ///
    /// 429 and 402 are kept distinct so the operator can tell "wait" from
    /// "add billing credit"; everything else collapses to `Unavailable`.
    #[must_use]
    pub fn from_status(status: u16, detail: impl Into<String>) -> Self {
        match status {
            429 => Self::RateLimited,
            402 => Self::QuotaExhausted,
            _ => Self::Unavailable(detail.into()),
        }
    }

    /// HTTP status used when this error is returned by one of the functions.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::RateLimited => 429,
            Self::QuotaExhausted => 402,
            Self::InvalidRequest(_) | Self::EmptyConversation | Self::UnsupportedLanguage(_) => {
                400
            }
            Self::Unavailable(_) | Self::Http(_) | Self::MalformedResponse(_) | Self::Config(_) => {
                500
            }
        }
    }
}

impl From<reqwest::Error> for MediError {
    fn from(error: reqwest::Error) -> Self {
        MediError::Http(error.to_string())
    }
}

impl From<serde_json::Error> for MediError {
    fn from(error: serde_json::Error) -> Self {
        MediError::MalformedResponse(error.to_string())
    }
}
