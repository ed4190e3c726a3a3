//! Response builders for the functions.
//!
//! Every response carries the permissive CORS headers the browser client
//! needs; JSON bodies additionally carry `Content-Type`.

use serde::Serialize;
use serde_json::{Value, json};

use crate::errors::MediError;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

// ============================================================================
// Headers
// ============================================================================

#[must_use]
pub fn cors_headers() -> Value {
    json!({
        "Access-Control-Allow-Origin": ALLOW_ORIGIN,
        "Access-Control-Allow-Headers": ALLOW_HEADERS,
    })
}

#[must_use]
fn json_headers() -> Value {
    let mut headers = cors_headers();
    if let Some(map) = headers.as_object_mut() {
        map.insert("Content-Type".to_string(), json!("application/json"));
    }
    headers
}

// ============================================================================
// Response Builders
// ============================================================================

/// Returns a 200 response to a CORS pre-flight probe.
#[must_use]
pub fn preflight() -> Value {
    json!({
        "statusCode": 200,
        "headers": cors_headers(),
        "body": ""
    })
}

/// Returns a 200 OK response with `body` serialized as JSON.
#[must_use]
pub fn ok_json<T: Serialize>(body: &T) -> Value {
    match serde_json::to_string(body) {
        Ok(body) => json!({
            "statusCode": 200,
            "headers": json_headers(),
            "body": body
        }),
        Err(e) => err_response(500, &format!("Failed to serialize response: {e}")),
    }
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "headers": json_headers(),
        "body": json!({ "error": message }).to_string()
    })
}

/// Maps a domain error to its response. Generic upstream failures are
/// reported with `unavailable_message` instead of internal detail.
#[must_use]
pub fn error_for(error: &MediError, unavailable_message: &str) -> Value {
    match error {
        MediError::Unavailable(_) | MediError::Http(_) | MediError::MalformedResponse(_) => {
            err_response(500, unavailable_message)
        }
        other => err_response(other.status_code(), &other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preflight_carries_cors_headers_and_empty_body() {
        let response = preflight();
        assert_eq!(response["statusCode"], 200);
        assert_eq!(response["headers"]["Access-Control-Allow-Origin"], "*");
        assert_eq!(
            response["headers"]["Access-Control-Allow-Headers"],
            "authorization, x-client-info, apikey, content-type"
        );
        assert_eq!(response["body"], "");
    }

    #[test]
    fn test_err_response_is_json_with_cors() {
        let response = err_response(429, "slow down");
        assert_eq!(response["statusCode"], 429);
        assert_eq!(response["headers"]["Content-Type"], "application/json");
        assert_eq!(response["headers"]["Access-Control-Allow-Origin"], "*");
        let body: Value = serde_json::from_str(response["body"].as_str().unwrap()).unwrap();
        assert_eq!(body["error"], "slow down");
    }

    #[test]
    fn test_error_for_hides_upstream_detail() {
        let response = error_for(
            &MediError::Unavailable("status 503 from upstream".into()),
            "Summary service unavailable",
        );
        assert_eq!(response["statusCode"], 500);
        assert!(response["body"].as_str().unwrap().contains("Summary service unavailable"));

        let response = error_for(&MediError::QuotaExhausted, "Summary service unavailable");
        assert_eq!(response["statusCode"], 402);
        assert!(response["body"]
            .as_str()
            .unwrap()
            .contains("Payment required. Please add credits."));
    }
}
