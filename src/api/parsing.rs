use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::MediError;

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

/// HTTP method of an API Gateway proxy event (v2 first, then v1), uppercased.
pub fn request_method(payload: &Value) -> Option<String> {
    v_str(payload, &["requestContext", "http", "method"])
        .or_else(|| v_str(payload, &["httpMethod"]))
        .map(str::to_ascii_uppercase)
}

pub fn request_path(payload: &Value) -> Option<&str> {
    v_str(payload, &["rawPath"]).or_else(|| v_str(payload, &["path"]))
}

pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

/// Request body as text, decoding it when the gateway marked it base64.
pub fn extract_body(payload: &Value) -> Result<String, MediError> {
    let body = payload
        .get("body")
        .and_then(|b| b.as_str())
        .ok_or_else(|| MediError::InvalidRequest("Missing body".to_string()))?;

    let is_base64 = payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if !is_base64 {
        return Ok(body.to_string());
    }

    let bytes = STANDARD
        .decode(body)
        .map_err(|e| MediError::InvalidRequest(format!("Failed to decode body: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| MediError::InvalidRequest(format!("Body is not valid UTF-8: {e}")))
}

/// Extracts and deserializes the JSON body of a request.
pub fn parse_json_body<T: DeserializeOwned>(payload: &Value) -> Result<T, MediError> {
    let body = extract_body(payload)?;
    serde_json::from_str(&body)
        .map_err(|e| MediError::InvalidRequest(format!("Invalid JSON body: {e}")))
}
