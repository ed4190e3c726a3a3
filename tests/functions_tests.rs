use std::sync::Mutex;

use async_trait::async_trait;
use meditranslate::ai::CompletionBackend;
use meditranslate::api::{route, serve};
use meditranslate::core::config::AppConfig;
use meditranslate::errors::MediError;
use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Records every prompt and answers with a canned result.
struct FakeBackend {
    prompts: Mutex<Vec<Vec<String>>>,
    reply: fn() -> Result<String, MediError>,
}

impl FakeBackend {
    fn new(reply: fn() -> Result<String, MediError>) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            reply,
        }
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn last_prompt(&self) -> Vec<String> {
        self.prompts.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl CompletionBackend for FakeBackend {
    async fn complete(&self, prompt: Vec<ChatCompletionMessage>) -> Result<String, MediError> {
        let texts = prompt
            .iter()
            .map(|m| match &m.content {
                Content::Text(t) => t.clone(),
                Content::ImageUrl(_) => String::new(),
            })
            .collect();
        self.prompts.lock().unwrap().push(texts);
        (self.reply)()
    }
}

fn post(path: &str, body: &Value) -> Value {
    json!({
        "rawPath": path,
        "requestContext": { "http": { "method": "POST" } },
        "headers": { "content-type": "application/json", "x-client-info": "tests" },
        "body": body.to_string(),
        "isBase64Encoded": false
    })
}

fn body_of(response: &Value) -> Value {
    serde_json::from_str(response["body"].as_str().unwrap()).unwrap()
}

fn assert_cors(response: &Value) {
    assert_eq!(response["headers"]["Access-Control-Allow-Origin"], "*");
    assert_eq!(
        response["headers"]["Access-Control-Allow-Headers"],
        "authorization, x-client-info, apikey, content-type"
    );
}

#[tokio::test]
async fn test_preflight_is_answered_without_backend_call() {
    let backend = FakeBackend::new(|| Ok(String::new()));
    let request = json!({ "rawPath": "/translate", "requestContext": { "http": { "method": "OPTIONS" } } });

    let response = route(&backend, &request).await;

    assert_eq!(response["statusCode"], 200);
    assert_eq!(response["body"], "");
    assert_cors(&response);
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_translate_returns_translated_text() {
    let backend = FakeBackend::new(|| Ok("  नमस्ते\n".to_string()));
    let request = post(
        "/translate",
        &json!({ "text": "Hello", "sourceLanguage": "English", "targetLanguage": "Hindi", "role": "doctor" }),
    );

    let response = route(&backend, &request).await;

    assert_eq!(response["statusCode"], 200);
    assert_eq!(response["headers"]["Content-Type"], "application/json");
    assert_cors(&response);
    assert_eq!(body_of(&response), json!({ "translatedText": "नमस्ते" }));
    let prompt = backend.last_prompt();
    assert!(prompt[0].contains("from English to Hindi"));
    assert_eq!(prompt[1], "Hello");
}

#[tokio::test]
async fn test_translate_same_language_skips_upstream() {
    let backend = FakeBackend::new(|| Ok("should not be used".to_string()));
    let request = post(
        "/translate",
        &json!({ "text": "Hello", "sourceLanguage": "English", "targetLanguage": "english", "role": "patient" }),
    );

    let response = route(&backend, &request).await;

    assert_eq!(body_of(&response)["translatedText"], "Hello");
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_upstream_rate_limit_and_quota_map_to_distinct_statuses() {
    let request = post(
        "/summarize",
        &json!({ "messages": [{ "role": "patient", "content": "I have a fever" }] }),
    );

    let limited = route(&FakeBackend::new(|| Err(MediError::RateLimited)), &request).await;
    assert_eq!(limited["statusCode"], 429);
    assert_eq!(body_of(&limited)["error"], "Rate limit exceeded. Please try again later.");
    assert_cors(&limited);

    let broke = route(&FakeBackend::new(|| Err(MediError::QuotaExhausted)), &request).await;
    assert_eq!(broke["statusCode"], 402);
    assert_eq!(body_of(&broke)["error"], "Payment required. Please add credits.");
}

#[tokio::test]
async fn test_other_upstream_failures_are_generic_500() {
    let request = post(
        "/summarize",
        &json!({ "messages": [{ "role": "doctor", "content": "Any pain?" }] }),
    );

    let response = route(
        &FakeBackend::new(|| Err(MediError::Unavailable("AI gateway error (status 503)".into()))),
        &request,
    )
    .await;

    assert_eq!(response["statusCode"], 500);
    assert_eq!(body_of(&response)["error"], "Summary service unavailable");
}

#[tokio::test]
async fn test_summarize_builds_conversation_prompt() {
    let backend = FakeBackend::new(|| Ok("## Symptoms\nFever".to_string()));
    let request = post(
        "/summarize",
        &json!({ "messages": [
            { "role": "doctor", "content": "What brings you in?" },
            { "role": "patient", "content": "I have a fever" }
        ] }),
    );

    let response = route(&backend, &request).await;

    assert_eq!(body_of(&response), json!({ "summary": "## Symptoms\nFever" }));
    assert!(backend.last_prompt()[1]
        .ends_with("doctor: What brings you in?\npatient: I have a fever"));
}

#[tokio::test]
async fn test_summarize_rejects_empty_history() {
    let backend = FakeBackend::new(|| Ok("unused".to_string()));

    let response = route(&backend, &post("/summarize", &json!({ "messages": [] }))).await;

    assert_eq!(response["statusCode"], 400);
    assert_eq!(body_of(&response)["error"], "No messages to summarize");
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_transcribe_returns_transcription() {
    let backend = FakeBackend::new(|| Ok("मुझे बुखार है।".to_string()));
    let request = post(
        "/transcribe",
        &json!({ "audioBase64": "data:audio/webm;base64,AAAA", "language": "Hindi", "role": "patient" }),
    );

    let response = route(&backend, &request).await;

    assert_eq!(body_of(&response), json!({ "transcription": "मुझे बुखार है।" }));
    assert!(backend.last_prompt()[0].contains("realistic Hindi medical"));
}

#[tokio::test]
async fn test_transcribe_rejects_empty_audio() {
    let backend = FakeBackend::new(|| Ok("unused".to_string()));
    let request = post("/transcribe", &json!({ "audioBase64": "", "language": "Hindi" }));

    let response = route(&backend, &request).await;

    assert_eq!(response["statusCode"], 400);
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let backend = FakeBackend::new(|| Ok("unused".to_string()));
    let request = json!({
        "rawPath": "/translate",
        "requestContext": { "http": { "method": "POST" } },
        "body": "{not json"
    });

    let response = route(&backend, &request).await;

    assert_eq!(response["statusCode"], 400);
    assert_cors(&response);
    assert!(body_of(&response)["error"].as_str().unwrap().starts_with("Invalid request"));
}

#[tokio::test]
async fn test_unknown_path_and_wrong_method() {
    let backend = FakeBackend::new(|| Ok("unused".to_string()));

    let response = route(&backend, &post("/diagnose", &json!({}))).await;
    assert_eq!(response["statusCode"], 404);

    let request = json!({ "path": "/translate", "httpMethod": "GET" });
    let response = route(&backend, &request).await;
    assert_eq!(response["statusCode"], 405);
    assert_cors(&response);
}

fn without_gateway_key() -> Result<AppConfig, String> {
    AppConfig::from_lookup(|_| None)
}

#[tokio::test]
async fn test_missing_gateway_key_is_server_error() {
    let request = post(
        "/summarize",
        &json!({ "messages": [{ "role": "patient", "content": "I have a fever" }] }),
    );

    let response = serve(without_gateway_key(), &request).await;

    assert_eq!(response["statusCode"], 500);
    assert_cors(&response);
    assert_eq!(
        body_of(&response),
        json!({ "error": "AI_GATEWAY_API_KEY is not configured" })
    );
}

#[tokio::test]
async fn test_preflight_does_not_need_configuration() {
    let request = json!({
        "rawPath": "/summarize",
        "requestContext": { "http": { "method": "OPTIONS" } }
    });

    let response = serve(without_gateway_key(), &request).await;

    assert_eq!(response["statusCode"], 200);
    assert_eq!(response["body"], "");
    assert_cors(&response);
}

#[tokio::test]
async fn test_serve_forwards_translation_to_configured_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer gateway-key"))
        .and(body_partial_json(json!({ "model": "google/gemini-3-flash-preview" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "नमस्ते" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway_url = format!("{}/v1/chat/completions", server.uri());
    let config = AppConfig::from_lookup(|key| match key {
        "AI_GATEWAY_API_KEY" => Some("gateway-key".to_string()),
        "AI_GATEWAY_URL" => Some(gateway_url.clone()),
        _ => None,
    });
    let request = post(
        "/translate",
        &json!({
            "text": "Hello",
            "sourceLanguage": "English",
            "targetLanguage": "Hindi",
            "role": "doctor"
        }),
    );

    let response = serve(config, &request).await;

    assert_eq!(response["statusCode"], 200);
    assert_eq!(body_of(&response), json!({ "translatedText": "नमस्ते" }));
}

#[tokio::test]
async fn test_serve_reports_gateway_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let gateway_url = format!("{}/v1/chat/completions", server.uri());
    let config = AppConfig::from_lookup(|key| match key {
        "AI_GATEWAY_API_KEY" => Some("gateway-key".to_string()),
        "AI_GATEWAY_URL" => Some(gateway_url.clone()),
        _ => None,
    });
    let request = post(
        "/summarize",
        &json!({ "messages": [{ "role": "doctor", "content": "Any allergies?" }] }),
    );

    let response = serve(config, &request).await;

    assert_eq!(response["statusCode"], 429);
    assert_eq!(
        body_of(&response),
        json!({ "error": "Rate limit exceeded. Please try again later." })
    );
}
