/// LLM Client: the single point of entry for all analysis-provider calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All LLM interactions MUST go through this module.
///
/// One request per call. No retries, no request timeout beyond the transport's own.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Explicit client configuration. A missing `api_key` still builds a client;
/// every call then fails with `LlmError::MissingApiKey` before touching the network.
#[derive(Debug, Clone)]
pub struct AnalysisClientConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for AnalysisClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
pub struct ContentPart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl LlmResponse {
    /// Concatenated text of the first candidate, or `None` if it carries no text.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// The single LLM client used by the analysis service.
/// Wraps the Gemini `generateContent` endpoint with structured-output helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: AnalysisClientConfig,
}

impl LlmClient {
    pub fn new(config: AnalysisClientConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .user_agent(concat!("unistatement/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn has_api_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Makes one raw call, returning the full response object.
    pub async fn call(&self, prompt: &str, response_schema: &Value) -> Result<LlmResponse, LlmError> {
        let api_key = self.config.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse error message
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("LLM API returned {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        if let Some(usage) = &llm_response.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(llm_response)
    }

    /// Calls the model with a response schema and returns the raw JSON text,
    /// with any markdown fences removed. Parsing is left to the caller.
    pub async fn generate_structured(
        &self,
        prompt: &str,
        response_schema: &Value,
    ) -> Result<String, LlmError> {
        let response = self.call(prompt, response_schema).await?;
        let Some(text) = response.text() else {
            let finish_reason = response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.as_deref())
                .unwrap_or("none");
            warn!("LLM returned no text (finish_reason={finish_reason})");
            return Err(LlmError::EmptyContent);
        };
        Ok(strip_json_fences(&text).to_string())
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    fn client_for(base_url: &str, api_key: Option<&str>) -> LlmClient {
        LlmClient::new(AnalysisClientConfig {
            api_key: api_key.map(str::to_string),
            model: "gemini-test".to_string(),
            base_url: base_url.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_response_text_joins_parts_of_first_candidate() {
        let response: LlmResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "{\"a\":" }, { "text": " 1}" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_response_text_none_without_candidates_or_text() {
        let empty: LlmResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.text().is_none());

        let blocked: LlmResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        }))
        .unwrap();
        assert!(blocked.text().is_none());

        let blank: LlmResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "  " }] } }]
        }))
        .unwrap();
        assert!(blank.text().is_none());
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_network() {
        // Nothing listens on port 9; a network attempt would be an Http error.
        let client = client_for("http://127.0.0.1:9", None);
        assert!(!client.has_api_key());
        let err = client.call("prompt", &json!({})).await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_request_shape_sent_to_provider() {
        let (base_url, captured) =
            stub::spawn(StatusCode::OK, stub::text_reply("{\"ok\": true}")).await;
        let client = client_for(&base_url, Some("secret-key"));
        let schema = json!({ "type": "OBJECT" });

        let text = client.generate_structured("Evaluate this.", &schema).await.unwrap();
        assert_eq!(text, "{\"ok\": true}");

        let body = captured.body.lock().unwrap().clone().unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Evaluate this.");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"], schema);
        assert_eq!(
            captured.api_key.lock().unwrap().as_deref(),
            Some("secret-key")
        );
        assert_eq!(
            captured.path.lock().unwrap().as_deref(),
            Some("/v1beta/models/gemini-test:generateContent")
        );
    }

    #[tokio::test]
    async fn test_fenced_reply_is_unwrapped() {
        let (base_url, _) =
            stub::spawn(StatusCode::OK, stub::text_reply("```json\n{\"x\": 2}\n```")).await;
        let client = client_for(&base_url, Some("k"));
        let text = client.generate_structured("p", &json!({})).await.unwrap();
        assert_eq!(text, "{\"x\": 2}");
    }

    #[tokio::test]
    async fn test_empty_reply_is_empty_content() {
        let (base_url, _) = stub::spawn(StatusCode::OK, json!({ "candidates": [] })).await;
        let client = client_for(&base_url, Some("k"));
        let err = client.generate_structured("p", &json!({})).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[tokio::test]
    async fn test_error_status_surfaces_provider_message() {
        let (base_url, _) = stub::spawn(
            StatusCode::BAD_REQUEST,
            json!({ "error": { "code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT" } }),
        )
        .await;
        let client = client_for(&base_url, Some("bad"));
        match client.call("p", &json!({})).await.unwrap_err() {
            LlmError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let (base_url, captured) = stub::spawn(
            StatusCode::SERVICE_UNAVAILABLE,
            json!({ "error": { "message": "overloaded" } }),
        )
        .await;
        let client = client_for(&base_url, Some("k"));
        let err = client.call("p", &json!({})).await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 503, .. }));
        assert_eq!(captured.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_http_error() {
        let client = client_for("http://127.0.0.1:9", Some("k"));
        let err = client.call("p", &json!({})).await.unwrap_err();
        assert!(matches!(err, LlmError::Http(_)));
    }
}
