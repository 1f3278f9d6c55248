//! Gemini gateway — the single point of entry for all generative AI calls.
//!
//! Wraps the `generateContent` REST endpoint. One attempt per user-triggered
//! operation; failures surface as `AppError::Service`, with the
//! credential-invalid case distinguished as `AppError::Auth`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::types::{AiRequest, Citation, GatewayReply};
use crate::error::AppError;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// The model used for all generative calls.
pub const MODEL: &str = "gemini-2.5-flash";

// Bounds a hung gateway call; there is no cancellation path above this.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP client for the Gemini API. Cheap to clone; holds the credential read
/// from `GEMINI_API_KEY` at startup.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()))
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Execute one generate call. Returns the concatenated response text plus
    /// any grounding citations.
    pub async fn generate(&self, request: &AiRequest) -> Result<GatewayReply, AppError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Auth(
                "GEMINI_API_KEY is not set. Configure it before using AI features.".into(),
            )
        })?;

        let body = build_body(request);
        let url = format!("{GEMINI_API_URL}/{MODEL}:generateContent");

        tracing::debug!(
            structured = request.structured_output,
            grounded = request.grounded_search,
            "Calling Gemini generateContent"
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Service(format!("AI service request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body_text)
                .map(|e| e.error.message)
                .unwrap_or(body_text);
            tracing::warn!(status = %status, "Gemini call failed: {}", message);
            return Err(classify_api_error(status.as_u16(), message));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            AppError::Service(format!("AI service returned an unreadable response: {e}"))
        })?;

        Ok(into_reply(parsed))
    }
}

/// Map a non-success API status to the error taxonomy. Credential problems
/// get their own variant so the frontend can show the key-setup message.
fn classify_api_error(status: u16, message: String) -> AppError {
    if status == 401 || status == 403 || message.contains("API key not valid") {
        return AppError::Auth(
            "API key invalid. Please ensure your GEMINI_API_KEY environment variable is correctly set."
                .into(),
        );
    }
    AppError::Service(format!("AI service returned {status}: {message}"))
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct GenerateContentBody<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

#[derive(Serialize)]
struct Tool {
    #[serde(rename = "googleSearch")]
    google_search: EmptyConfig,
}

#[derive(Serialize)]
struct EmptyConfig {}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "groundingMetadata")]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<GroundingSource>,
    #[serde(rename = "retrievedContext")]
    retrieved_context: Option<GroundingSource>,
}

#[derive(Debug, Deserialize)]
struct GroundingSource {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

fn build_body(request: &AiRequest) -> GenerateContentBody<'_> {
    // JSON response mode and search grounding are mutually exclusive on this
    // endpoint; grounding wins.
    let generation_config = (request.structured_output && !request.grounded_search).then(|| {
        GenerationConfig {
            response_mime_type: "application/json",
        }
    });
    let tools = request
        .grounded_search
        .then(|| vec![Tool { google_search: EmptyConfig {} }]);

    GenerateContentBody {
        contents: vec![Content {
            parts: vec![Part {
                text: &request.prompt,
            }],
        }],
        generation_config,
        tools,
    }
}

fn into_reply(response: GenerateContentResponse) -> GatewayReply {
    let mut text = String::new();
    let mut citations = Vec::new();

    if let Some(candidate) = response.candidates.into_iter().next() {
        if let Some(content) = candidate.content {
            for part in content.parts {
                if let Some(t) = part.text {
                    text.push_str(&t);
                }
            }
        }
        if let Some(meta) = candidate.grounding_metadata {
            for chunk in meta.grounding_chunks {
                if let Some(source) = chunk.web.or(chunk.retrieved_context) {
                    citations.push(Citation {
                        uri: source.uri,
                        title: source.title,
                    });
                }
            }
        }
    }

    GatewayReply { text, citations }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(structured: bool, grounded: bool) -> AiRequest {
        AiRequest {
            prompt: "hello".into(),
            structured_output: structured,
            grounded_search: grounded,
        }
    }

    #[test]
    fn test_structured_body_sets_json_mime_type() {
        let req = request(true, false);
        let body = build_body(&req);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert!(json.get("tools").is_none());
    }

    #[test]
    fn test_grounded_body_uses_search_tool_without_mime_type() {
        let req = request(true, true);
        let body = build_body(&req);
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("generationConfig").is_none());
        assert!(json["tools"][0].get("googleSearch").is_some());
    }

    #[test]
    fn test_plain_body_has_neither() {
        let req = request(false, false);
        let body = build_body(&req);
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("generationConfig").is_none());
        assert!(json.get("tools").is_none());
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn test_into_reply_concatenates_parts_and_collects_citations() {
        let raw = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "Hello "}, {"text": "world"}]},
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"uri": "https://example.com", "title": "Example"}},
                        {"retrievedContext": {"uri": "https://ctx.example.com"}}
                    ]
                }
            }]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let reply = into_reply(parsed);
        assert_eq!(reply.text, "Hello world");
        assert_eq!(reply.citations.len(), 2);
        assert_eq!(reply.citations[0].uri.as_deref(), Some("https://example.com"));
        assert_eq!(reply.citations[1].title, None);
    }

    #[test]
    fn test_into_reply_tolerates_empty_response() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        let reply = into_reply(parsed);
        assert_eq!(reply.text, "");
        assert!(reply.citations.is_empty());
    }

    #[test]
    fn test_classify_api_error_distinguishes_credentials() {
        assert!(matches!(
            classify_api_error(403, "forbidden".into()),
            AppError::Auth(_)
        ));
        assert!(matches!(
            classify_api_error(400, "API key not valid. Please pass a valid API key.".into()),
            AppError::Auth(_)
        ));
        assert!(matches!(
            classify_api_error(500, "boom".into()),
            AppError::Service(_)
        ));
    }

    #[tokio::test]
    async fn test_generate_without_credential_fails_fast() {
        let client = GeminiClient::new(None);
        let err = client.generate(&request(false, false)).await.unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));
    }
}
