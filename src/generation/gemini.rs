//! Gemini REST API 클라이언트
//!
//! `generateContent`를 구조화 출력 모드(`application/json` + `responseSchema`)로 호출합니다.
//! 재시도는 하지 않습니다.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::GeminiConfig;
use crate::error::IdeaError;
use crate::generation::provider::{GenerationRequest, IdeationProvider, ProviderError};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    status: Option<String>,
}

/// Gemini 생성 서비스 클라이언트
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, IdeaError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| IdeaError::Configuration(format!("Không thể khởi tạo HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base, self.config.model
        )
    }
}

/// 요청 본문 생성
pub fn build_request_body(request: &GenerationRequest) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": request.prompt }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": request.response_schema
        }
    })
}

/// 응답 본문에서 첫 번째 후보의 텍스트를 추출
pub fn extract_text(body: &str) -> Result<String, ProviderError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.clone())
    {
        return Err(ProviderError::Blocked(reason));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(ProviderError::EmptyResponse)?;

    let text = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return match candidate.finish_reason {
            Some(reason) if reason != "STOP" => Err(ProviderError::Blocked(reason)),
            _ => Err(ProviderError::EmptyResponse),
        };
    }

    Ok(text)
}

fn status_error(status: reqwest::StatusCode, body: String) -> ProviderError {
    let message = match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(parsed) => match parsed.error.status {
            Some(s) => format!("{} ({})", parsed.error.message, s),
            None => parsed.error.message,
        },
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string(),
    };
    ProviderError::Status {
        status: status.as_u16(),
        message,
        details: Some(body),
    }
}

#[async_trait]
impl IdeationProvider for GeminiClient {
    async fn generate_content(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        debug!(
            model = %self.config.model,
            prompt_chars = request.prompt.chars().count(),
            "Sending generateContent request"
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&build_request_body(request))
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Request(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(status_error(status, body));
        }

        extract_text(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let request = GenerationRequest {
            prompt: "hello".to_string(),
            response_schema: json!({ "type": "ARRAY" }),
        };
        let body = build_request_body(&request);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "ARRAY");
    }

    #[test]
    fn test_endpoint_uses_model() {
        let mut config = GeminiConfig::new("k");
        config.api_base = "http://localhost:9000/v1beta".to_string();
        let client = GeminiClient::new(config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"[{\"a\":"},{"text":"1}]"}]},"finishReason":"STOP"}]}"#;
        assert_eq!(extract_text(body).unwrap(), r#"[{"a":1}]"#);
    }

    #[test]
    fn test_extract_text_blocked_prompt() {
        let body = r#"{"candidates":[],"promptFeedback":{"blockReason":"SAFETY"}}"#;
        assert!(matches!(extract_text(body), Err(ProviderError::Blocked(r)) if r == "SAFETY"));
    }

    #[test]
    fn test_extract_text_empty_candidates() {
        assert!(matches!(extract_text(r#"{"candidates":[]}"#), Err(ProviderError::EmptyResponse)));
        assert!(matches!(
            extract_text("<html>"),
            Err(ProviderError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_status_error_uses_api_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        let err = status_error(reqwest::StatusCode::BAD_REQUEST, body.to_string());
        assert_eq!(
            err.to_string(),
            "service returned 400: API key not valid. (INVALID_ARGUMENT)"
        );
        assert_eq!(err.details(), Some(body));
    }
}
