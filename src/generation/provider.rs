//! 아이디어 생성 제공자 인터페이스
//!
//! 실제 제공자(Gemini)는 비결정적이므로 테스트에서는 스크립트 제공자로 교체합니다.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// 지시문 + 구조화 출력 스키마
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub prompt: String,
    pub response_schema: Value,
}

/// 제공자 호출 오류 (호출 맥락 없이 원인만 담음)
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("service returned {status}: {message}")]
    Status {
        status: u16,
        message: String,
        details: Option<String>,
    },

    #[error("prompt was blocked: {0}")]
    Blocked(String),

    #[error("service returned no content")]
    EmptyResponse,

    #[error("unreadable service response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// 서비스가 돌려준 원본 응답 본문 (있을 때만)
    pub fn details(&self) -> Option<&str> {
        match self {
            ProviderError::Status { details, .. } => details.as_deref(),
            _ => None,
        }
    }
}

/// 구조화 출력을 돌려주는 외부 생성 서비스
#[async_trait]
pub trait IdeationProvider: Send + Sync {
    /// 지시문을 보내고 원시 응답 텍스트(스키마를 따르는 JSON 배열 기대)를 받음
    async fn generate_content(&self, request: &GenerationRequest) -> Result<String, ProviderError>;
}

#[cfg(test)]
pub(crate) mod scripted {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// 미리 정해둔 응답을 순서대로 돌려주는 테스트용 제공자
    #[derive(Default)]
    pub struct ScriptedProvider {
        replies: Mutex<VecDeque<Result<String, ProviderError>>>,
        prompts: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, text: impl Into<String>) -> Self {
            self.replies.lock().unwrap().push_back(Ok(text.into()));
            self
        }

        pub fn fail(self, error: ProviderError) -> Self {
            self.replies.lock().unwrap().push_back(Err(error));
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_prompt(&self) -> Option<String> {
            self.prompts.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl IdeationProvider for ScriptedProvider {
        async fn generate_content(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(request.prompt.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ProviderError::EmptyResponse))
        }
    }
}
