//! Idea Matrix Error Types
//!
//! 애플리케이션 전역 에러 타입 정의.
//! 사용자에게 보이는 메시지는 베트남어로 통일합니다.

use serde::Serialize;
use thiserror::Error;

/// 아이디어 생성/리믹스 파이프라인 에러
#[derive(Error, Debug)]
pub enum IdeaError {
    /// 서비스 자격 증명 누락 등 시작 시점의 치명적 설정 오류
    #[error("Lỗi cấu hình: {0}")]
    Configuration(String),

    #[error("Dữ liệu không hợp lệ: {0}")]
    InvalidInput(String),

    /// 리믹스할 고품질 아이디어가 없음 (네트워크 호출 전에 실패)
    #[error("{0}")]
    Precondition(String),

    /// 아이디어 생성 호출 실패 (네트워크, 비-JSON 응답, 스키마 위반).
    /// `cause`와 `details`는 명령 응답의 `details`로만 전달됩니다.
    #[error("Không thể tạo ý tưởng từ mô hình AI.")]
    Generation {
        cause: String,
        details: Option<String>,
    },

    /// 리믹스 호출 실패
    #[error("Không thể trộn ý tưởng từ mô hình AI.")]
    Remix {
        cause: String,
        details: Option<String>,
    },

    #[error("Không tìm thấy ý tưởng: {0}")]
    IdeaNotFound(String),

    #[error("Thao tác không hợp lệ: {0}")]
    InvalidOperation(String),

    #[error("Không thể truy cập trạng thái ứng dụng: {0}")]
    Lock(String),
}

impl IdeaError {
    /// 실패 원인과 응답 본문 (생성/리믹스 실패에만 있음)
    pub fn details(&self) -> Option<String> {
        match self {
            IdeaError::Generation { cause, details } | IdeaError::Remix { cause, details } => {
                Some(match details {
                    Some(body) => format!("{}\n{}", cause, body),
                    None => cause.clone(),
                })
            }
            _ => None,
        }
    }
}

/// Tauri 명령 응답용 직렬화 가능한 에러
#[derive(Debug, Serialize)]
pub struct CommandError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl From<IdeaError> for CommandError {
    fn from(error: IdeaError) -> Self {
        let code = match &error {
            IdeaError::Configuration(_) => "CONFIGURATION_ERROR",
            IdeaError::InvalidInput(_) => "INVALID_INPUT",
            IdeaError::Precondition(_) => "PRECONDITION_FAILED",
            IdeaError::Generation { .. } => "GENERATION_FAILED",
            IdeaError::Remix { .. } => "REMIX_FAILED",
            IdeaError::IdeaNotFound(_) => "IDEA_NOT_FOUND",
            IdeaError::InvalidOperation(_) => "INVALID_OPERATION",
            IdeaError::Lock(_) => "LOCK_ERROR",
        };

        CommandError {
            code: code.to_string(),
            message: error.to_string(),
            details: error.details(),
        }
    }
}

/// Tauri 명령 결과 타입
pub type CommandResult<T> = Result<T, CommandError>;
