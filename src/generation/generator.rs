//! 아이디어 생성 / 리믹스 파이프라인
//!
//! 지시문과 스키마로 요청을 만들고, 응답 JSON을 파싱해 id를 부여합니다.
//! 공유 상태는 건드리지 않습니다 (상태 전이는 호출자 책임).

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::derive::is_remix_eligible;
use crate::error::IdeaError;
use crate::generation::prompts::{idea_prompt, remix_prompt};
use crate::generation::provider::{GenerationRequest, IdeationProvider};
use crate::generation::schema::{IDEA_RESPONSE_SCHEMA, REMIX_RESPONSE_SCHEMA};
use crate::models::{GenerateParams, Idea, IdeaDraft, RemixDraft, RemixParams, RemixedIdea};

/// 리믹스에 넘기는 최대 원본 아이디어 수
pub const MAX_REMIX_SOURCES: usize = 5;

pub const INSUFFICIENT_SOURCES_MESSAGE: &str =
    "Không có đủ ý tưởng chất lượng cao (Top Tier hoặc điểm > 4.5) để trộn.";

/// 리믹스 지시문에 들어가는 원본 아이디어 요약
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemixSource {
    pub title: String,
    pub category: String,
    pub total_score: f64,
    pub creative_strategy: String,
    pub variation_type: String,
}

/// 리믹스 가능한 아이디어를 컬렉션 순서대로 최대 5개 요약
pub fn select_remix_sources(ideas: &[Idea]) -> Vec<RemixSource> {
    ideas
        .iter()
        .filter(|idea| is_remix_eligible(idea))
        .take(MAX_REMIX_SOURCES)
        .map(|idea| RemixSource {
            title: idea.upgraded_title.clone(),
            category: idea.category.clone(),
            total_score: idea.total_score,
            creative_strategy: idea.creative_strategy.clone(),
            variation_type: idea.variation_type.clone(),
        })
        .collect()
}

/// 응답 텍스트를 아이디어 목록으로 변환 (순서 유지, 정렬 없음)
pub fn parse_ideas(text: &str) -> Result<Vec<Idea>, serde_json::Error> {
    let drafts: Vec<IdeaDraft> = serde_json::from_str(text.trim())?;
    Ok(drafts
        .into_iter()
        .map(|draft| draft.into_idea(Uuid::new_v4().to_string()))
        .collect())
}

/// `originalTheme`과 일치하는 첫 아이디어 (upgradedTitle 또는 title 비교)
pub fn find_original<'a>(theme: &str, ideas: &'a [Idea]) -> Option<&'a Idea> {
    ideas
        .iter()
        .find(|idea| idea.upgraded_title == theme || idea.title == theme)
}

/// 응답 텍스트를 리믹스 목록으로 변환. 원본을 못 찾으면 대체 아이디어를 붙입니다.
pub fn parse_remixes(text: &str, existing: &[Idea]) -> Result<Vec<RemixedIdea>, serde_json::Error> {
    let drafts: Vec<RemixDraft> = serde_json::from_str(text.trim())?;
    Ok(drafts
        .into_iter()
        .map(|draft| {
            let original = match find_original(&draft.original_theme, existing) {
                Some(idea) => idea.clone(),
                None => {
                    warn!(
                        theme = %draft.original_theme,
                        "Could not find original idea for remix theme"
                    );
                    Idea::placeholder(&draft.original_theme)
                }
            };
            draft.into_remixed(Uuid::new_v4().to_string(), original)
        })
        .collect())
}

/// 생성 서비스 호출 래퍼
#[derive(Clone)]
pub struct IdeaGenerator {
    provider: Arc<dyn IdeationProvider>,
}

impl IdeaGenerator {
    pub fn new(provider: Arc<dyn IdeationProvider>) -> Self {
        Self { provider }
    }

    /// 키워드/유형/모드/깊이로 아이디어 생성
    pub async fn generate_ideas(&self, params: &GenerateParams) -> Result<Vec<Idea>, IdeaError> {
        params.validate()?;

        let request = GenerationRequest {
            prompt: idea_prompt(params),
            response_schema: IDEA_RESPONSE_SCHEMA.clone(),
        };

        let started = Instant::now();
        info!(
            keywords = %params.keywords.trim(),
            video_type = ?params.video_type,
            overdrive = params.creative_overdrive,
            depth = params.information_depth,
            "Generating ideas"
        );

        let text = self.provider.generate_content(&request).await.map_err(|e| {
            error!("Error calling generation service: {}", e);
            IdeaError::Generation {
                cause: e.to_string(),
                details: e.details().map(str::to_string),
            }
        })?;

        let ideas = parse_ideas(&text).map_err(|e| {
            error!("Generation response is not a valid idea array: {}", e);
            IdeaError::Generation {
                cause: format!("invalid response: {}", e),
                details: Some(text.clone()),
            }
        })?;

        info!(
            count = ideas.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Ideas generated"
        );
        Ok(ideas)
    }

    /// 기존 상위 아이디어를 새 키워드와 섞어 확장
    pub async fn remix_ideas(
        &self,
        params: &RemixParams,
        existing: &[Idea],
    ) -> Result<Vec<RemixedIdea>, IdeaError> {
        params.validate()?;

        let sources = select_remix_sources(existing);
        if sources.is_empty() {
            return Err(IdeaError::Precondition(INSUFFICIENT_SOURCES_MESSAGE.to_string()));
        }

        let sources_json = serde_json::to_string_pretty(&sources)
            .map_err(|e| IdeaError::Remix {
                cause: format!("failed to serialize sources: {}", e),
                details: None,
            })?;

        let request = GenerationRequest {
            prompt: remix_prompt(&sources_json, &params.keywords, params.mix_mode),
            response_schema: REMIX_RESPONSE_SCHEMA.clone(),
        };

        let started = Instant::now();
        info!(
            keywords = %params.keywords.trim(),
            mix_mode = ?params.mix_mode,
            sources = sources.len(),
            "Remixing ideas"
        );

        let text = self.provider.generate_content(&request).await.map_err(|e| {
            error!("Error calling generation service for remixing: {}", e);
            IdeaError::Remix {
                cause: e.to_string(),
                details: e.details().map(str::to_string),
            }
        })?;

        let remixed = parse_remixes(&text, existing).map_err(|e| {
            error!("Remix response is not a valid remix array: {}", e);
            IdeaError::Remix {
                cause: format!("invalid response: {}", e),
                details: Some(text.clone()),
            }
        })?;

        info!(
            count = remixed.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Ideas remixed"
        );
        Ok(remixed)
    }
}
