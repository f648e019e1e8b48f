//! Idea Commands
//!
//! 아이디어 생성/리믹스와 화면 상태 관련 Tauri 명령어.
//! 모든 명령은 갱신된 상태 스냅샷을 돌려줍니다.

use serde::Deserialize;
use tauri::State;

use crate::error::{CommandError, CommandResult};
use crate::models::{GenerateParams, MixMode, RemixParams, VideoType, ViewMode};
use crate::state::{AppSnapshot, IdeaController};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateIdeasArgs {
    pub keywords: String,
    pub video_type: Option<VideoType>,
    pub creative_overdrive: Option<bool>,
    pub information_depth: Option<u8>,
}

impl From<GenerateIdeasArgs> for GenerateParams {
    fn from(args: GenerateIdeasArgs) -> Self {
        GenerateParams {
            keywords: args.keywords,
            video_type: args.video_type.unwrap_or_default(),
            creative_overdrive: args.creative_overdrive.unwrap_or(false),
            information_depth: args.information_depth.unwrap_or(3),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemixIdeasArgs {
    pub keywords: String,
    pub mix_mode: Option<MixMode>,
}

/// 아이디어 생성
#[tauri::command]
pub async fn generate_ideas(
    args: GenerateIdeasArgs,
    controller: State<'_, IdeaController>,
) -> CommandResult<AppSnapshot> {
    controller
        .generate(args.into())
        .await
        .map_err(CommandError::from)
}

/// 상위 아이디어 리믹스
#[tauri::command]
pub async fn remix_ideas(
    args: RemixIdeasArgs,
    controller: State<'_, IdeaController>,
) -> CommandResult<AppSnapshot> {
    let params = RemixParams {
        keywords: args.keywords,
        mix_mode: args.mix_mode.unwrap_or_default(),
    };
    controller.remix(params).await.map_err(CommandError::from)
}

/// 아이디어 상세 보기
#[tauri::command]
pub fn select_idea(
    idea_id: String,
    controller: State<'_, IdeaController>,
) -> CommandResult<AppSnapshot> {
    controller.select_idea(&idea_id).map_err(CommandError::from)
}

/// 개요로 돌아가기 (리믹스 결과도 정리)
#[tauri::command]
pub fn clear_selection(controller: State<'_, IdeaController>) -> CommandResult<AppSnapshot> {
    controller.clear_selection().map_err(CommandError::from)
}

#[tauri::command]
pub fn set_view_mode(
    view_mode: ViewMode,
    controller: State<'_, IdeaController>,
) -> CommandResult<AppSnapshot> {
    controller.set_view_mode(view_mode).map_err(CommandError::from)
}

#[tauri::command]
pub fn get_snapshot(controller: State<'_, IdeaController>) -> CommandResult<AppSnapshot> {
    controller.snapshot().map_err(CommandError::from)
}
