//! Idea Matrix - AI 아이디어 생성/리믹스 백엔드 라이브러리
//!
//! 외부 생성 서비스 호출, 화면용 파생 데이터 계산, 앱 상태 관리를 담당합니다.
//! `desktop` 기능을 켜면 Tauri 셸과 명령어가 함께 빌드됩니다.

#![recursion_limit = "256"]

#[cfg(feature = "desktop")]
pub mod commands;
pub mod config;
pub mod derive;
pub mod error;
pub mod generation;
pub mod models;
pub mod state;

pub use config::GeminiConfig;
pub use error::{CommandError, CommandResult, IdeaError};
pub use generation::{GeminiClient, IdeaGenerator, IdeationProvider};
pub use state::{AppSnapshot, AppState, IdeaController};

use std::sync::Arc;

/// 로그 구독자 설치. `RUST_LOG`가 없으면 `info` 레벨. 여러 번 호출해도 안전합니다.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

/// 환경 파일과 환경 변수로 Gemini 기반 컨트롤러 구성
pub fn controller_from_env() -> Result<IdeaController, IdeaError> {
    config::load_env_files();
    let config = GeminiConfig::from_env()?;
    tracing::info!(model = %config.model, "Gemini configuration loaded");

    let client = GeminiClient::new(config)?;
    Ok(IdeaController::new(IdeaGenerator::new(Arc::new(client))))
}

/// Tauri 앱 실행
#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use tauri::Manager;

    init_tracing();

    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .setup(|app| {
            // API 키가 없으면 시작 실패
            let controller = controller_from_env().map_err(|e| {
                tracing::error!("{}", e);
                e
            })?;
            app.manage(controller);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::ideas::generate_ideas,
            commands::ideas::remix_ideas,
            commands::ideas::select_idea,
            commands::ideas::clear_selection,
            commands::ideas::set_view_mode,
            commands::ideas::get_snapshot,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
