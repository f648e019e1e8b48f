//! Application State Controller
//!
//! 아이디어/리믹스 컬렉션, 선택, 오류, 보기 모드를 한 곳에서 소유합니다.
//! 요청마다 티켓을 발급하고, 더 새로운 요청이 나온 뒤 도착한 결과는 버립니다.

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tracing::{info, warn};

use crate::derive::{
    chart_series, dashboard_summary, matrix_rows, rank_by_total, remix_comparison,
    score_breakdown, ChartSeries, DashboardSummary, MatrixRow, RemixComparison, ScoreBar,
};
use crate::error::IdeaError;
use crate::generation::IdeaGenerator;
use crate::models::{GenerateParams, Idea, RemixParams, RemixedIdea, ViewMode};

pub const GENERATING_MESSAGE: &str = "AI đang sáng tạo ý tưởng...";
pub const REMIXING_MESSAGE: &str = "AI đang trộn và mở rộng ý tưởng...";

/// 요청 순번
pub type Ticket = u64;

/// 진행 상태 (보관된 플래그와 오류 슬롯에서 계산)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "camelCase")]
pub enum Phase {
    Idle,
    Generating,
    Remixing,
    Error(String),
}

/// 화면 초점
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "ideaId", rename_all = "camelCase")]
pub enum Focus {
    Overview,
    DetailOn(String),
    RemixResultsShown,
}

/// 프론트엔드에 넘기는 상태 스냅샷
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSnapshot {
    pub phase: Phase,
    pub focus: Focus,
    pub view_mode: ViewMode,
    pub loading_message: Option<String>,
    /// 총점 내림차순
    pub ideas: Vec<Idea>,
    pub remixed_ideas: Vec<RemixedIdea>,
    pub selected_idea: Option<Idea>,
    pub selected_scores: Vec<ScoreBar>,
    pub error: Option<String>,
    pub remix_error: Option<String>,
    pub dashboard: Option<DashboardSummary>,
    pub matrix_rows: Vec<MatrixRow>,
    pub chart_series: Vec<ChartSeries>,
    pub remix_comparisons: Vec<RemixComparison>,
    /// 마지막 생성 완료 시각 (epoch millis)
    pub generated_at: Option<i64>,
}

#[derive(Debug, Default)]
pub struct AppState {
    ideas: Vec<Idea>,
    remixed: Vec<RemixedIdea>,
    selected_id: Option<String>,
    remix_view: bool,
    error: Option<String>,
    remix_error: Option<String>,
    view_mode: ViewMode,
    generated_at: Option<i64>,
    last_ticket: Ticket,
    pending_generate: Option<Ticket>,
    pending_remix: Option<Ticket>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_ticket(&mut self) -> Ticket {
        self.last_ticket += 1;
        self.last_ticket
    }

    /// 생성 시작. 이전 결과, 선택, 두 오류 슬롯을 즉시 비우고 진행 중인 요청을 무효화합니다.
    pub fn begin_generate(&mut self) -> Ticket {
        let ticket = self.next_ticket();
        if let Some(superseded) = self.pending_remix.take() {
            info!(ticket = superseded, "Pending remix superseded by generation");
        }
        self.pending_generate = Some(ticket);
        self.ideas.clear();
        self.remixed.clear();
        self.selected_id = None;
        self.remix_view = false;
        self.error = None;
        self.remix_error = None;
        ticket
    }

    /// 생성 결과 반영. 티켓이 현재 것이 아니면 버리고 `false`를 돌려줍니다.
    pub fn finish_generate(&mut self, ticket: Ticket, result: Result<Vec<Idea>, IdeaError>) -> bool {
        if self.pending_generate != Some(ticket) {
            warn!(ticket, "Discarding stale generation result");
            return false;
        }
        self.pending_generate = None;

        match result {
            Ok(ideas) => {
                self.ideas = ideas;
                self.view_mode = ViewMode::Dashboard;
                self.generated_at = Some(chrono::Utc::now().timestamp_millis());
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// 리믹스 시작. 이전 리믹스 결과와 선택을 비우고 현재 아이디어 사본을 돌려줍니다.
    /// 생성이나 다른 리믹스가 진행 중이면 거부합니다.
    pub fn begin_remix(&mut self) -> Result<(Ticket, Vec<Idea>), IdeaError> {
        if self.pending_generate.is_some() {
            return Err(IdeaError::InvalidOperation(
                "Đang tạo ý tưởng, hãy đợi trước khi trộn.".to_string(),
            ));
        }
        if self.pending_remix.is_some() {
            return Err(IdeaError::InvalidOperation(
                "Đang trộn ý tưởng, hãy đợi kết quả.".to_string(),
            ));
        }
        let ticket = self.next_ticket();
        self.pending_remix = Some(ticket);
        self.remixed.clear();
        self.remix_error = None;
        self.selected_id = None;
        self.remix_view = false;
        Ok((ticket, self.ideas.clone()))
    }

    pub fn finish_remix(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<RemixedIdea>, IdeaError>,
    ) -> bool {
        if self.pending_remix != Some(ticket) {
            warn!(ticket, "Discarding stale remix result");
            return false;
        }
        self.pending_remix = None;

        match result {
            Ok(remixed) => {
                // 대기 중에 고른 아이디어보다 리믹스 결과가 우선
                self.remixed = remixed;
                self.selected_id = None;
                self.remix_view = true;
            }
            Err(e) => {
                self.remix_error = Some(e.to_string());
            }
        }
        true
    }

    pub fn select_idea(&mut self, id: &str) -> Result<(), IdeaError> {
        if !self.ideas.iter().any(|idea| idea.id == id) {
            return Err(IdeaError::IdeaNotFound(id.to_string()));
        }
        self.selected_id = Some(id.to_string());
        self.remix_view = false;
        Ok(())
    }

    /// 개요로 돌아가며 리믹스 결과와 리믹스 오류도 버립니다
    pub fn clear_selection(&mut self) {
        self.selected_id = None;
        self.remix_view = false;
        self.remixed.clear();
        self.remix_error = None;
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) -> Result<(), IdeaError> {
        if self.ideas.is_empty() {
            return Err(IdeaError::InvalidOperation(
                "Chỉ có thể đổi chế độ xem khi đã có ý tưởng.".to_string(),
            ));
        }
        if self.remix_view {
            return Err(IdeaError::InvalidOperation(
                "Không thể đổi chế độ xem khi đang hiển thị kết quả trộn.".to_string(),
            ));
        }
        self.view_mode = mode;
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        if self.pending_generate.is_some() {
            return Phase::Generating;
        }
        if self.pending_remix.is_some() {
            return Phase::Remixing;
        }
        match self.error.as_ref().or(self.remix_error.as_ref()) {
            Some(message) => Phase::Error(message.clone()),
            None => Phase::Idle,
        }
    }

    pub fn focus(&self) -> Focus {
        if let Some(id) = &self.selected_id {
            return Focus::DetailOn(id.clone());
        }
        if self.remix_view {
            return Focus::RemixResultsShown;
        }
        Focus::Overview
    }

    pub fn ideas(&self) -> &[Idea] {
        &self.ideas
    }

    pub fn remixed(&self) -> &[RemixedIdea] {
        &self.remixed
    }

    pub fn selected(&self) -> Option<&Idea> {
        let id = self.selected_id.as_deref()?;
        self.ideas.iter().find(|idea| idea.id == id)
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn remix_error(&self) -> Option<&str> {
        self.remix_error.as_deref()
    }

    pub fn loading_message(&self) -> Option<&'static str> {
        match self.phase() {
            Phase::Generating => Some(GENERATING_MESSAGE),
            Phase::Remixing => Some(REMIXING_MESSAGE),
            _ => None,
        }
    }

    /// 파생 데이터는 매번 새로 계산합니다. 모든 화면 데이터는 총점 순서를 기준으로 합니다.
    pub fn snapshot(&self) -> AppSnapshot {
        let ranked: Vec<Idea> = rank_by_total(&self.ideas).into_iter().cloned().collect();
        let selected = self.selected();

        AppSnapshot {
            phase: self.phase(),
            focus: self.focus(),
            view_mode: self.view_mode,
            loading_message: self.loading_message().map(str::to_string),
            matrix_rows: matrix_rows(&ranked),
            dashboard: (!ranked.is_empty()).then(|| dashboard_summary(&ranked)),
            chart_series: chart_series(&ranked),
            remixed_ideas: self.remixed.clone(),
            selected_idea: selected.cloned(),
            selected_scores: selected.map(score_breakdown).unwrap_or_default(),
            error: self.error.clone(),
            remix_error: self.remix_error.clone(),
            remix_comparisons: self.remixed.iter().map(remix_comparison).collect(),
            generated_at: self.generated_at,
            ideas: ranked,
        }
    }
}

/// 상태와 생성 파이프라인을 묶는 컨트롤러.
/// 네트워크 호출 동안에는 잠금을 잡지 않습니다.
pub struct IdeaController {
    state: Mutex<AppState>,
    generator: IdeaGenerator,
}

impl IdeaController {
    pub fn new(generator: IdeaGenerator) -> Self {
        Self {
            state: Mutex::new(AppState::new()),
            generator,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, AppState>, IdeaError> {
        self.state
            .lock()
            .map_err(|e| IdeaError::Lock(e.to_string()))
    }

    /// 생성 실패는 상태의 오류 슬롯에 담기며 `Err`로 돌아오지 않습니다
    pub async fn generate(&self, params: GenerateParams) -> Result<AppSnapshot, IdeaError> {
        params.validate()?;

        let ticket = self.lock()?.begin_generate();
        let result = self.generator.generate_ideas(&params).await;

        let mut state = self.lock()?;
        state.finish_generate(ticket, result);
        Ok(state.snapshot())
    }

    /// 전제 조건 실패와 리믹스 실패는 리믹스 오류 슬롯에 담깁니다
    pub async fn remix(&self, params: RemixParams) -> Result<AppSnapshot, IdeaError> {
        params.validate()?;

        let (ticket, ideas) = self.lock()?.begin_remix()?;
        let result = self.generator.remix_ideas(&params, &ideas).await;

        let mut state = self.lock()?;
        state.finish_remix(ticket, result);
        Ok(state.snapshot())
    }

    pub fn select_idea(&self, id: &str) -> Result<AppSnapshot, IdeaError> {
        let mut state = self.lock()?;
        state.select_idea(id)?;
        Ok(state.snapshot())
    }

    pub fn clear_selection(&self) -> Result<AppSnapshot, IdeaError> {
        let mut state = self.lock()?;
        state.clear_selection();
        Ok(state.snapshot())
    }

    pub fn set_view_mode(&self, mode: ViewMode) -> Result<AppSnapshot, IdeaError> {
        let mut state = self.lock()?;
        state.set_view_mode(mode)?;
        Ok(state.snapshot())
    }

    pub fn snapshot(&self) -> Result<AppSnapshot, IdeaError> {
        Ok(self.lock()?.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::generator::fixtures::{idea_value, remix_value};
    use crate::generation::generator::INSUFFICIENT_SOURCES_MESSAGE;
    use crate::generation::provider::scripted::ScriptedProvider;
    use crate::models::{MixMode, VideoType, ARCHIVE_TIER, IN_HOUSE, KOC_CTV, TOP_TIER};
    use serde_json::Value;
    use std::sync::Arc;

    fn generate_params() -> GenerateParams {
        GenerateParams {
            keywords: "ôn thi cấp 3".to_string(),
            video_type: VideoType::All,
            creative_overdrive: false,
            information_depth: 3,
        }
    }

    fn remix_params() -> RemixParams {
        RemixParams {
            keywords: "2k8".to_string(),
            mix_mode: MixMode::SpinOff,
        }
    }

    fn controller(provider: &Arc<ScriptedProvider>) -> IdeaController {
        IdeaController::new(IdeaGenerator::new(provider.clone()))
    }

    fn idea(id: &str, total: f64) -> Idea {
        Idea {
            id: id.to_string(),
            title: id.to_string(),
            upgraded_title: id.to_string(),
            total_score: total,
            priority: TOP_TIER.to_string(),
            ..Default::default()
        }
    }

    fn state_with_ideas(ideas: Vec<Idea>) -> AppState {
        let mut state = AppState::new();
        let ticket = state.begin_generate();
        assert!(state.finish_generate(ticket, Ok(ideas)));
        state
    }

    #[test]
    fn test_begin_generate_resets_everything() {
        let mut state = state_with_ideas(vec![idea("a", 4.2)]);
        state.select_idea("a").unwrap();
        state.remix_error = Some("old".to_string());

        let _ticket = state.begin_generate();

        assert!(state.ideas().is_empty());
        assert!(state.selected().is_none());
        assert!(state.remix_error().is_none());
        assert_eq!(state.phase(), Phase::Generating);
        assert_eq!(state.loading_message(), Some(GENERATING_MESSAGE));
    }

    #[test]
    fn test_stale_generation_result_is_discarded() {
        let mut state = AppState::new();
        let first = state.begin_generate();
        let second = state.begin_generate();

        assert!(!state.finish_generate(first, Ok(vec![idea("stale", 4.0)])));
        assert!(state.ideas().is_empty());
        assert_eq!(state.phase(), Phase::Generating);

        assert!(state.finish_generate(second, Ok(vec![idea("fresh", 4.0)])));
        assert_eq!(state.ideas()[0].id, "fresh");
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_generation_supersedes_pending_remix() {
        let mut state = state_with_ideas(vec![idea("a", 4.2)]);
        let (remix_ticket, _) = state.begin_remix().unwrap();
        let _gen_ticket = state.begin_generate();

        assert!(!state.finish_remix(remix_ticket, Ok(vec![])));
        assert_eq!(state.focus(), Focus::Overview);
    }

    #[test]
    fn test_second_remix_is_rejected_while_pending() {
        let mut state = state_with_ideas(vec![idea("a", 4.2)]);
        let (ticket, ideas) = state.begin_remix().unwrap();
        assert_eq!(ideas.len(), 1);
        assert_eq!(state.phase(), Phase::Remixing);
        assert_eq!(state.loading_message(), Some(REMIXING_MESSAGE));

        assert!(matches!(state.begin_remix(), Err(IdeaError::InvalidOperation(_))));

        assert!(state.finish_remix(ticket, Ok(vec![])));
        assert_eq!(state.focus(), Focus::RemixResultsShown);
    }

    #[test]
    fn test_remix_is_rejected_while_generating() {
        let mut state = state_with_ideas(vec![idea("a", 4.2)]);
        let _ticket = state.begin_generate();

        assert!(matches!(state.begin_remix(), Err(IdeaError::InvalidOperation(_))));
        assert_eq!(state.phase(), Phase::Generating);
    }

    #[test]
    fn test_remix_success_shows_results_after_selection() {
        let mut state = state_with_ideas(vec![idea("a", 4.2)]);
        let (ticket, _) = state.begin_remix().unwrap();
        // 리믹스 대기 중 선택
        state.select_idea("a").unwrap();

        assert!(state.finish_remix(ticket, Ok(vec![])));
        assert_eq!(state.focus(), Focus::RemixResultsShown);
        assert!(state.selected().is_none());
        assert!(state.snapshot().selected_idea.is_none());
    }

    #[test]
    fn test_select_and_clear() {
        let mut state = state_with_ideas(vec![idea("a", 4.2), idea("b", 3.0)]);
        let (ticket, _) = state.begin_remix().unwrap();
        state.finish_remix(
            ticket,
            Err(IdeaError::Remix {
                cause: "boom".to_string(),
                details: None,
            }),
        );
        assert_eq!(
            state.phase(),
            Phase::Error("Không thể trộn ý tưởng từ mô hình AI.".to_string())
        );

        assert!(matches!(state.select_idea("zzz"), Err(IdeaError::IdeaNotFound(_))));
        state.select_idea("b").unwrap();
        assert_eq!(state.focus(), Focus::DetailOn("b".to_string()));

        state.clear_selection();
        assert_eq!(state.focus(), Focus::Overview);
        assert!(state.remix_error().is_none());
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_view_mode_rules() {
        let mut state = AppState::new();
        assert!(matches!(
            state.set_view_mode(ViewMode::Chart),
            Err(IdeaError::InvalidOperation(_))
        ));

        let mut state = state_with_ideas(vec![idea("a", 4.2)]);
        state.set_view_mode(ViewMode::Matrix).unwrap();
        assert_eq!(state.view_mode(), ViewMode::Matrix);

        let (ticket, _) = state.begin_remix().unwrap();
        state.finish_remix(ticket, Ok(vec![]));
        assert!(state.set_view_mode(ViewMode::Chart).is_err());

        // 새 생성이 끝나면 대시보드로 돌아감
        let ticket = state.begin_generate();
        state.finish_generate(ticket, Ok(vec![idea("b", 3.0)]));
        assert_eq!(state.view_mode(), ViewMode::Dashboard);
    }

    #[test]
    fn test_snapshot_is_ranked_and_derived() {
        let state = state_with_ideas(vec![idea("low", 3.1), idea("high", 4.7), idea("mid", 4.0)]);
        let snapshot = state.snapshot();

        let order: Vec<&str> = snapshot.ideas.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(order, vec!["high", "mid", "low"]);
        assert_eq!(snapshot.matrix_rows[0].id, "high");
        assert_eq!(snapshot.dashboard.as_ref().unwrap().total_ideas, 3);
        assert!(snapshot.generated_at.is_some());
        assert!(snapshot.loading_message.is_none());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["phase"]["status"], "idle");
        assert_eq!(json["viewMode"], "dashboard");
    }

    #[test]
    fn test_snapshot_views_follow_ranked_order() {
        let mut low = idea("low", 3.0);
        low.viral_score = 8.0;
        low.video_format = "Vlog".to_string();
        low.category = "Học tập".to_string();
        low.implementation_suggestion = KOC_CTV.to_string();
        let mut high = idea("high", 4.8);
        high.viral_score = 8.0;
        high.video_format = "POV".to_string();
        high.category = "Giải trí".to_string();
        high.implementation_suggestion = IN_HOUSE.to_string();
        let mut other = idea("other", 3.5);
        other.viral_score = 8.0;
        other.video_format = "Meme".to_string();
        other.category = "Học tập".to_string();
        other.implementation_suggestion = IN_HOUSE.to_string();
        let state = state_with_ideas(vec![low, other, high]);

        let snapshot = state.snapshot();
        let dashboard = snapshot.dashboard.unwrap();

        let top: Vec<&str> = dashboard.top_viral.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(top, vec!["high", "other", "low"]);
        assert_eq!(dashboard.top_formats, vec!["POV", "Meme", "Vlog"]);
        let categories: Vec<&str> = dashboard.category_split.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(categories, vec!["Giải trí", "Học tập"]);
        let channels: Vec<&str> = dashboard
            .implementation_split
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(channels, vec![IN_HOUSE, KOC_CTV]);

        let in_house: Vec<&str> = snapshot.chart_series[0]
            .points
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(in_house, vec!["high", "other"]);
    }

    #[tokio::test]
    async fn test_controller_generate_scenario() {
        let reply = Value::Array(vec![
            idea_value("S", "V1", TOP_TIER, 3.9, 7.0),
            idea_value("S", "V2", TOP_TIER, 4.6, 8.0),
        ])
        .to_string();
        let provider = Arc::new(ScriptedProvider::new().reply(reply));
        let controller = controller(&provider);

        let snapshot = controller.generate(generate_params()).await.unwrap();

        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.ideas.len(), 2);
        assert_eq!(snapshot.ideas[0].upgraded_title, "V2");
        assert_eq!(snapshot.focus, Focus::Overview);
    }

    #[tokio::test]
    async fn test_controller_remix_precondition_scenario() {
        let reply = Value::Array(vec![idea_value("Cũ", "Cũ+", ARCHIVE_TIER, 2.1, 3.0)]).to_string();
        let provider = Arc::new(ScriptedProvider::new().reply(reply));
        let controller = controller(&provider);
        controller.generate(generate_params()).await.unwrap();

        let snapshot = controller.remix(remix_params()).await.unwrap();

        assert_eq!(provider.calls(), 1);
        assert_eq!(snapshot.remix_error.as_deref(), Some(INSUFFICIENT_SOURCES_MESSAGE));
        assert_eq!(snapshot.phase, Phase::Error(INSUFFICIENT_SOURCES_MESSAGE.to_string()));
        assert_eq!(snapshot.ideas.len(), 1);
    }

    #[tokio::test]
    async fn test_controller_non_json_scenario() {
        let first = Value::Array(vec![idea_value("A", "A+", TOP_TIER, 4.2, 8.0)]).to_string();
        let provider = Arc::new(ScriptedProvider::new().reply(first).reply("<html>503</html>"));
        let controller = controller(&provider);
        controller.generate(generate_params()).await.unwrap();

        let snapshot = controller.generate(generate_params()).await.unwrap();

        assert!(snapshot.ideas.is_empty());
        let message = snapshot.error.unwrap();
        assert_eq!(message, "Không thể tạo ý tưởng từ mô hình AI.");
        assert_ne!(message, INSUFFICIENT_SOURCES_MESSAGE);
        assert!(snapshot.dashboard.is_none());
    }

    #[tokio::test]
    async fn test_controller_remix_success_and_selection() {
        let ideas = Value::Array(vec![idea_value("A", "A+", TOP_TIER, 4.2, 8.0)]).to_string();
        let remixes = Value::Array(vec![remix_value("A+", "Mới"), remix_value("Unmatched X", "Khác")]).to_string();
        let provider = Arc::new(ScriptedProvider::new().reply(ideas).reply(remixes));
        let controller = controller(&provider);
        let generated = controller.generate(generate_params()).await.unwrap();

        let snapshot = controller.remix(remix_params()).await.unwrap();

        assert_eq!(snapshot.focus, Focus::RemixResultsShown);
        assert_eq!(snapshot.remixed_ideas.len(), 2);
        assert_eq!(snapshot.remix_comparisons[0].original_total_score, Some(4.2));
        assert_eq!(snapshot.remix_comparisons[1].original_total_score, None);

        let id = generated.ideas[0].id.clone();
        let snapshot = controller.select_idea(&id).unwrap();
        assert_eq!(snapshot.focus, Focus::DetailOn(id));
        assert_eq!(snapshot.selected_scores.len(), 10);
        // 선택은 리믹스 결과를 지우지 않음
        assert_eq!(snapshot.remixed_ideas.len(), 2);

        let snapshot = controller.clear_selection().unwrap();
        assert!(snapshot.remixed_ideas.is_empty());
        assert_eq!(snapshot.focus, Focus::Overview);
    }

    #[tokio::test]
    async fn test_controller_invalid_input_leaves_state() {
        let provider = Arc::new(ScriptedProvider::new());
        let controller = controller(&provider);
        let mut params = generate_params();
        params.keywords = " ".to_string();

        assert!(matches!(
            controller.generate(params).await,
            Err(IdeaError::InvalidInput(_))
        ));
        assert_eq!(provider.calls(), 0);
        assert_eq!(controller.snapshot().unwrap().phase, Phase::Idle);
    }
}
