//! Derivation Layer
//!
//! 아이디어 컬렉션에서 화면용 데이터를 계산하는 순수 함수 모음.
//! 결과는 캐시하지 않으며 컬렉션이 바뀔 때마다 다시 계산합니다.

use std::cmp::Ordering;

use serde::Serialize;

use crate::models::{
    Idea, OptimizedMiniHook, RemixHook, RemixedIdea, ScoreCategory, IN_HOUSE, KOC_CTV, TOP_TIER,
};

/// 리믹스 원본이 되기 위한 최소 총점 (초과)
pub const REMIX_SCORE_THRESHOLD: f64 = 4.5;

/// 개요 화면의 바이럴 상위 개수
pub const OVERVIEW_TOP_N: usize = 5;

/// 개요 화면의 인기 포맷 개수
pub const TOP_FORMATS_K: usize = 3;

/// 훅이 하나도 없을 때 표시하는 라벨
pub const NO_HOOK_LABEL: &str = "Chưa có";

/// 세부 점수 최댓값
pub const MAX_SCORE: f64 = 5.0;

pub fn is_top_tier(idea: &Idea) -> bool {
    idea.priority == TOP_TIER
}

/// Top Tier 이거나 총점이 4.5 초과
pub fn is_remix_eligible(idea: &Idea) -> bool {
    is_top_tier(idea) || idea.total_score > REMIX_SCORE_THRESHOLD
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// 총점 내림차순 (안정 정렬)
pub fn rank_by_total(ideas: &[Idea]) -> Vec<&Idea> {
    let mut ranked: Vec<&Idea> = ideas.iter().collect();
    ranked.sort_by(|a, b| descending(a.total_score, b.total_score));
    ranked
}

/// 바이럴 점수 내림차순 상위 N개 (안정 정렬)
pub fn top_by_viral(ideas: &[Idea], n: usize) -> Vec<&Idea> {
    let mut ranked: Vec<&Idea> = ideas.iter().collect();
    ranked.sort_by(|a, b| descending(a.viral_score, b.viral_score));
    ranked.truncate(n);
    ranked
}

/// 키별 개수 (차트 데이터 형식)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub value: usize,
}

/// 키 선택 함수로 묶어 개수를 셈. 키는 처음 등장한 순서를 유지합니다.
pub fn group_and_count<F>(ideas: &[Idea], key: F) -> Vec<CategoryCount>
where
    F: Fn(&Idea) -> &str,
{
    let mut counts: Vec<CategoryCount> = Vec::new();
    for idea in ideas {
        let name = key(idea);
        match counts.iter_mut().find(|c| c.name == name) {
            Some(entry) => entry.value += 1,
            None => counts.push(CategoryCount {
                name: name.to_string(),
                value: 1,
            }),
        }
    }
    counts
}

/// 가장 많이 쓰인 영상 포맷 K개 (동률이면 먼저 등장한 포맷 우선)
pub fn top_formats(ideas: &[Idea], k: usize) -> Vec<String> {
    let mut counts = group_and_count(ideas, |idea| idea.video_format.as_str());
    counts.sort_by(|a, b| b.value.cmp(&a.value));
    counts.into_iter().take(k).map(|c| c.name).collect()
}

/// 필드 평균. 빈 컬렉션이면 0.
pub fn average_by<F>(ideas: &[Idea], field: F) -> f64
where
    F: Fn(&Idea) -> f64,
{
    if ideas.is_empty() {
        return 0.0;
    }
    ideas.iter().map(field).sum::<f64>() / ideas.len() as f64
}

/// 대표 훅
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProminentHook<'a> {
    Mini(&'a OptimizedMiniHook),
    Full(&'a str),
    None,
}

impl<'a> ProminentHook<'a> {
    pub fn text(&self) -> &'a str {
        match *self {
            ProminentHook::Mini(hook) => hook.text.as_str(),
            ProminentHook::Full(text) => text,
            ProminentHook::None => NO_HOOK_LABEL,
        }
    }
}

/// 유지 점수가 가장 높은 미니 훅, 없으면 첫 번째 full 훅
pub fn best_mini_hook(idea: &Idea) -> ProminentHook<'_> {
    let best = idea.hooks.mini.iter().reduce(|best, current| {
        if current.retention_score > best.retention_score {
            current
        } else {
            best
        }
    });

    match (best, idea.hooks.full.first()) {
        (Some(hook), _) => ProminentHook::Mini(hook),
        (None, Some(full)) => ProminentHook::Full(full.as_str()),
        (None, None) => ProminentHook::None,
    }
}

/// 대시보드 요약
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_ideas: usize,
    pub top_tier_count: usize,
    pub average_viral_score: f64,
    pub average_viral_potential: f64,
    pub top_viral: Vec<Idea>,
    pub implementation_split: Vec<CategoryCount>,
    pub category_split: Vec<CategoryCount>,
    pub top_formats: Vec<String>,
}

pub fn dashboard_summary(ideas: &[Idea]) -> DashboardSummary {
    DashboardSummary {
        total_ideas: ideas.len(),
        top_tier_count: ideas.iter().filter(|idea| is_top_tier(idea)).count(),
        average_viral_score: average_by(ideas, |idea| idea.viral_score),
        average_viral_potential: average_by(ideas, |idea| idea.scores.viral_potential),
        top_viral: top_by_viral(ideas, OVERVIEW_TOP_N).into_iter().cloned().collect(),
        implementation_split: group_and_count(ideas, |idea| {
            idea.implementation_suggestion.as_str()
        }),
        category_split: group_and_count(ideas, |idea| idea.category.as_str()),
        top_formats: top_formats(ideas, TOP_FORMATS_K),
    }
}

/// 매트릭스 표의 한 행
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixRow {
    pub id: String,
    pub title: String,
    pub upgraded_title: String,
    pub variation_type: String,
    pub category: String,
    pub priority: String,
    pub total_score: f64,
    pub viral_score: f64,
    pub video_format: String,
    pub implementation_suggestion: String,
    pub prominent_hook: String,
}

pub fn matrix_rows<'a, I>(ideas: I) -> Vec<MatrixRow>
where
    I: IntoIterator<Item = &'a Idea>,
{
    ideas
        .into_iter()
        .map(|idea| MatrixRow {
            id: idea.id.clone(),
            title: idea.title.clone(),
            upgraded_title: idea.upgraded_title.clone(),
            variation_type: idea.variation_type.clone(),
            category: idea.category.clone(),
            priority: idea.priority.clone(),
            total_score: idea.total_score,
            viral_score: idea.viral_score,
            video_format: idea.video_format.clone(),
            implementation_suggestion: idea.implementation_suggestion.clone(),
            prominent_hook: best_mini_hook(idea).text().to_string(),
        })
        .collect()
}

/// 산점도 점 (x = 실행 가능성, y = 바이럴 잠재력, z = 총점)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub id: String,
    pub title: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub points: Vec<ChartPoint>,
}

/// 구현 채널별 산점도 시리즈. 두 채널 외의 아이디어는 그리지 않습니다.
pub fn chart_series(ideas: &[Idea]) -> Vec<ChartSeries> {
    [IN_HOUSE, KOC_CTV]
        .into_iter()
        .map(|channel| ChartSeries {
            name: channel.to_string(),
            points: ideas
                .iter()
                .filter(|idea| idea.implementation_suggestion == channel)
                .map(|idea| ChartPoint {
                    id: idea.id.clone(),
                    title: idea.title.clone(),
                    x: idea.scores.feasibility,
                    y: idea.scores.viral_potential,
                    z: idea.total_score,
                })
                .collect(),
        })
        .collect()
}

/// 상세 화면의 점수 막대
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBar {
    pub category: ScoreCategory,
    pub label: &'static str,
    pub score: f64,
    pub max: f64,
}

pub fn score_breakdown(idea: &Idea) -> Vec<ScoreBar> {
    ScoreCategory::ALL
        .iter()
        .map(|category| ScoreBar {
            category: *category,
            label: category.label(),
            score: idea.scores.get(*category),
            max: MAX_SCORE,
        })
        .collect()
}

/// 리믹스 결과와 원본 아이디어 비교
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemixComparison {
    pub remix_id: String,
    pub original_theme: String,
    /// 원본을 찾지 못하면 `None`
    pub original_total_score: Option<f64>,
    pub original_video_format: Option<String>,
    pub original_hooks: Vec<String>,
    pub new_expanded_idea: String,
    pub new_potential_score: f64,
    pub video_format: String,
    pub communication_goal: String,
    pub new_hooks: Vec<RemixHook>,
}

/// 원본 훅은 full 훅 앞 2개까지 보여줍니다
const COMPARED_ORIGINAL_HOOKS: usize = 2;

pub fn remix_comparison(remixed: &RemixedIdea) -> RemixComparison {
    let original = &remixed.original_idea;
    let found = !original.is_placeholder();

    RemixComparison {
        remix_id: remixed.id.clone(),
        original_theme: remixed.original_theme.clone(),
        original_total_score: found.then_some(original.total_score),
        original_video_format: Some(original.video_format.clone())
            .filter(|format| found && !format.is_empty()),
        original_hooks: original
            .hooks
            .full
            .iter()
            .take(COMPARED_ORIGINAL_HOOKS)
            .cloned()
            .collect(),
        new_expanded_idea: remixed.new_expanded_idea.clone(),
        new_potential_score: remixed.new_potential_score,
        video_format: remixed.video_format.clone(),
        communication_goal: remixed.communication_goal.clone(),
        new_hooks: remixed.hooks.clone(),
    }
}
