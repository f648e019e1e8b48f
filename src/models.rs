//! Idea Matrix Data Models
//!
//! 프론트엔드 타입과 매핑되는 Rust 데이터 모델.
//! 생성 서비스 응답(초안)과 클라이언트에서 id가 부여된 엔티티를 구분합니다.

use serde::{Deserialize, Serialize};

use crate::error::IdeaError;

/// 우선순위 등급 (생성 서비스가 부여, 클라이언트는 검증하지 않음)
pub const TOP_TIER: &str = "⭐ Top Tier";
pub const EXPERIMENTAL_TIER: &str = "⚙️ Thử nghiệm";
pub const ARCHIVE_TIER: &str = "💤 Lưu trữ";

/// 구현 채널
pub const IN_HOUSE: &str = "Nội bộ";
pub const KOC_CTV: &str = "KOC/CTV";

/// 원본 아이디어를 찾지 못한 리믹스에 붙는 대체 아이디어 id
pub const NOT_FOUND_ID: &str = "not-found";

/// 10개 항목 세부 점수 (각 1-5)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub relevance: f64,
    pub viral_potential: f64,
    pub feasibility: f64,
    pub audience_fit: f64,
    pub brand_fit: f64,
    pub novelty: f64,
    pub trend_fit: f64,
    pub engagement_potential: f64,
    pub product_fit: f64,
    pub emotion_impact: f64,
}

impl Score {
    pub fn get(&self, category: ScoreCategory) -> f64 {
        match category {
            ScoreCategory::Relevance => self.relevance,
            ScoreCategory::ViralPotential => self.viral_potential,
            ScoreCategory::Feasibility => self.feasibility,
            ScoreCategory::AudienceFit => self.audience_fit,
            ScoreCategory::BrandFit => self.brand_fit,
            ScoreCategory::Novelty => self.novelty,
            ScoreCategory::TrendFit => self.trend_fit,
            ScoreCategory::EngagementPotential => self.engagement_potential,
            ScoreCategory::ProductFit => self.product_fit,
            ScoreCategory::EmotionImpact => self.emotion_impact,
        }
    }

    /// 10개 점수의 산술 평균.
    ///
    /// `totalScore`는 생성 서비스가 계산해서 보내므로 이 값으로 덮어쓰지 않습니다.
    pub fn mean(&self) -> f64 {
        let sum: f64 = ScoreCategory::ALL.iter().map(|c| self.get(*c)).sum();
        sum / ScoreCategory::ALL.len() as f64
    }
}

/// 점수 항목 키
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreCategory {
    Relevance,
    ViralPotential,
    Feasibility,
    AudienceFit,
    BrandFit,
    Novelty,
    TrendFit,
    EngagementPotential,
    ProductFit,
    EmotionImpact,
}

impl ScoreCategory {
    pub const ALL: [ScoreCategory; 10] = [
        ScoreCategory::Relevance,
        ScoreCategory::ViralPotential,
        ScoreCategory::Feasibility,
        ScoreCategory::AudienceFit,
        ScoreCategory::BrandFit,
        ScoreCategory::Novelty,
        ScoreCategory::TrendFit,
        ScoreCategory::EngagementPotential,
        ScoreCategory::ProductFit,
        ScoreCategory::EmotionImpact,
    ];

    /// 상세 화면 표시용 라벨
    pub fn label(&self) -> &'static str {
        match self {
            ScoreCategory::Relevance => "Liên quan chiến dịch",
            ScoreCategory::ViralPotential => "Tiềm năng Viral",
            ScoreCategory::Feasibility => "Tính khả thi",
            ScoreCategory::AudienceFit => "Phù hợp đối tượng",
            ScoreCategory::BrandFit => "Phù hợp thương hiệu",
            ScoreCategory::Novelty => "Tính mới lạ",
            ScoreCategory::TrendFit => "Khả năng bắt trend",
            ScoreCategory::EngagementPotential => "Tiềm năng tương tác",
            ScoreCategory::ProductFit => "Gắn kết sản phẩm",
            ScoreCategory::EmotionImpact => "Tác động cảm xúc",
        }
    }
}

/// 공식 기반 미니 훅
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedMiniHook {
    pub text: String,
    /// 사용된 수사 공식 이름 (예: "Tò mò – giải mã")
    pub formula: String,
    /// 예상 시청 유지 점수 (0-100)
    pub retention_score: f64,
}

/// Top Tier 아이디어에만 채워지는 훅 묶음
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaHooks {
    #[serde(default)]
    pub full: Vec<String>,
    #[serde(default)]
    pub mini: Vec<OptimizedMiniHook>,
    #[serde(default)]
    pub reverse: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToneRemix {
    pub tone: String,
    pub upgraded_title: String,
}

/// 아이디어 1건
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: String,
    pub title: String,
    pub upgraded_title: String,
    pub creative_strategy: String,
    pub variation_type: String,
    pub main_emotion: String,
    pub viral_score: f64,
    pub content_summary: String,
    pub script_direction: String,
    pub category: String,
    pub scores: Score,
    pub total_score: f64,
    pub priority: String,
    pub implementation_suggestion: String,
    pub video_format: String,
    pub hooks: IdeaHooks,
    pub captions: Vec<String>,
    pub hashtag_pack: Vec<String>,
    pub format_remixes: Vec<String>,
    pub tone_remixes: Vec<ToneRemix>,
}

impl Idea {
    /// 리믹스의 `originalTheme`에 맞는 아이디어가 없을 때 쓰는 대체 엔티티
    pub fn placeholder(theme: &str) -> Self {
        Self {
            id: NOT_FOUND_ID.to_string(),
            title: theme.to_string(),
            upgraded_title: theme.to_string(),
            ..Default::default()
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id == NOT_FOUND_ID
    }
}

/// 생성 서비스가 돌려주는 아이디어 (id 없음, 일부 배열 필드 생략 가능)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaDraft {
    pub title: String,
    pub upgraded_title: String,
    pub creative_strategy: String,
    pub variation_type: String,
    pub main_emotion: String,
    pub viral_score: f64,
    pub content_summary: String,
    pub script_direction: String,
    pub category: String,
    pub scores: Score,
    pub total_score: f64,
    pub priority: String,
    pub implementation_suggestion: String,
    pub video_format: String,
    #[serde(default)]
    pub hooks: Option<IdeaHooks>,
    #[serde(default)]
    pub captions: Option<Vec<String>>,
    #[serde(default)]
    pub hashtag_pack: Option<Vec<String>>,
    #[serde(default)]
    pub format_remixes: Option<Vec<String>>,
    #[serde(default)]
    pub tone_remixes: Option<Vec<ToneRemix>>,
}

impl IdeaDraft {
    /// id를 부여하고 선택 필드를 빈 값으로 정규화
    pub fn into_idea(self, id: String) -> Idea {
        Idea {
            id,
            title: self.title,
            upgraded_title: self.upgraded_title,
            creative_strategy: self.creative_strategy,
            variation_type: self.variation_type,
            main_emotion: self.main_emotion,
            viral_score: self.viral_score,
            content_summary: self.content_summary,
            script_direction: self.script_direction,
            category: self.category,
            scores: self.scores,
            total_score: self.total_score,
            priority: self.priority,
            implementation_suggestion: self.implementation_suggestion,
            video_format: self.video_format,
            hooks: self.hooks.unwrap_or_default(),
            captions: self.captions.unwrap_or_default(),
            hashtag_pack: self.hashtag_pack.unwrap_or_default(),
            format_remixes: self.format_remixes.unwrap_or_default(),
            tone_remixes: self.tone_remixes.unwrap_or_default(),
        }
    }
}

/// 리믹스 결과의 훅 (full + mini 한 쌍)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemixHook {
    pub full: String,
    pub mini: String,
}

/// 생성 서비스가 돌려주는 리믹스 (id, originalIdea 없음)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemixDraft {
    pub original_theme: String,
    pub new_expanded_idea: String,
    pub video_format: String,
    pub communication_goal: String,
    pub idea_source: String,
    pub new_potential_score: f64,
    #[serde(default)]
    pub hooks: Vec<RemixHook>,
}

/// 리믹스 결과 1건
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemixedIdea {
    pub id: String,
    pub original_theme: String,
    pub new_expanded_idea: String,
    pub video_format: String,
    pub communication_goal: String,
    /// "Remix" | "Spin-off" | "Cross-theme"
    pub idea_source: String,
    pub new_potential_score: f64,
    pub hooks: Vec<RemixHook>,
    /// `originalTheme`으로 찾은 원본 (못 찾으면 `Idea::placeholder`)
    pub original_idea: Idea,
}

impl RemixDraft {
    pub fn into_remixed(self, id: String, original_idea: Idea) -> RemixedIdea {
        RemixedIdea {
            id,
            original_theme: self.original_theme,
            new_expanded_idea: self.new_expanded_idea,
            video_format: self.video_format,
            communication_goal: self.communication_goal,
            idea_source: self.idea_source,
            new_potential_score: self.new_potential_score,
            hooks: self.hooks,
            original_idea,
        }
    }
}

/// 영상 유형
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VideoType {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "in-house")]
    InHouse,
    #[serde(rename = "ctv")]
    Ctv,
    #[serde(rename = "koc")]
    Koc,
}

impl VideoType {
    /// 프롬프트에 들어가는 설명
    pub fn label(&self) -> &'static str {
        match self {
            VideoType::All => "Bất kỳ loại nào",
            VideoType::InHouse => "Tự sản xuất nội bộ",
            VideoType::Ctv => "CTV Review sản phẩm",
            VideoType::Koc => "KOC lan tỏa thương hiệu",
        }
    }
}

/// 리믹스 모드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MixMode {
    #[default]
    #[serde(rename = "remix")]
    Remix,
    #[serde(rename = "spin-off")]
    SpinOff,
    #[serde(rename = "cross-theme")]
    CrossTheme,
}

impl MixMode {
    /// 모드별 창작 지시문
    pub fn directive(&self) -> &'static str {
        match self {
            MixMode::Remix => {
                "Remix: Kết hợp ý tưởng cũ với từ khóa mới để tạo ra một biến thể trực tiếp."
            }
            MixMode::SpinOff => {
                "Spin-off: Lấy chủ đề gốc và mở rộng sang một khía cạnh hoặc câu chuyện mới dựa trên từ khóa."
            }
            MixMode::CrossTheme => {
                "Cross-theme: Kết hợp 2 chủ đề khác nhau từ danh sách ý tưởng cũ với từ khóa mới để tạo ra một ý tưởng đột phá, hoàn toàn mới."
            }
        }
    }
}

/// 결과 화면 모드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Dashboard,
    Matrix,
    Chart,
}

pub const MIN_INFORMATION_DEPTH: u8 = 1;
pub const MAX_INFORMATION_DEPTH: u8 = 5;

/// 아이디어 생성 요청 파라미터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateParams {
    pub keywords: String,
    #[serde(default)]
    pub video_type: VideoType,
    #[serde(default)]
    pub creative_overdrive: bool,
    #[serde(default = "default_information_depth")]
    pub information_depth: u8,
}

fn default_information_depth() -> u8 {
    3
}

impl GenerateParams {
    pub fn validate(&self) -> Result<(), IdeaError> {
        if self.keywords.trim().is_empty() {
            return Err(IdeaError::InvalidInput("Từ khóa không được để trống.".to_string()));
        }
        if !(MIN_INFORMATION_DEPTH..=MAX_INFORMATION_DEPTH).contains(&self.information_depth) {
            return Err(IdeaError::InvalidInput(format!(
                "Độ sâu thông tin phải từ {} đến {}, nhận được {}.",
                MIN_INFORMATION_DEPTH, MAX_INFORMATION_DEPTH, self.information_depth
            )));
        }
        Ok(())
    }
}

/// 리믹스 요청 파라미터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemixParams {
    pub keywords: String,
    #[serde(default)]
    pub mix_mode: MixMode,
}

impl RemixParams {
    pub fn validate(&self) -> Result<(), IdeaError> {
        if self.keywords.trim().is_empty() {
            return Err(IdeaError::InvalidInput("Từ khóa trộn không được để trống.".to_string()));
        }
        Ok(())
    }
}
