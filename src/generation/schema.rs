//! 구조화 출력 스키마
//!
//! Gemini `responseSchema` 형식으로 Idea / RemixedIdea 응답 형태를 선언합니다.
//! 서버 응답에는 `id`가 없으므로 스키마에도 포함하지 않습니다.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

/// 아이디어 응답에서 반드시 있어야 하는 필드
pub const IDEA_REQUIRED_FIELDS: [&str; 16] = [
    "title",
    "creativeStrategy",
    "variationType",
    "upgradedTitle",
    "mainEmotion",
    "viralScore",
    "contentSummary",
    "scriptDirection",
    "category",
    "scores",
    "totalScore",
    "priority",
    "implementationSuggestion",
    "videoFormat",
    "formatRemixes",
    "toneRemixes",
];

pub const SCORE_FIELDS: [&str; 10] = [
    "relevance",
    "viralPotential",
    "feasibility",
    "audienceFit",
    "brandFit",
    "novelty",
    "trendFit",
    "engagementPotential",
    "productFit",
    "emotionImpact",
];

pub const REMIX_REQUIRED_FIELDS: [&str; 7] = [
    "originalTheme",
    "newExpandedIdea",
    "videoFormat",
    "communicationGoal",
    "ideaSource",
    "newPotentialScore",
    "hooks",
];

fn string(description: &str) -> Value {
    json!({ "type": "STRING", "description": description })
}

fn number(description: &str) -> Value {
    json!({ "type": "NUMBER", "description": description })
}

fn string_array(description: &str) -> Value {
    json!({ "type": "ARRAY", "description": description, "items": { "type": "STRING" } })
}

fn scores_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "relevance": number("Điểm (1-5) về mức độ liên quan sản phẩm/chiến dịch HOCMAI."),
            "viralPotential": number("Điểm (1-5) về tiềm năng lan tỏa, bắt trend, gây cảm xúc mạnh."),
            "feasibility": number("Điểm (1-5) về khả năng thực thi (dễ quay, chi phí thấp)."),
            "audienceFit": number("Điểm (1-5) về mức độ phù hợp với đối tượng mục tiêu (học sinh, phụ huynh)."),
            "brandFit": number("Điểm (1-5) về mức độ phù hợp với hình ảnh thương hiệu HOCMAI."),
            "novelty": number("Điểm (1-5) về mức độ mới lạ, độc đáo của ý tưởng."),
            "trendFit": number("Điểm (1-5) về khả năng bắt trend (format, âm thanh, chủ đề) trên TikTok."),
            "engagementPotential": number("Điểm (1-5) về tiềm năng tạo tương tác (comment, share, save)."),
            "productFit": number("Điểm (1-5) về khả năng liên kết tự nhiên với một sản phẩm cụ thể của HOCMAI."),
            "emotionImpact": number("Điểm (1-5) về tác động cảm xúc mà ý tưởng có thể tạo ra.")
        },
        "required": SCORE_FIELDS
    })
}

fn hooks_schema() -> Value {
    json!({
        "type": "OBJECT",
        "description": "Chỉ sinh ra cho ý tưởng \"⭐ Top Tier\". Tạo các hook MỚI cho ý tưởng đã NÂNG CẤP.",
        "properties": {
            "full": string_array("1-2 câu hook dạng nói đầy đủ."),
            "mini": {
                "type": "ARRAY",
                "description": "3 mini-hook đã được tối ưu hóa theo các công thức, kèm điểm giữ chân (retention score).",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "text": string("Nội dung của mini hook."),
                        "formula": string("Tên công thức đã sử dụng để tạo hook (vd: \"Tò mò – giải mã\")."),
                        "retentionScore": number("Điểm dự đoán khả năng giữ chân người xem (0-100).")
                    },
                    "required": ["text", "formula", "retentionScore"]
                }
            },
            "reverse": string_array("1-2 câu hook đảo ngược kỳ vọng.")
        }
    })
}

/// 아이디어 생성 응답 스키마
pub static IDEA_RESPONSE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": string("Tiêu đề gốc, ngắn gọn của ý tưởng ban đầu."),
                "creativeStrategy": string("Chiến lược sáng tạo chính: \"Góc nhìn mới\", \"Kết nối bất ngờ\", hoặc \"Cảm xúc sâu\"."),
                "variationType": string("Tên biến thể: \"Truyền cảm hứng\", \"Bắt trend\", hoặc \"Hài hước thông minh\"."),
                "upgradedTitle": string("Tiêu đề nâng cấp, hấp dẫn và viral hơn, tương ứng với biến thể."),
                "mainEmotion": string("Cảm xúc chính mà video nâng cấp muốn khơi gợi."),
                "viralScore": number("Điểm Viral (0-10) dựa trên sức mạnh hook, cảm xúc, tính mới lạ và khả năng bắt trend."),
                "contentSummary": string("Tóm tắt nội dung chính của video nâng cấp trong 1-2 câu."),
                "scriptDirection": string("Hướng dẫn kịch bản ngắn gọn cho video nâng cấp (15-30 giây)."),
                "category": string("Phân loại: Hài hước, Giáo dục, Cảm xúc, Review, Định hướng, Series kiến thức."),
                "scores": scores_schema(),
                "totalScore": number("Điểm tổng hợp (trung bình cộng của TẤT CẢ các điểm trong mục scores)."),
                "priority": string("Phân loại theo điểm: \"⭐ Top Tier\" (trên 4.0), \"⚙️ Thử nghiệm\" (3.0-4.0), \"💤 Lưu trữ\" (dưới 3.0)."),
                "implementationSuggestion": string("Đề xuất triển khai: \"Nội bộ\" hoặc \"KOC/CTV\"."),
                "videoFormat": string("Dạng video chính, phù hợp nhất (vd: storytelling POV, unboxing, tutorial, meme)."),
                "formatRemixes": string_array("Gợi ý 3 format video khác nhau để triển khai ý tưởng."),
                "toneRemixes": {
                    "type": "ARRAY",
                    "description": "Viết lại \"upgradedTitle\" theo 2 tone giọng khác nhau.",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "tone": string("Tên của tone giọng (vd: \"Xúc động\", \"Mặn mòi\", \"Châm biếm\")."),
                            "upgradedTitle": string("Tiêu đề được viết lại theo tone giọng đó.")
                        },
                        "required": ["tone", "upgradedTitle"]
                    }
                },
                "hooks": hooks_schema(),
                "captions": string_array("Chỉ sinh ra cho ý tưởng \"⭐ Top Tier\". 2-3 caption gợi tương tác."),
                "hashtagPack": string_array("Chỉ sinh ra cho ý tưởng \"⭐ Top Tier\". Hashtag liên quan, bao gồm #HocmaiEdu, #HocmaiTikTok.")
            },
            "required": IDEA_REQUIRED_FIELDS
        }
    })
});

/// 리믹스 응답 스키마
pub static REMIX_RESPONSE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "originalTheme": string("Tiêu đề của ý tưởng gốc được dùng để tạo ra ý tưởng mới này."),
                "newExpandedIdea": string("Tiêu đề của ý tưởng mới được mở rộng, kết hợp từ khóa mới."),
                "videoFormat": string("Định dạng video phù hợp cho ý tưởng mới (ví dụ: POV, series, trend)."),
                "communicationGoal": string("Mục tiêu truyền thông chính của ý tưởng mới."),
                "ideaSource": string("Nguồn gốc của ý tưởng ('Remix', 'Spin-off', hoặc 'Cross-theme')."),
                "newPotentialScore": number("Điểm tiềm năng mới (1-5) của ý tưởng sau khi kết hợp."),
                "hooks": {
                    "type": "ARRAY",
                    "description": "Sinh 2 hook mới: 1 hook đầy đủ (Full) và 1 hook mini cho text trên màn hình (Mini).",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "full": { "type": "STRING" },
                            "mini": { "type": "STRING" }
                        },
                        "required": ["full", "mini"]
                    }
                }
            },
            "required": REMIX_REQUIRED_FIELDS
        }
    })
});
