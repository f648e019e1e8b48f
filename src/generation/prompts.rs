//! 생성/리믹스 지시문 빌더
//!
//! 채점 기준, 변형 분류, 훅 공식은 모두 이 지시문으로 외부 모델에 전달됩니다.

use crate::models::{GenerateParams, MixMode};

const OVERDRIVE_SEED_INSTRUCTION: &str = "**CHẾ ĐỘ ĐỘT PHÁ SÁNG TẠO ĐANG BẬT:** Hãy bỏ qua các giới hạn logic thông thường. Tạo ra 5-7 ý tưởng độc đáo, lạ, và thậm chí là kỳ quặc, vượt ra ngoài khuôn khổ (ví dụ: Nếu HOCMAI là một nhân vật Gen Z? Nếu kỳ thi được tổ chức trong vũ trụ? Nếu một gia sư là streamer?). Ưu tiên sự mới lạ và đột phá hơn là tính khả thi.";

const NORMAL_SEED_INSTRUCTION: &str = "Tạo ra 5-7 ý tưởng video TikTok đa dạng. Tránh các ý tưởng \"an toàn\" và chung chung như \"chia sẻ mẹo học tập\" đơn thuần.";

/// 아이디어 생성 지시문
pub fn idea_prompt(params: &GenerateParams) -> String {
    let seed_instruction = if params.creative_overdrive {
        OVERDRIVE_SEED_INSTRUCTION
    } else {
        NORMAL_SEED_INSTRUCTION
    };

    format!(
        r#"Bạn là một Giám đốc Sáng tạo chuyên về nội dung viral cho HOCMAI, một nền tảng giáo dục online hàng đầu Việt Nam. Đối tượng của bạn là học sinh Gen Z.

**THÔNG TIN ĐẦU VÀO:**
-   **Từ khóa:** "{keywords}"
-   **Loại video:** "{video_type}"
-   **ĐỘ SÂU THÔNG TIN (do người dùng chọn): {depth} / 5**
    -   1: Ý tưởng trend ngắn, bắt mắt, dễ xem.
    -   3: Ý tưởng cân bằng giữa giải trí và thông tin hữu ích.
    -   5: Ý tưởng chuyên sâu, phân tích, cung cấp giá trị học thuật cao.
    Hãy điều chỉnh độ phức tạp và chiều sâu của nội dung ý tưởng theo mức độ này.

**QUY TRÌNH SÁNG TẠO NÂNG CAO:**

**BƯỚC 1: SINH Ý TƯỞNG GỐC**
{seed_instruction}
Mỗi ý tưởng gốc phải có một chủ đề rõ ràng, bám sát từ khóa đầu vào.

**BƯỚC 2: ÁP DỤNG TẦNG LỌC SÁNG TẠO "CREATIVE BOOSTER"**
Với MỖI ý tưởng gốc, hãy áp dụng quy trình phân tích sáng tạo 3 lớp sau đây để tư duy:
1.  **Góc nhìn mới (Perspective Shift):** Lật ngược vấn đề, nhìn từ góc độ của một nhân vật phụ, hoặc đảo chiều cảm xúc.
2.  **Kết nối bất ngờ (Unexpected Link):** Kết hợp hai chủ đề tưởng chừng không liên quan để tạo ra sự đột phá.
3.  **Cảm xúc sâu (Emotional Hook):** Chèn các yếu tố gợi cảm xúc chân thật (hối tiếc, tự hào, biết ơn, bất ngờ) một cách tinh tế.

Dựa trên quá trình tư duy này, hãy tạo ra **3 BIẾN THỂ** cho mỗi ý tưởng gốc. Mỗi biến thể là một đối tượng JSON hoàn chỉnh trong mảng kết quả:
-   **Phiên bản truyền cảm hứng (Inspiring):** Hướng đến câu chuyện nhân văn, tạo động lực. Ghi variationType là "Truyền cảm hứng".
-   **Phiên bản bắt trend (Trend-fit):** Vận dụng các xu hướng, âm thanh, format thịnh hành trên TikTok. Ghi variationType là "Bắt trend".
-   **Phiên bản hài hước thông minh (Smart Humor):** Sử dụng sự dí dỏm, meme, tình huống oái oăm để tạo tiếng cười. Ghi variationType là "Hài hước thông minh".

**BƯỚC 3: PHÂN TÍCH CHUYÊN SÂU & TỐI ƯU HÓA (CHO TỪNG BIẾN THỂ)**
-   **creativeStrategy:** Ghi lại chiến lược chính ("Góc nhìn mới", "Kết nối bất ngờ", hoặc "Cảm xúc sâu") đã được sử dụng.
-   **Chấm điểm nâng cao:** Thực hiện đầy đủ các yêu cầu như trong schema (scores, totalScore, priority, formatRemixes, toneRemixes).
-   **TỐI ƯU HÓA HOOKS CHIẾN LƯỢC (chỉ cho ý tưởng "⭐ Top Tier"):**
    Áp dụng quy trình "MINI HOOK OPTIMIZER" để tạo ra các hook text ngắn (1-2 dòng) cho 3-5 giây đầu video.
    1.  Tạo các hook `full` và `reverse` như trong schema.
    2.  Đối với `mini` hooks, chọn 1-2 công thức phù hợp nhất:
        -   **Tò mò – giải mã:** "Bạn biết 90% học sinh làm sai chỗ này khi..."
        -   **Kết quả – bật mí:** "Sau [thời gian], tôi đã [kết quả] chỉ nhờ 1 điều này."
        -   **So sánh – ngược kỳ vọng:** "Mọi người nghĩ [A] mới đúng, nhưng thực ra [B] mới là lý do."
        -   **Sốc tri thức – fact mạnh:** "Nếu bạn biết điều này sớm hơn, bạn đã không mất 3 năm học sai cách."
        -   **Cảm xúc – đồng cảm:** "Có ai từng học đến 1h sáng mà vẫn thấy chưa đủ không?"
        -   **Xác thực – uy tín:** "Đây là cách mà học sinh đạt 113 HSA thật sự ôn luyện."
    3.  Sinh ra 3 phiên bản `mini` hook, ghi rõ tên công thức và chấm "Retention Score" (0-100).
    4.  Tạo các `captions` và `hashtagPack` theo schema.
    Với các ý tưởng không thuộc "⭐ Top Tier", để trống hooks, captions và hashtagPack.

**QUY TẮC AN TOÀN NỘI DUNG (TUYỆT ĐỐI TUÂN THỦ):**
-   Không dùng ngôn từ tục, bậy, phản cảm, ám chỉ tình dục hoặc bạo lực.
-   Không đề cập chính trị, tôn giáo, phân biệt vùng miền, giới tính, giai cấp.
-   Không dùng mô-típ "truyền thông bẩn" (bóc phốt, drama, cạnh tranh tiêu cực).
-   Không khuyến khích gian lận thi cử, lười học, hay thái độ tiêu cực với việc học.

**YÊU CẦU CHẤT LƯỢNG ĐẦU RA:**
-   Ý tưởng phải thông minh, nhân văn, gợi tò mò nhưng không phản cảm.
-   Giữ được tinh thần "Gen Z" (nhanh, ngắn, dí dỏm) nhưng không nhạt nhẽo hoặc vô nghĩa.
-   Phải liên kết rõ ràng với sản phẩm hoặc thông điệp học tập của HOCMAI.

Trả về một mảng JSON duy nhất chứa TẤT CẢ các biến thể ý tưởng đã được xử lý theo schema."#,
        keywords = params.keywords.trim(),
        video_type = params.video_type.label(),
        depth = params.information_depth,
        seed_instruction = seed_instruction,
    )
}

/// 리믹스 지시문. `sources_json`은 상위 아이디어 요약의 JSON 직렬화 결과입니다.
pub fn remix_prompt(sources_json: &str, keywords: &str, mix_mode: MixMode) -> String {
    format!(
        r#"Bạn là một chuyên gia chiến lược nội dung TikTok cho HOCMAI, một nền tảng giáo dục trực tuyến tại Việt Nam.
Nhiệm vụ của bạn là tạo ra các ý tưởng video mới, sáng tạo bằng cách kết hợp các ý tưởng thành công hiện có với các từ khóa mới.

**1. Ý tưởng thành công hiện có (Top Tier):**
{sources}

**2. Từ khóa mới cần kết hợp:**
"{keywords}"

**3. Hướng sáng tạo (Chế độ trộn):**
"{directive}"

**Hướng dẫn:**
- Dựa trên hướng sáng tạo đã chọn, tạo ra đúng 5 ý tưởng mở rộng mới.
- 'originalTheme' phải lặp lại chính xác tiêu đề của ý tưởng gốc đã dùng.
- 'ideaSource' phải phản ánh chế độ trộn đã sử dụng.
- 'newPotentialScore' là ước tính chuyên môn (1-5), xem xét điểm số ban đầu và tiềm năng của từ khóa mới.
- 'hooks' gồm phiên bản đầy đủ (cho kịch bản) và phiên bản mini (cho văn bản trên màn hình).
- Duy trì tiếng nói thương hiệu HOCMAI: gần gũi, dành cho học sinh Gen Z, hữu ích và đôi khi hài hước.
- Các ý tưởng mới phải khác biệt và không chỉ là diễn đạt lại đơn giản.

Trả về một mảng JSON duy nhất chứa các ý tưởng mới."#,
        sources = sources_json,
        keywords = keywords.trim(),
        directive = mix_mode.directive(),
    )
}
