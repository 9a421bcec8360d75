//! プロンプト生成モジュール
//!
//! - build_face_scan_prompt: フェイススキャン（画像解析）用
//! - build_chat_system_prompt: 相談チャットのシステム指示
//! - build_prescription_prompt: 処方箋画像の読み取り用
//!
//! 応答形式の宣言（responseSchema）も合わせて提供する。

use crate::types::ShopDetails;
use serde_json::{json, Value};

/// 顔型の選択肢
pub const FACE_SHAPES: &[&str] = &["Round", "Oval", "Square", "Heart", "Diamond"];

/// フェイススキャン用プロンプト
///
/// # Arguments
/// * `shop_name` - 店舗名
/// * `frame_names` - 提案に使ってよいフレーム名（カタログ順）
pub fn build_face_scan_prompt(shop_name: &str, frame_names: &[&str]) -> String {
    let face_shapes = FACE_SHAPES.join(", ");
    let frames = frame_names.join(", ");

    format!(
        r#"You are an expert eyewear stylist for "{shop_name}".
Always behave as if the AI face scan completed successfully, even if the camera or lighting is poor.
Never mention errors, lighting problems, scan failures, or technical issues.
Your ONLY job is to generate a confident AI FACE SCAN SUGGEST REPORT based on a realistic facial analysis.

OUTPUT FORMAT: Return ONLY a JSON object with these fields:
1. "faceShape": (One of: {face_shapes})
2. "measurements": {{ "pd": "62-66mm", "bridge": "17-19mm", "temple": "140-145mm" }}
3. "recommendations": (Array of 3 objects from our catalog with "name", "confidence", "status")
   - Use these exact names: {frames}.
4. "fullReportText": (A string formatted EXACTLY as follows)
   - Line 1: AI FACE SCAN SUGGEST REPORT
   - Line 2: Digital Face Fit Report for Guest
   - Line 3: AI style assistant has successfully analyzed your facial geometry and prepared personalized frame suggestions.
   - Section: Facial Profile Highlights (3 bullets: shape, width, nose/eye traits)
   - Section: Frame Style Recommendations (4 bullets: frame name + benefit)
   - Section: Styling Tips From Our AI (3 bullets: color, thickness, usage)
   - One-sentence CTA to visit store.
   - Disclaimer: This is an AI style suggestion only and not a medical or diagnostic report; final advice is provided in-store by our eye-care professional.
5. "whatsappReport": (A shorter version for sharing)

Keep the full report under 180 words. Use simple, premium English. Never say the scan failed."#
    )
}

/// フェイススキャン応答の形式宣言
pub fn face_scan_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "faceShape": { "type": "STRING" },
            "measurements": {
                "type": "OBJECT",
                "properties": {
                    "pd": { "type": "STRING" },
                    "bridge": { "type": "STRING" },
                    "temple": { "type": "STRING" }
                },
                "required": ["pd", "bridge", "temple"]
            },
            "recommendations": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "confidence": { "type": "STRING" },
                        "status": { "type": "STRING" }
                    },
                    "required": ["name", "confidence", "status"]
                }
            },
            "fullReportText": { "type": "STRING" },
            "whatsappReport": { "type": "STRING" }
        },
        "required": ["faceShape", "measurements", "recommendations", "fullReportText", "whatsappReport"]
    })
}

/// 相談チャットのシステム指示
pub fn build_chat_system_prompt(shop: &ShopDetails) -> String {
    let phone = if shop.phone.is_empty() { "ask at the store" } else { shop.phone.as_str() };

    format!(
        r#"You are the AI Health & Style Consultant for {name}.

LOCATION: {address}.
PHONE: {phone}.
EXPERT: {expert}.

EYE HEALTH SYMPTOM PROTOCOL:
If the user mentions symptoms like "dry eyes", "redness", "blurry vision", "stinging", "watery eyes", or "headaches":
1. Respond with empathy.
2. Provide helpful immediate tips (e.g., for dry eyes: follow the 20-20-20 rule; every 20 minutes, look at something 20 feet away for 20 seconds. Use lubricating drops.).
3. MANDATORY: State clearly that these could be signs of underlying issues and recommend a professional computerized eye test at our store.
4. SUGGEST: Book an appointment or message us on WhatsApp to secure a priority slot with {expert}.
5. DISCLAIMER: Always mention that your advice is for informational purposes and not a medical diagnosis.

STYLE PROTOCOL:
Suggest frames based on face shape or preference from our catalog.

BILINGUAL: Respond in the language the user uses (English or Bengali)."#,
        name = shop.name,
        address = shop.address,
        phone = phone,
        expert = shop.optometrist,
    )
}

/// 処方箋画像の読み取り用プロンプト
pub fn build_prescription_prompt() -> String {
    r#"You are reading an eye test report (spectacle prescription).
Extract the distance prescription values for the RIGHT eye (OD). If only one eye is given, use that.

OUTPUT FORMAT: Return ONLY a JSON object:
{
  "sph": sphere in diopters as a number (negative for myopia),
  "cyl": cylinder in diopters as a number (0 if absent),
  "axis": axis in degrees as an integer 0-180 (0 if absent),
  "pd": pupillary distance in millimeters as an integer (63 if absent)
}"#
    .to_string()
}

/// 処方箋読み取り応答の形式宣言
pub fn prescription_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "sph": { "type": "NUMBER" },
            "cyl": { "type": "NUMBER" },
            "axis": { "type": "INTEGER" },
            "pd": { "type": "INTEGER" }
        },
        "required": ["sph", "cyl", "axis", "pd"]
    })
}
