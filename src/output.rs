//! 端末表示用の整形

use eyewear_advisor_common::{
    CatalogItem, FaceScanReport, PrescriptionProfile, Recommendation, SeverityTier,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Duration;

/// `suggest --json` の出力
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionOutput<'a> {
    pub profile: &'a PrescriptionProfile,
    pub tier: SeverityTier,
    pub tier_label: &'static str,
    pub astigmatism: bool,
    pub items: &'a [&'a CatalogItem],
}

impl<'a> SuggestionOutput<'a> {
    pub fn new(profile: &'a PrescriptionProfile, rec: &'a Recommendation<'a>) -> Self {
        Self {
            profile,
            tier: rec.tier,
            tier_label: rec.tier.label(),
            astigmatism: rec.astigmatism,
            items: &rec.items,
        }
    }
}

pub fn catalog_row(item: &CatalogItem) -> String {
    format!(
        "{:<22} {:<24} {:<10} {:<9} ₹{}",
        item.id, item.name, item.category, item.shape, item.price
    )
}

pub fn format_recommendation(profile: &PrescriptionProfile, rec: &Recommendation<'_>) -> String {
    let mut lines = vec![
        format!("処方: {}", profile),
        format!("Your Profile: {}", rec.summary()),
        String::new(),
    ];

    if rec.is_empty() {
        lines.push("条件に合うフレームがカタログにありません".to_string());
    } else {
        for (i, item) in rec.items.iter().enumerate() {
            lines.push(format!("  {}. {}", i + 1, catalog_row(item)));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Our engineering logic prioritizes {} for your specific power.",
        rec.tier.focus()
    ));
    lines.join("\n")
}

pub fn format_face_report(report: &FaceScanReport) -> String {
    let mut lines = vec![
        format!("顔型: {}", report.face_shape),
        format!(
            "推奨寸法: PD {} / ブリッジ {} / テンプル {}",
            report.measurements.pd, report.measurements.bridge, report.measurements.temple
        ),
        "おすすめ:".to_string(),
    ];
    for s in &report.recommendations {
        lines.push(format!("  - {} ({}, {})", s.name, s.confidence, s.status));
    }
    lines.push(String::new());
    lines.push(report.full_report_text.clone());
    lines.push(String::new());
    lines.push(format!("共有用: {}", report.whatsapp_report));
    lines.join("\n")
}

/// AI呼び出し中のスピナー
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
