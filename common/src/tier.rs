//! 度数の強さによる区分（Tier）判定
//!
//! - Essential: |SPH| <= 2.00 → TR / Metal
//! - Structure: 2.00 < |SPH| <= 6.00 → Acetate / Metal
//! - Elite: |SPH| > 6.00 → Premium
//!
//! 境界値は下位の区分に含める。乱視は |CYL| > 0.75 で判定する。

use crate::types::{Category, FrameShape};
use serde::{Deserialize, Serialize};

/// 乱視の場合に許可するフレーム形状
pub const ASTIGMATISM_SHAPES: &[FrameShape] = &[FrameShape::Rectangle, FrameShape::Square];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeverityTier {
    Essential,
    Structure,
    Elite,
}

impl SeverityTier {
    /// この区分で提案できる素材カテゴリ
    pub fn eligible_categories(&self) -> &'static [Category] {
        match self {
            SeverityTier::Essential => &[Category::Tr, Category::Metal],
            SeverityTier::Structure => &[Category::Acetate, Category::Metal],
            SeverityTier::Elite => &[Category::Premium],
        }
    }

    pub fn accepts(&self, category: Category) -> bool {
        self.eligible_categories().contains(&category)
    }

    /// 提案画面の表示名
    pub fn label(&self) -> &'static str {
        match self {
            SeverityTier::Essential => "Essential Fit",
            SeverityTier::Structure => "Structure Pro",
            SeverityTier::Elite => "High-Index Elite",
        }
    }

    /// フレーム設計で優先する点
    pub fn focus(&self) -> &'static str {
        match self {
            SeverityTier::Elite => "lens-masking depth",
            _ => "comfort and visual field",
        }
    }
}

/// 区分の閾値（D）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchThresholds {
    /// この値以下は Essential
    pub essential_max: f64,
    /// この値以下は Structure、超えると Elite
    pub structure_max: f64,
    /// |CYL| がこの値を超えると乱視扱い
    pub astigmatism_min: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            essential_max: 2.00,
            structure_max: 6.00,
            astigmatism_min: 0.75,
        }
    }
}

impl MatchThresholds {
    /// SPHから区分を判定（NaN は 0 として扱う）
    pub fn classify(&self, sphere: f64) -> SeverityTier {
        let strength = finite_abs(sphere);
        if strength <= self.essential_max {
            SeverityTier::Essential
        } else if strength <= self.structure_max {
            SeverityTier::Structure
        } else {
            SeverityTier::Elite
        }
    }

    pub fn has_astigmatism(&self, cylinder: f64) -> bool {
        finite_abs(cylinder) > self.astigmatism_min
    }

    /// 閾値の整合性チェック（設定ファイル読み込み時に使用）
    pub fn is_valid(&self) -> bool {
        self.essential_max.is_finite()
            && self.structure_max.is_finite()
            && self.astigmatism_min.is_finite()
            && self.essential_max >= 0.0
            && self.astigmatism_min >= 0.0
            && self.essential_max <= self.structure_max
    }
}

/// 絶対値（NaNは0）。+∞ はそのまま最上位区分へ振り分ける
fn finite_abs(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.abs()
    }
}
