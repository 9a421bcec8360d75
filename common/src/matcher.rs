//! 処方度数 → フレーム提案の照合
//!
//! 入力（処方・カタログ）は変更しない純粋関数。
//! カタログの並び順を保ったまま条件に合う商品を最大 [`MAX_SUGGESTIONS`] 件返す。

use crate::tier::{MatchThresholds, SeverityTier, ASTIGMATISM_SHAPES};
use crate::types::{CatalogItem, PrescriptionProfile};

/// 提案の最大件数
pub const MAX_SUGGESTIONS: usize = 4;

/// 照合結果
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation<'a> {
    pub tier: SeverityTier,
    pub astigmatism: bool,
    pub items: Vec<&'a CatalogItem>,
}

impl Recommendation<'_> {
    /// 「Your Profile」行: 区分名と乱視対応の有無
    pub fn summary(&self) -> String {
        if self.astigmatism {
            format!("{} • Astigmatism Optimized", self.tier.label())
        } else {
            self.tier.label().to_string()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// 既定の閾値でフレームを提案
pub fn recommend_frames<'a>(
    profile: &PrescriptionProfile,
    catalog: &'a [CatalogItem],
) -> Vec<&'a CatalogItem> {
    recommend_with(profile, catalog, &MatchThresholds::default()).items
}

/// 閾値を指定してフレームを提案
///
/// 1. |SPH| で区分を判定し、対象カテゴリを決める
/// 2. |CYL| が閾値を超えれば形状を Rectangle / Square に限定
/// 3. カタログ順に先頭から最大4件
pub fn recommend_with<'a>(
    profile: &PrescriptionProfile,
    catalog: &'a [CatalogItem],
    thresholds: &MatchThresholds,
) -> Recommendation<'a> {
    let tier = thresholds.classify(profile.sphere);
    let astigmatism = thresholds.has_astigmatism(profile.cylinder);

    let items = catalog
        .iter()
        .filter(|item| tier.accepts(item.category))
        .filter(|item| !astigmatism || ASTIGMATISM_SHAPES.contains(&item.shape))
        .take(MAX_SUGGESTIONS)
        .collect();

    Recommendation {
        tier,
        astigmatism,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, FrameShape};

    fn item(id: &str, category: Category, shape: FrameShape) -> CatalogItem {
        CatalogItem::new(id, id, category, shape)
    }

    /// カテゴリ・形状を一通り含むテスト用カタログ
    fn sample_catalog() -> Vec<CatalogItem> {
        vec![
            item("tr-round", Category::Tr, FrameShape::Round),
            item("metal-aviator", Category::Metal, FrameShape::Aviator),
            item("acetate-square", Category::Acetate, FrameShape::Square),
            item("premium-round", Category::Premium, FrameShape::Round),
            item("metal-rect", Category::Metal, FrameShape::Rectangle),
            item("kids-round", Category::Kids, FrameShape::Round),
            item("tr-square", Category::Tr, FrameShape::Square),
            item("acetate-cat", Category::Acetate, FrameShape::CatEye),
            item("premium-rect", Category::Premium, FrameShape::Rectangle),
            item("sun-aviator", Category::Sunglasses, FrameShape::Aviator),
            item("tr-rect", Category::Tr, FrameShape::Rectangle),
            item("metal-round", Category::Metal, FrameShape::Round),
            item("premium-square", Category::Premium, FrameShape::Square),
            item("acetate-rect", Category::Acetate, FrameShape::Rectangle),
        ]
    }

    fn ids(items: &[&CatalogItem]) -> Vec<String> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    fn profile(sphere: f64, cylinder: f64) -> PrescriptionProfile {
        PrescriptionProfile::new(sphere, cylinder, 0, 63)
    }

    #[test]
    fn test_essential_tier() {
        let catalog = sample_catalog();
        let result = recommend_frames(&profile(-1.25, 0.0), &catalog);
        assert_eq!(
            ids(&result),
            vec!["tr-round", "metal-aviator", "metal-rect", "tr-square"]
        );
    }

    #[test]
    fn test_structure_tier_worked_example() {
        let catalog = sample_catalog();
        let rx = PrescriptionProfile::sample_reading();
        let rec = recommend_with(&rx, &catalog, &MatchThresholds::default());

        assert_eq!(rec.tier, SeverityTier::Structure);
        assert!(!rec.astigmatism);
        assert_eq!(
            ids(&rec.items),
            vec!["metal-aviator", "acetate-square", "metal-rect", "acetate-cat"]
        );
    }

    #[test]
    fn test_elite_with_astigmatism_worked_example() {
        let catalog = sample_catalog();
        let rec = recommend_with(&profile(-7.5, -1.0), &catalog, &MatchThresholds::default());

        assert_eq!(rec.tier, SeverityTier::Elite);
        assert!(rec.astigmatism);
        assert_eq!(ids(&rec.items), vec!["premium-rect", "premium-square"]);
        assert_eq!(rec.summary(), "High-Index Elite • Astigmatism Optimized");
    }

    #[test]
    fn test_boundary_sphere() {
        let catalog = sample_catalog();
        let at_two = recommend_with(&profile(-2.00, 0.0), &catalog, &MatchThresholds::default());
        assert_eq!(at_two.tier, SeverityTier::Essential);

        let past_two = recommend_with(&profile(-2.01, 0.0), &catalog, &MatchThresholds::default());
        assert_eq!(past_two.tier, SeverityTier::Structure);
    }

    #[test]
    fn test_boundary_cylinder() {
        let catalog = sample_catalog();
        let rec = recommend_with(&profile(0.0, 0.75), &catalog, &MatchThresholds::default());
        assert!(!rec.astigmatism);
        // 形状制限なしなので Round も含まれる
        assert!(rec.items.iter().any(|i| i.shape == FrameShape::Round));
    }

    #[test]
    fn test_hyperopia_uses_magnitude() {
        let catalog = sample_catalog();
        let plus = recommend_frames(&profile(3.5, 0.0), &catalog);
        let minus = recommend_frames(&profile(-3.5, 0.0), &catalog);
        assert_eq!(plus, minus);
    }

    #[test]
    fn test_zero_profile_routes_to_essential() {
        let catalog = sample_catalog();
        let rec = recommend_with(&PrescriptionProfile::default(), &catalog, &MatchThresholds::default());
        assert_eq!(rec.tier, SeverityTier::Essential);
        assert_eq!(rec.summary(), "Essential Fit");
    }

    #[test]
    fn test_empty_catalog() {
        let result = recommend_frames(&profile(-4.0, -2.0), &[]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_fewer_than_max_matches() {
        let catalog = vec![
            item("a", Category::Kids, FrameShape::Round),
            item("b", Category::Premium, FrameShape::Round),
        ];
        let result = recommend_frames(&profile(-8.0, 0.0), &catalog);
        assert_eq!(ids(&result), vec!["b"]);
    }

    #[test]
    fn test_kids_and_sunglasses_never_suggested() {
        let catalog = sample_catalog();
        for sphere in [-0.5, -3.0, -9.0, 1.0, 4.0, 10.0] {
            for cylinder in [0.0, -1.5] {
                let result = recommend_frames(&profile(sphere, cylinder), &catalog);
                assert!(result
                    .iter()
                    .all(|i| i.category != Category::Kids && i.category != Category::Sunglasses));
            }
        }
    }

    #[test]
    fn test_properties_over_grid() {
        let catalog = sample_catalog();
        let thresholds = MatchThresholds::default();

        let mut sphere = -10.0;
        while sphere <= 10.0 {
            for cylinder in [-2.0, -0.76, -0.75, 0.0, 0.5, 0.75, 1.25] {
                let rx = profile(sphere, cylinder);
                let rec = recommend_with(&rx, &catalog, &thresholds);

                // 件数上限
                assert!(rec.items.len() <= MAX_SUGGESTIONS);

                // 区分ごとのカテゴリ
                let strength = f64::abs(sphere);
                for i in &rec.items {
                    if strength <= 2.0 {
                        assert!(matches!(i.category, Category::Tr | Category::Metal));
                    } else if strength <= 6.0 {
                        assert!(matches!(i.category, Category::Acetate | Category::Metal));
                    } else {
                        assert_eq!(i.category, Category::Premium);
                    }
                    if f64::abs(cylinder) > 0.75 {
                        assert!(matches!(i.shape, FrameShape::Rectangle | FrameShape::Square));
                    }
                }

                // カタログの部分列（順序保持・重複なし）
                let mut cursor = 0;
                for i in &rec.items {
                    let pos = catalog[cursor..]
                        .iter()
                        .position(|c| std::ptr::eq(c, *i))
                        .expect("カタログ外の商品が返された");
                    cursor += pos + 1;
                }

                // 冪等性
                assert_eq!(rec, recommend_with(&rx, &catalog, &thresholds));
            }
            sphere += 0.25;
        }
    }

    #[test]
    fn test_inputs_not_mutated() {
        let catalog = sample_catalog();
        let snapshot = catalog.clone();
        let rx = profile(-5.0, -1.0);
        let _ = recommend_frames(&rx, &catalog);
        assert_eq!(catalog, snapshot);
        assert_eq!(rx, profile(-5.0, -1.0));
    }
}
