//! 組み込みカタログに対するフレーム照合の統合テスト

use eyewear_advisor::prescription::parse_prescription_text;
use eyewear_advisor_common::{
    recommend_frames, recommend_with, Catalog, Category, FrameShape, MatchThresholds,
    PrescriptionProfile, SeverityTier, MAX_SUGGESTIONS,
};

fn ids(items: &[&eyewear_advisor_common::CatalogItem]) -> Vec<String> {
    items.iter().map(|i| i.id.clone()).collect()
}

#[test]
fn test_sample_reading_suggests_structure_frames() {
    let catalog = Catalog::builtin();
    let rx = parse_prescription_text("SPH -2.75 CYL -0.50 AXIS 180 PD 64").unwrap();
    let items = recommend_frames(&rx, catalog.items());

    assert_eq!(
        ids(&items),
        vec!["glossy-metal", "aviator-teardrop", "vintage-tortoise", "round-bohemian"]
    );
}

#[test]
fn test_mild_prescription_suggests_essential() {
    let catalog = Catalog::builtin();
    let rx = PrescriptionProfile::new(-1.25, 0.0, 0, 63);
    let items = recommend_frames(&rx, catalog.items());

    assert_eq!(
        ids(&items),
        vec!["tr-flexblue", "glossy-metal", "aviator-teardrop", "square-angular"]
    );
}

#[test]
fn test_high_power_with_astigmatism() {
    let catalog = Catalog::builtin();
    let rx = PrescriptionProfile::new(8.0, -1.5, 90, 62);
    let rec = recommend_with(&rx, catalog.items(), &MatchThresholds::default());

    assert_eq!(rec.tier, SeverityTier::Elite);
    assert!(rec.astigmatism);
    assert_eq!(ids(&rec.items), vec!["clubmaster-browline", "wayfarer-trapezoid"]);
}

/// 結果は常に区分・形状の条件を満たし、カタログ順で最大4件
#[test]
fn test_results_respect_rules_over_power_grid() {
    let catalog = Catalog::builtin();
    let thresholds = MatchThresholds::default();

    for sph_step in -40..=40 {
        for cyl_step in -12..=0 {
            let rx = PrescriptionProfile::new(sph_step as f64 * 0.25, cyl_step as f64 * 0.25, 90, 63);
            let rec = recommend_with(&rx, catalog.items(), &thresholds);

            assert!(rec.items.len() <= MAX_SUGGESTIONS);
            for item in &rec.items {
                assert!(rec.tier.accepts(item.category));
                assert!(!matches!(item.category, Category::Kids | Category::Sunglasses));
                if rec.astigmatism {
                    assert!(matches!(item.shape, FrameShape::Rectangle | FrameShape::Square));
                }
            }

            let positions: Vec<usize> = rec
                .items
                .iter()
                .map(|item| catalog.items().iter().position(|c| c.id == item.id).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}

/// 閾値を設定で変えると区分も変わる
#[test]
fn test_custom_thresholds() {
    let catalog = Catalog::builtin();
    let thresholds = MatchThresholds {
        essential_max: 3.0,
        ..MatchThresholds::default()
    };
    let rx = PrescriptionProfile::sample_reading();

    let rec = recommend_with(&rx, catalog.items(), &thresholds);
    assert_eq!(rec.tier, SeverityTier::Essential);
    assert_eq!(rec.items[0].id, "tr-flexblue");
}

/// JSONから読み込んだカタログでも順序が保たれる
#[test]
fn test_catalog_from_json_order() {
    let catalog = Catalog::from_json(
        r#"[
            {"id": "z", "name": "Z", "category": "Metal", "shape": "Square"},
            {"id": "k", "name": "K", "category": "Kids", "shape": "Square"},
            {"id": "a", "name": "A", "category": "TR", "shape": "Rectangle"},
            {"id": "r", "name": "R", "category": "TR", "shape": "Round"}
        ]"#,
    )
    .unwrap();

    let rx = PrescriptionProfile::new(-0.5, -1.0, 10, 63);
    assert_eq!(ids(&recommend_frames(&rx, catalog.items())), vec!["z", "a"]);
}
