//! 商品カタログ
//!
//! JSONファイルから読み込むか、組み込みのショールームカタログを使う。
//! 並び順は提案順位になるため、すべての操作で順序を保つ。

use crate::error::{Error, Result};
use crate::types::{CatalogItem, Category, FaceShape, FrameShape};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// 商品一覧から作成（ID重複はエラー）
    pub fn new(items: Vec<CatalogItem>) -> Result<Self> {
        let catalog = Self { items };
        catalog.validate()?;
        Ok(catalog)
    }

    /// JSON配列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let items: Vec<CatalogItem> = serde_json::from_str(json)?;
        Self::new(items)
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn filter_by_category(&self, category: Category) -> Vec<&CatalogItem> {
        self.items.iter().filter(|item| item.category == category).collect()
    }

    pub fn filter_by_face_shape(&self, face: FaceShape) -> Vec<&CatalogItem> {
        self.items.iter().filter(|item| item.suits_face(face)).collect()
    }

    /// 商品名一覧（フェイススキャンのプロンプト用）
    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.name.as_str()).collect()
    }

    /// IDの重複・空IDをチェック
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for item in &self.items {
            if item.id.trim().is_empty() {
                return Err(Error::Catalog(format!("empty id for item: {}", item.name)));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(Error::Catalog(format!("duplicate id: {}", item.id)));
            }
        }
        Ok(())
    }

    /// 組み込みのショールームカタログ
    pub fn builtin() -> Self {
        use Category::*;
        use FaceShape as F;

        let items = vec![
            CatalogItem::new("tr-flexblue", "TR Flexblue Pro", Tr, FrameShape::Round)
                .with_price(999)
                .with_face_shapes(&[F::Square, F::Heart])
                .with_description("Flexible TR90 frame with a titanium core"),
            CatalogItem::new("glossy-metal", "Glossy Metal Frame", Metal, FrameShape::Rectangle)
                .with_price(1299)
                .with_face_shapes(&[F::Round, F::Oval])
                .with_description("Lightweight polished metal for everyday wear"),
            CatalogItem::new("aviator-teardrop", "Aviator Teardrop", Metal, FrameShape::Aviator)
                .with_price(1499)
                .with_face_shapes(&[F::Oval, F::Heart, F::Square]),
            CatalogItem::new("square-angular", "Square Angular", Tr, FrameShape::Square)
                .with_price(999)
                .with_face_shapes(&[F::Round, F::Oval]),
            CatalogItem::new("vintage-tortoise", "Vintage Tortoise", Acetate, FrameShape::Square)
                .with_price(1799)
                .with_face_shapes(&[F::Round, F::Diamond])
                .with_description("Hand polished tortoiseshell acetate"),
            CatalogItem::new("round-bohemian", "Round Bohemian", Acetate, FrameShape::Round)
                .with_price(1599)
                .with_face_shapes(&[F::Square, F::Diamond]),
            CatalogItem::new("navigator-squared", "Navigator Squared", Metal, FrameShape::Square)
                .with_price(1699)
                .with_face_shapes(&[F::Oval, F::Round]),
            CatalogItem::new("oversized-rectangle", "Oversized Rectangle", Acetate, FrameShape::Rectangle)
                .with_price(1899)
                .with_face_shapes(&[F::Round, F::Oval, F::Heart]),
            CatalogItem::new("cat-eye-upsweep", "Cat-Eye Upsweep", Acetate, FrameShape::CatEye)
                .with_price(1899)
                .with_face_shapes(&[F::Heart, F::Diamond, F::Oval]),
            CatalogItem::new("titanium-gold", "Pro Titanium Gold", Premium, FrameShape::Round)
                .with_price(3499)
                .with_face_shapes(&[F::Square, F::Oval])
                .with_description("Hypoallergenic titanium, thin-edge high-index ready"),
            CatalogItem::new("clubmaster-browline", "Clubmaster Browline", Premium, FrameShape::Rectangle)
                .with_price(3999)
                .with_face_shapes(&[F::Any]),
            CatalogItem::new("wayfarer-trapezoid", "Wayfarer Trapezoid", Premium, FrameShape::Square)
                .with_price(3799)
                .with_face_shapes(&[F::Round, F::Oval]),
            CatalogItem::new("kids-flex", "Kids Flex Round", Kids, FrameShape::Round)
                .with_price(799)
                .with_face_shapes(&[F::Any]),
            CatalogItem::new("stealth-sun-block", "Stealth Sun Block", Sunglasses, FrameShape::Square)
                .with_price(1999)
                .with_face_shapes(&[F::Oval, F::Heart]),
        ];

        Self { items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let catalog = Catalog::builtin();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.len(), 14);
    }

    #[test]
    fn test_builtin_covers_every_category() {
        let catalog = Catalog::builtin();
        for category in Category::ALL {
            assert!(
                !catalog.filter_by_category(category).is_empty(),
                "カテゴリが不足: {}",
                category
            );
        }
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"id": "a", "name": "A", "category": "TR", "shape": "Round"},
            {"id": "b", "name": "B", "category": "Premium", "shape": "Cat-Eye"}
        ]"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.find("b").unwrap().shape, FrameShape::CatEye);
        assert!(catalog.find("c").is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let json = r#"[
            {"id": "a", "name": "A", "category": "TR", "shape": "Round"},
            {"id": "a", "name": "A2", "category": "Metal", "shape": "Square"}
        ]"#;
        let result = Catalog::from_json(json);
        assert!(matches!(result, Err(Error::Catalog(msg)) if msg.contains("duplicate id: a")));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let json = r#"[{"id": "a", "name": "A", "category": "Plastic", "shape": "Round"}]"#;
        assert!(matches!(Catalog::from_json(json), Err(Error::Json(_))));
    }

    #[test]
    fn test_filter_preserves_order() {
        let catalog = Catalog::builtin();
        let premium: Vec<&str> = catalog
            .filter_by_category(Category::Premium)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(premium, vec!["titanium-gold", "clubmaster-browline", "wayfarer-trapezoid"]);
    }

    #[test]
    fn test_filter_by_face_shape() {
        let catalog = Catalog::builtin();
        let heart = catalog.filter_by_face_shape(FaceShape::Heart);
        // Any 指定の商品は常に含まれる
        assert!(heart.iter().any(|i| i.id == "clubmaster-browline"));
        assert!(heart.iter().all(|i| i.suits_face(FaceShape::Heart)));
        assert!(!heart.iter().any(|i| i.id == "glossy-metal"));
        assert_eq!(catalog.filter_by_face_shape(FaceShape::Any).len(), catalog.len());
    }

    #[test]
    fn test_serialize_roundtrip_is_array() {
        let catalog = Catalog::builtin();
        let json = serde_json::to_string(&catalog).unwrap();
        assert!(json.starts_with('['));
    }
}
