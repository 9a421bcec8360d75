//! 共有データ型
//!
//! CLIと照合ロジックで共有される型:
//! - PrescriptionProfile: 処方度数（SPH/CYL/AXIS/PD）
//! - CatalogItem: 商品カタログのフレーム
//! - FaceScanReport: AIフェイススキャンの結果
//! - ChatMessage: 相談チャットの履歴

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// フレーム素材カテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "TR")]
    Tr,
    Metal,
    Acetate,
    Premium,
    Kids,
    Sunglasses,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Tr,
        Category::Metal,
        Category::Acetate,
        Category::Premium,
        Category::Kids,
        Category::Sunglasses,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tr => "TR",
            Category::Metal => "Metal",
            Category::Acetate => "Acetate",
            Category::Premium => "Premium",
            Category::Kids => "Kids",
            Category::Sunglasses => "Sunglasses",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Unknown category: {}. Use TR, Metal, Acetate, Premium, Kids, or Sunglasses",
                    s
                )
            })
    }
}

/// フレーム形状
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameShape {
    Round,
    Square,
    Rectangle,
    #[serde(rename = "Cat-Eye")]
    CatEye,
    Aviator,
}

impl FrameShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameShape::Round => "Round",
            FrameShape::Square => "Square",
            FrameShape::Rectangle => "Rectangle",
            FrameShape::CatEye => "Cat-Eye",
            FrameShape::Aviator => "Aviator",
        }
    }
}

impl fmt::Display for FrameShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// 顔型（Anyはすべての顔型に合う）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceShape {
    Oval,
    Round,
    Square,
    Heart,
    Diamond,
    Any,
}

impl std::str::FromStr for FaceShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "oval" => Ok(FaceShape::Oval),
            "round" => Ok(FaceShape::Round),
            "square" => Ok(FaceShape::Square),
            "heart" => Ok(FaceShape::Heart),
            "diamond" => Ok(FaceShape::Diamond),
            "any" => Ok(FaceShape::Any),
            _ => Err(format!(
                "Unknown face shape: {}. Use oval, round, square, heart, diamond, or any",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductColor {
    pub name: String,
    pub hex: String,
}

/// カタログ商品
///
/// 照合に使うのは `category` と `shape` のみ。その他は表示用。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: u32,
    pub category: Category,
    pub shape: FrameShape,

    #[serde(default)]
    pub image: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub sizes: Vec<String>,

    #[serde(default)]
    pub colors: Vec<ProductColor>,

    #[serde(default)]
    pub face_shapes: Vec<FaceShape>,
}

impl CatalogItem {
    /// 照合に必要な最小限の項目で作成
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category, shape: FrameShape) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: 0,
            category,
            shape,
            image: String::new(),
            image_prompt: None,
            description: String::new(),
            sizes: Vec::new(),
            colors: Vec::new(),
            face_shapes: Vec::new(),
        }
    }

    pub fn with_price(mut self, price: u32) -> Self {
        self.price = price;
        self
    }

    pub fn with_face_shapes(mut self, face_shapes: &[FaceShape]) -> Self {
        self.face_shapes = face_shapes.to_vec();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// 顔型に合うか（face_shapes が空、または Any を含む場合は常に合う）
    pub fn suits_face(&self, face: FaceShape) -> bool {
        self.face_shapes.is_empty()
            || face == FaceShape::Any
            || self.face_shapes.iter().any(|f| *f == face || *f == FaceShape::Any)
    }
}

/// 処方度数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionProfile {
    /// 球面度数（D）。近視はマイナス、遠視はプラス
    #[serde(alias = "sph", default)]
    pub sphere: f64,

    /// 円柱度数（D）。照合では絶対値のみ使う
    #[serde(alias = "cyl", default)]
    pub cylinder: f64,

    /// 乱視軸（度）
    #[serde(default)]
    pub axis: u16,

    /// 瞳孔間距離（mm）
    #[serde(alias = "pd", default = "default_pd")]
    pub pupillary_distance: u16,

    /// 加入度数（老眼用、任意）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add: Option<f64>,
}

fn default_pd() -> u16 {
    PrescriptionProfile::DEFAULT_PD
}

impl PrescriptionProfile {
    pub const DEFAULT_PD: u16 = 63;
    pub const MAX_AXIS: u16 = 180;

    pub fn new(sphere: f64, cylinder: f64, axis: u16, pupillary_distance: u16) -> Self {
        Self {
            sphere,
            cylinder,
            axis,
            pupillary_distance,
            add: None,
        }
    }

    /// OCRが使えないときに表示する見本の読み取り値
    pub fn sample_reading() -> Self {
        Self::new(-2.75, -0.50, 180, 64)
    }
}

impl Default for PrescriptionProfile {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0, Self::DEFAULT_PD)
    }
}

impl fmt::Display for PrescriptionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SPH {:+.2} / CYL {:+.2} / AXIS {} / PD {}mm",
            self.sphere, self.cylinder, self.axis, self.pupillary_distance
        )?;
        if let Some(add) = self.add {
            write!(f, " / ADD {:+.2}", add)?;
        }
        Ok(())
    }
}

/// 店舗情報（チャットのプロンプトと代替応答に使用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShopDetails {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub whatsapp: String,
    pub optometrist: String,
}

impl Default for ShopDetails {
    fn default() -> Self {
        Self {
            name: "Drishtii Eyecare".into(),
            address: "Bethuadahari".into(),
            phone: String::new(),
            whatsapp: String::new(),
            optometrist: "Dr. Suman Talapatra".into(),
        }
    }
}

/// 推奨フレーム寸法（AIの推定値、文字列のまま保持）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Measurements {
    pub pd: String,
    pub bridge: String,
    pub temple: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameSuggestion {
    pub name: String,
    pub confidence: String,
    pub status: String,
}

/// AIフェイススキャン結果
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaceScanReport {
    pub face_shape: String,
    pub measurements: Measurements,
    pub recommendations: Vec<FrameSuggestion>,
    pub full_report_text: String,
    pub whatsapp_report: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}
