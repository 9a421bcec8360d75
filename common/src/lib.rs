//! Eyewear Advisor Common Library
//!
//! CLIとAI連携で共有される型と、処方度数からのフレーム照合ロジック

pub mod types;
pub mod tier;
pub mod matcher;
pub mod catalog;
pub mod error;
pub mod prompts;
pub mod parser;
pub mod fallback;

pub use types::{
    CatalogItem, Category, ChatMessage, ChatRole, FaceScanReport, FaceShape, FrameShape,
    FrameSuggestion, Measurements, PrescriptionProfile, ProductColor, ShopDetails,
};
pub use tier::{MatchThresholds, SeverityTier, ASTIGMATISM_SHAPES};
pub use matcher::{recommend_frames, recommend_with, Recommendation, MAX_SUGGESTIONS};
pub use catalog::Catalog;
pub use error::{Error, Result};
pub use parser::{extract_json, parse_face_scan_response, parse_prescription_response};
pub use fallback::{fallback_chat_reply, EMPTY_CHAT_REPLY};
