//! 静止画スナップショット
//!
//! カメラ撮影やアップロードされた画像を、AIへ送るインライン画像
//! （MIMEタイプ + Base64）に変換する。

use crate::error::{AdvisorError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use std::path::PathBuf;

/// アップロード上限（5MB）
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

const JPEG_QUALITY: u8 = 85;

/// インライン画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub mime_type: String,
    /// Base64エンコード済みデータ
    pub data: String,
}

impl Snapshot {
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// "data:image/jpeg;base64,/9j/4AAQ..." 形式のData URLから作成
    ///
    /// base64 形式でないData URLは None
    pub fn from_data_url(data_url: &str) -> Option<Self> {
        let rest = data_url.strip_prefix("data:")?;
        let (header, data) = rest.split_once(',')?;
        let mime_type = header.strip_suffix(";base64")?;
        if data.is_empty() {
            return None;
        }

        Some(Self {
            mime_type: if mime_type.is_empty() { "image/jpeg".into() } else { mime_type.into() },
            data: data.to_string(),
        })
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| AdvisorError::ImageLoad(format!("Base64デコード失敗: {}", e)))
    }
}

/// スナップショットの取得元
pub trait SnapshotSource {
    fn capture(&self) -> Result<Snapshot>;
}

/// 画像ファイルから取得（最大辺を max_size に縮小しJPEG化）
#[derive(Debug, Clone)]
pub struct FileSnapshotSource {
    path: PathBuf,
    max_size: u32,
}

impl FileSnapshotSource {
    pub fn new(path: impl Into<PathBuf>, max_size: u32) -> Self {
        Self {
            path: path.into(),
            max_size,
        }
    }
}

impl SnapshotSource for FileSnapshotSource {
    fn capture(&self) -> Result<Snapshot> {
        if !self.path.exists() {
            return Err(AdvisorError::FileNotFound(self.path.display().to_string()));
        }

        let size = std::fs::metadata(&self.path)?.len();
        if size > MAX_UPLOAD_BYTES {
            return Err(AdvisorError::ImageTooLarge(size));
        }

        let img = image::open(&self.path)
            .map_err(|e| AdvisorError::ImageLoad(format!("{}: {}", self.path.display(), e)))?;

        let img = if img.width() > self.max_size || img.height() > self.max_size {
            img.resize(self.max_size, self.max_size, FilterType::Triangle)
        } else {
            img
        };

        let rgb = img.to_rgb8();
        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY)
            .encode_image(&rgb)
            .map_err(|e| AdvisorError::ImageLoad(format!("JPEGエンコード失敗: {}", e)))?;

        tracing::debug!(
            path = %self.path.display(),
            width = rgb.width(),
            height = rgb.height(),
            bytes = buffer.len(),
            "snapshot captured"
        );

        Ok(Snapshot::from_bytes("image/jpeg", &buffer))
    }
}
