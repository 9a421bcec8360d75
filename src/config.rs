use crate::error::{AdvisorError, Result};
use eyewear_advisor_common::{Catalog, MatchThresholds, ShopDetails};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    /// 画像解析（フェイススキャン・処方箋読み取り）に使うモデル
    pub vision_model: String,
    /// 相談チャットに使うモデル
    pub chat_model: String,
    pub max_image_size: u32,
    pub timeout_seconds: u64,
    /// 区分・乱視判定の閾値
    pub thresholds: MatchThresholds,
    pub shop: ShopDetails,
    /// カタログJSON（未指定なら組み込みカタログ）
    pub catalog_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            vision_model: "gemini-2.5-flash".into(),
            chat_model: "gemini-2.5-flash".into(),
            max_image_size: 1024,
            timeout_seconds: 60,
            thresholds: MatchThresholds::default(),
            shop: ShopDetails::default(),
            catalog_path: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスから読み込み（存在しなければ既定値）
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AdvisorError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("eyewear-advisor"))
    }

    fn validate(&self) -> Result<()> {
        if !self.thresholds.is_valid() {
            return Err(AdvisorError::Config(format!(
                "閾値が不正です: {:?}",
                self.thresholds
            )));
        }
        if self.max_image_size == 0 {
            return Err(AdvisorError::Config("max_image_size は1以上にしてください".into()));
        }
        Ok(())
    }

    pub fn get_api_key(&self) -> Result<String> {
        resolve_api_key(std::env::var("GEMINI_API_KEY").ok(), self.api_key.as_deref())
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }

    /// カタログを読み込み（引数 > 設定 > 組み込みの順）
    pub fn load_catalog(&self, override_path: Option<&Path>) -> Result<Catalog> {
        match override_path.or(self.catalog_path.as_deref()) {
            Some(path) => {
                if !path.exists() {
                    return Err(AdvisorError::FileNotFound(path.display().to_string()));
                }
                Ok(Catalog::from_file(path)?)
            }
            None => Ok(Catalog::builtin()),
        }
    }
}

/// 環境変数を優先し、空白だけのキーは未設定として扱う
fn resolve_api_key(env_key: Option<String>, stored: Option<&str>) -> Result<String> {
    env_key
        .filter(|k| !k.trim().is_empty())
        .or_else(|| stored.filter(|k| !k.trim().is_empty()).map(String::from))
        .ok_or(AdvisorError::MissingApiKey)
}
