//! 生成AIアドバイザー
//!
//! - GeminiAdvisor: Gemini API を呼び出す実装
//! - OfflineAdvisor: 固定の代替応答を返す実装
//! - FallbackAdvisor: 失敗時に代替応答へ切り替えるラッパー
//!
//! CLIは常に FallbackAdvisor 経由で呼び出し、AIの失敗を利用者に見せない。

mod gemini;
mod offline;

pub use gemini::GeminiAdvisor;
pub use offline::OfflineAdvisor;

use crate::ai_provider::AiProvider;
use crate::config::Config;
use crate::error::{AdvisorError, Result};
use crate::snapshot::Snapshot;
use async_trait::async_trait;
use eyewear_advisor_common::{Catalog, ChatMessage, FaceScanReport, PrescriptionProfile};

#[async_trait]
pub trait StyleAdvisor: Send + Sync {
    /// 顔画像から顔型・寸法・おすすめフレームを推定
    async fn analyze_face(&self, snapshot: Option<&Snapshot>) -> Result<FaceScanReport>;

    /// 相談チャットの返答
    async fn chat(&self, history: &[ChatMessage], message: &str) -> Result<String>;

    /// 処方箋画像から度数を読み取り
    async fn read_prescription(&self, snapshot: &Snapshot) -> Result<PrescriptionProfile>;
}

/// 応答の出所
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Live,
    Fallback,
}

/// 失敗時に OfflineAdvisor の応答へ切り替える
pub struct FallbackAdvisor<A> {
    primary: Option<A>,
    offline: OfflineAdvisor,
}

impl<A: StyleAdvisor> FallbackAdvisor<A> {
    pub fn new(primary: A, offline: OfflineAdvisor) -> Self {
        Self {
            primary: Some(primary),
            offline,
        }
    }

    /// 呼び出し先なし（常に代替応答）
    pub fn offline_only(offline: OfflineAdvisor) -> Self {
        Self {
            primary: None,
            offline,
        }
    }

    pub fn is_live(&self) -> bool {
        self.primary.is_some()
    }

    /// フェイススキャン（出所付き）。キャッシュ可否の判定に使う
    pub async fn analyze_face_traced(&self, snapshot: Option<&Snapshot>) -> (FaceScanReport, Origin) {
        let Some(primary) = &self.primary else {
            return (FaceScanReport::fallback(), Origin::Fallback);
        };

        match primary.analyze_face(snapshot).await {
            Ok(report) => (report, Origin::Live),
            Err(e) => {
                tracing::warn!(error = %e, "face analysis failed, using fallback report");
                (FaceScanReport::fallback(), Origin::Fallback)
            }
        }
    }
}

#[async_trait]
impl<A: StyleAdvisor> StyleAdvisor for FallbackAdvisor<A> {
    async fn analyze_face(&self, snapshot: Option<&Snapshot>) -> Result<FaceScanReport> {
        Ok(self.analyze_face_traced(snapshot).await.0)
    }

    async fn chat(&self, history: &[ChatMessage], message: &str) -> Result<String> {
        let Some(primary) = &self.primary else {
            return self.offline.chat(history, message).await;
        };

        match primary.chat(history, message).await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                tracing::warn!(error = %e, "chat failed, using fallback reply");
                self.offline.chat(history, message).await
            }
        }
    }

    async fn read_prescription(&self, snapshot: &Snapshot) -> Result<PrescriptionProfile> {
        let Some(primary) = &self.primary else {
            return self.offline.read_prescription(snapshot).await;
        };

        match primary.read_prescription(snapshot).await {
            Ok(profile) => Ok(profile),
            Err(e) => {
                tracing::warn!(error = %e, "prescription reading failed, using sample values");
                self.offline.read_prescription(snapshot).await
            }
        }
    }
}

/// Box化したアドバイザーも StyleAdvisor として扱う
#[async_trait]
impl StyleAdvisor for Box<dyn StyleAdvisor> {
    async fn analyze_face(&self, snapshot: Option<&Snapshot>) -> Result<FaceScanReport> {
        self.as_ref().analyze_face(snapshot).await
    }

    async fn chat(&self, history: &[ChatMessage], message: &str) -> Result<String> {
        self.as_ref().chat(history, message).await
    }

    async fn read_prescription(&self, snapshot: &Snapshot) -> Result<PrescriptionProfile> {
        self.as_ref().read_prescription(snapshot).await
    }
}

/// プロバイダ設定からアドバイザーを構築
///
/// APIキーがない場合は警告を出してオフライン応答に切り替える
pub fn build_advisor(
    provider: AiProvider,
    config: &Config,
    catalog: &Catalog,
) -> Result<FallbackAdvisor<Box<dyn StyleAdvisor>>> {
    let offline = OfflineAdvisor::new(config.shop.clone());

    match provider {
        AiProvider::Offline => Ok(FallbackAdvisor::offline_only(offline)),
        AiProvider::Gemini => match config.get_api_key() {
            Ok(key) => {
                let names = catalog.names().into_iter().map(String::from).collect();
                let gemini: Box<dyn StyleAdvisor> = Box::new(GeminiAdvisor::new(config, key, names)?);
                Ok(FallbackAdvisor::new(gemini, offline))
            }
            Err(AdvisorError::MissingApiKey) => {
                tracing::warn!("{}", AdvisorError::MissingApiKey);
                Ok(FallbackAdvisor::offline_only(offline))
            }
            Err(e) => Err(e),
        },
    }
}
