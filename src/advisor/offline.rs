use super::StyleAdvisor;
use crate::error::Result;
use crate::snapshot::Snapshot;
use async_trait::async_trait;
use eyewear_advisor_common::{
    fallback_chat_reply, ChatMessage, FaceScanReport, PrescriptionProfile, ShopDetails,
};

/// ネットワークを使わない固定応答
///
/// Gemini が使えない場合の代替として、常に成功する。
#[derive(Debug, Clone, Default)]
pub struct OfflineAdvisor {
    shop: ShopDetails,
}

impl OfflineAdvisor {
    pub fn new(shop: ShopDetails) -> Self {
        Self { shop }
    }
}

#[async_trait]
impl StyleAdvisor for OfflineAdvisor {
    async fn analyze_face(&self, _snapshot: Option<&Snapshot>) -> Result<FaceScanReport> {
        Ok(FaceScanReport::fallback())
    }

    async fn chat(&self, _history: &[ChatMessage], _message: &str) -> Result<String> {
        Ok(fallback_chat_reply(&self.shop))
    }

    async fn read_prescription(&self, _snapshot: &Snapshot) -> Result<PrescriptionProfile> {
        Ok(PrescriptionProfile::sample_reading())
    }
}
