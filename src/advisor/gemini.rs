//! Gemini API連携
//!
//! generateContent REST エンドポイントへリクエストし、
//! 応答テキスト（JSON）を共通パーサーで解釈する。

use super::StyleAdvisor;
use crate::config::Config;
use crate::error::{AdvisorError, Result};
use crate::snapshot::Snapshot;
use async_trait::async_trait;
use eyewear_advisor_common::prompts::{
    build_chat_system_prompt, build_face_scan_prompt, build_prescription_prompt,
    face_scan_response_schema, prescription_response_schema,
};
use eyewear_advisor_common::{
    parse_face_scan_response, parse_prescription_response, ChatMessage, FaceScanReport,
    PrescriptionProfile, ShopDetails, EMPTY_CHAT_REPLY,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini APIリクエスト
#[derive(Debug, Serialize)]
pub(crate) struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

/// Gemini APIレスポンス
#[derive(Debug, Default, Deserialize)]
pub(crate) struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GeminiResponse {
    /// 最初の候補のテキストを連結して返す
    pub(crate) fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect::<String>())
            .unwrap_or_default()
    }
}

fn text_part(text: impl Into<String>) -> Part {
    Part::Text { text: text.into() }
}

fn image_part(snapshot: &Snapshot) -> Part {
    Part::InlineData {
        inline_data: InlineData {
            mime_type: snapshot.mime_type.clone(),
            data: snapshot.data.clone(),
        },
    }
}

fn json_config(schema: serde_json::Value) -> GenerationConfig {
    GenerationConfig {
        temperature: 0.4,
        response_mime_type: Some("application/json"),
        response_schema: Some(schema),
    }
}

/// フェイススキャンのリクエスト（画像がなければテキストのみ）
pub(crate) fn face_scan_request(
    shop_name: &str,
    frame_names: &[&str],
    snapshot: Option<&Snapshot>,
) -> GeminiRequest {
    let mut parts = vec![text_part(build_face_scan_prompt(shop_name, frame_names))];
    if let Some(snapshot) = snapshot {
        parts.push(image_part(snapshot));
    }

    GeminiRequest {
        contents: vec![Content { role: Some("user"), parts }],
        system_instruction: None,
        generation_config: json_config(face_scan_response_schema()),
    }
}

/// チャットのリクエスト（履歴 + 新しい発言）
pub(crate) fn chat_request(shop: &ShopDetails, history: &[ChatMessage], message: &str) -> GeminiRequest {
    let mut contents: Vec<Content> = history
        .iter()
        .map(|m| Content {
            role: Some(m.role.as_str()),
            parts: vec![text_part(m.text.clone())],
        })
        .collect();

    contents.push(Content {
        role: Some("user"),
        parts: vec![text_part(message)],
    });

    GeminiRequest {
        contents,
        system_instruction: Some(Content {
            role: None,
            parts: vec![text_part(build_chat_system_prompt(shop))],
        }),
        generation_config: GenerationConfig {
            temperature: 0.7,
            response_mime_type: None,
            response_schema: None,
        },
    }
}

pub(crate) fn prescription_request(snapshot: &Snapshot) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            role: Some("user"),
            parts: vec![text_part(build_prescription_prompt()), image_part(snapshot)],
        }],
        system_instruction: None,
        generation_config: GenerationConfig {
            temperature: 0.0,
            ..json_config(prescription_response_schema())
        },
    }
}

/// Gemini APIクライアント
pub struct GeminiAdvisor {
    client: reqwest::Client,
    api_key: String,
    vision_model: String,
    chat_model: String,
    shop: ShopDetails,
    frame_names: Vec<String>,
}

impl GeminiAdvisor {
    pub fn new(config: &Config, api_key: String, frame_names: Vec<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key,
            vision_model: config.vision_model.clone(),
            chat_model: config.chat_model.clone(),
            shop: config.shop.clone(),
            frame_names,
        })
    }

    /// API呼び出し（共通処理）
    async fn generate(&self, model: &str, request: &GeminiRequest) -> Result<String> {
        let url = format!("{}/{}:generateContent?key={}", GEMINI_API_BASE, model, self.api_key);
        tracing::debug!(model, contents = request.contents.len(), "gemini request");

        // URLにAPIキーが含まれるためエラーからは除く
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| e.without_url())?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::ApiCall(format!("status {}: {}", status, body)));
        }

        let payload: GeminiResponse = response.json().await.map_err(|e| e.without_url())?;
        let text = payload.text();
        tracing::debug!(model, chars = text.len(), "gemini response");
        Ok(text)
    }
}

#[async_trait]
impl StyleAdvisor for GeminiAdvisor {
    async fn analyze_face(&self, snapshot: Option<&Snapshot>) -> Result<FaceScanReport> {
        let names: Vec<&str> = self.frame_names.iter().map(String::as_str).collect();
        let request = face_scan_request(&self.shop.name, &names, snapshot);
        let text = self.generate(&self.vision_model, &request).await?;
        parse_face_scan_response(&text).map_err(|e| AdvisorError::ApiParse(e.to_string()))
    }

    async fn chat(&self, history: &[ChatMessage], message: &str) -> Result<String> {
        let request = chat_request(&self.shop, history, message);
        let text = self.generate(&self.chat_model, &request).await?;
        if text.trim().is_empty() {
            return Ok(EMPTY_CHAT_REPLY.to_string());
        }
        Ok(text)
    }

    async fn read_prescription(&self, snapshot: &Snapshot) -> Result<PrescriptionProfile> {
        let request = prescription_request(snapshot);
        let text = self.generate(&self.vision_model, &request).await?;
        parse_prescription_response(&text).map_err(|e| AdvisorError::ApiParse(e.to_string()))
    }
}
