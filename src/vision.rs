//! Gemini Vision API連携
//!
//! プロンプトと画像1枚を送り、モデルの応答テキストをそのまま返す。
//! 応答の解釈は depth_estimator_common::parser が担当する。

use crate::config::Config;
use crate::error::{DepthError, Result};
use crate::image_source::UploadedImage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// 外部ビジョンモデルとの境界
#[async_trait]
pub trait VisionModelClient: Send + Sync {
    /// モデル名（ログ表示用）
    fn model(&self) -> &str;

    /// プロンプトと画像を送信し、応答テキストを返す
    async fn generate(&self, prompt: &str, image: &UploadedImage) -> Result<String>;
}

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    status: Option<String>,
}

/// Gemini generateContent クライアント
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| DepthError::ApiCall(format!("HTTP client init failed: {}", e)))?;
        Self::with_http_client(config, http)
    }

    /// HTTPクライアントを差し替えて作成（プロキシ設定などを呼び出し側で決める場合）
    pub fn with_http_client(config: &Config, http: reqwest::Client) -> Result<Self> {
        let api_key = config.get_api_key()?.to_string();

        Ok(Self {
            http,
            api_key,
            model: config.model.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl VisionModelClient for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, image: &UploadedImage) -> Result<String> {
        let request = build_request(prompt, image, self.temperature);

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DepthError::ApiCall(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DepthError::ApiCall(e.without_url().to_string()))?;
        debug!("gemini status {} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(DepthError::ApiCall(describe_error(status.as_u16(), &body)));
        }

        let payload: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| DepthError::ApiCall(format!("invalid response envelope: {}", e)))?;
        extract_text(payload)
    }
}

fn build_request(prompt: &str, image: &UploadedImage, temperature: f32) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text {
                    text: prompt.to_string(),
                },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type.to_string(),
                        data: image.to_base64(),
                    },
                },
            ],
        }],
        generation_config: GenerationConfig { temperature },
    }
}

/// 最初の候補のテキストパートを連結
fn extract_text(response: GeminiResponse) -> Result<String> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!("prompt blocked: {}", r))
            .unwrap_or_else(|| "empty response".to_string());
        return Err(DepthError::ApiCall(reason));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "UNKNOWN".to_string());
        return Err(DepthError::ApiCall(format!("no text in response (finish reason: {})", reason)));
    }

    Ok(text)
}

fn describe_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(kind) => format!("{} {}: {}", status, kind, envelope.error.message),
            None => format!("{}: {}", status, envelope.error.message),
        },
        Err(_) => {
            let preview: String = body.chars().take(200).collect();
            format!("{}: {}", status, preview)
        }
    }
}
