//! HTTP client for the Gemini `generateContent` REST endpoint.

use crate::collaborator::GenerationCollaborator;
use crate::error::{CollaboratorError, CollaboratorResult};
use crate::normalize;
use crate::prompts;
use crate::types::{
    AdImageRequest, CompanyOverviewRequest, CreativeCopy, CreativeCopyRequest, InsightReport,
    TargetingRequest, TargetingTextRequest,
};
use adpilot_core::config::GenAiConfig;
use adpilot_core::types::{CampaignMetrics, CompanyOverview, TargetingCriteria};
use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Maximum number of response body characters kept in a `Status` error.
const MAX_ERROR_BODY_CHARS: usize = 512;
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    text_model: String,
    image_model: String,
    max_retries: u32,
    retry_delay: Duration,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: Option<String>,
    data: String,
}

impl GenerateResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter())
            .into_iter()
            .flatten()
    }

    fn text(&self) -> String {
        self.parts()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

impl GeminiClient {
    pub fn new(config: &GenAiConfig) -> CollaboratorResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| CollaboratorError::Unavailable("no API key configured".to_string()))?;

        // Validate the base URL up front rather than on the first request.
        Url::parse(&config.base_url)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    fn endpoint(&self, model: &str) -> CollaboratorResult<Url> {
        let mut url = Url::parse(&format!(
            "{}/models/{}:generateContent",
            self.base_url, model
        ))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn generate(&self, model: &str, body: &Value) -> CollaboratorResult<GenerateResponse> {
        let url = self.endpoint(model)?;
        let mut attempt = 0;

        loop {
            match self.send_once(url.clone(), body).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let delay = self.backoff_delay(attempt);
                    warn!(model, attempt, error = %e, delay_ms = delay.as_millis() as u64, "retrying generation request");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Exponential backoff, capped at [`MAX_RETRY_DELAY`].
    fn backoff_delay(&self, attempt: u32) -> Duration {
        self.retry_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(MAX_RETRY_DELAY)
    }

    async fn send_once(&self, url: Url, body: &Value) -> CollaboratorResult<GenerateResponse> {
        let response = self.http.post(url).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::Status {
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn generate_json(&self, prompt: String, schema: Value) -> CollaboratorResult<Value> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema
            }
        });
        let response = self.generate(&self.text_model, &body).await?;
        normalize::parse_json_object(&response.text())
    }

    async fn generate_text(&self, prompt: String) -> CollaboratorResult<String> {
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });
        let response = self.generate(&self.text_model, &body).await?;
        Ok(response.text())
    }
}

#[async_trait]
impl GenerationCollaborator for GeminiClient {
    async fn company_overview(
        &self,
        request: &CompanyOverviewRequest,
    ) -> CollaboratorResult<CompanyOverview> {
        let raw = self
            .generate_json(
                prompts::company_overview(request),
                prompts::company_overview_schema(),
            )
            .await?;
        Ok(normalize::company_overview(&raw, request))
    }

    async fn targeting_from_business_info(
        &self,
        request: &TargetingRequest,
    ) -> CollaboratorResult<TargetingCriteria> {
        let raw = self
            .generate_json(
                prompts::targeting_from_business_info(request),
                prompts::targeting_schema(),
            )
            .await?;
        Ok(normalize::targeting(&raw))
    }

    async fn targeting_from_text(
        &self,
        request: &TargetingTextRequest,
    ) -> CollaboratorResult<TargetingCriteria> {
        let raw = self
            .generate_json(
                prompts::targeting_from_text(request),
                prompts::targeting_schema(),
            )
            .await?;
        Ok(normalize::targeting(&raw))
    }

    async fn creative_copy(&self, request: &CreativeCopyRequest) -> CollaboratorResult<CreativeCopy> {
        let raw = self
            .generate_json(
                prompts::creative_copy(request),
                prompts::creative_copy_schema(),
            )
            .await?;
        Ok(normalize::creative_copy(&raw))
    }

    async fn ad_image(&self, request: &AdImageRequest) -> CollaboratorResult<String> {
        // Image models reject a response MIME type, so no generationConfig here.
        let body = json!({ "contents": [{ "parts": [{ "text": prompts::ad_image(request) }] }] });
        let response = self.generate(&self.image_model, &body).await?;

        let inline = response
            .parts()
            .find_map(|p| p.inline_data.as_ref())
            .ok_or(CollaboratorError::NoImage)?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(inline.data.trim())
            .map_err(|e| CollaboratorError::Malformed(format!("image data is not base64: {e}")))?;
        if bytes.is_empty() {
            return Err(CollaboratorError::NoImage);
        }

        let mime = inline.mime_type.as_deref().unwrap_or("image/png");
        debug!(mime, size = bytes.len(), "ad image generated");
        Ok(format!("data:{};base64,{}", mime, inline.data.trim()))
    }

    async fn insights(&self, metrics: &CampaignMetrics) -> CollaboratorResult<InsightReport> {
        let raw = self
            .generate_json(prompts::insights(metrics), prompts::insights_schema())
            .await?;
        Ok(normalize::insight_report(&raw))
    }

    async fn custom_insight(
        &self,
        metrics: &CampaignMetrics,
        question: &str,
    ) -> CollaboratorResult<String> {
        let text = self
            .generate_text(prompts::custom_insight(metrics, question))
            .await?;
        Ok(normalize::custom_answer(&text))
    }
}
