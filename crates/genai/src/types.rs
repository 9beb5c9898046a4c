//! Request/response contracts of the generation service.

use adpilot_core::types::{
    CampaignMetrics, CompanyOverview, CreativeAsset, FunnelStage, Industry, Platform,
    TargetingCriteria,
};
use serde::{Deserialize, Serialize};

// ─── Requests ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyOverviewRequest {
    pub business_name: String,
    pub website_url: String,
    pub industry: Industry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetingRequest {
    pub business_name: String,
    pub industry: Industry,
    pub website_url: String,
    pub platform: Platform,
}

/// Natural Language Targeting: free text in, structured targeting out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetingTextRequest {
    pub business_name: String,
    pub industry: Industry,
    pub free_text: String,
    pub platform: Platform,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeCopyRequest {
    pub business_name: String,
    pub industry: Industry,
    pub targeting: TargetingCriteria,
    pub platform: Platform,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdImageRequest {
    pub business_name: String,
    pub industry: Industry,
    pub platform: Platform,
    pub funnel_stage: FunnelStage,
    pub targeting: TargetingCriteria,
}

/// Any of the draft-populating calls, as captured from a draft snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GenerationRequest {
    CompanyOverview(CompanyOverviewRequest),
    TargetingFromBusinessInfo(TargetingRequest),
    TargetingFromText(TargetingTextRequest),
    CreativeCopy(CreativeCopyRequest),
    AdImage(AdImageRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GenerationKind {
    CompanyOverview,
    TargetingFromBusinessInfo,
    TargetingFromText,
    CreativeCopy,
    AdImage,
}

impl GenerationRequest {
    pub fn kind(&self) -> GenerationKind {
        match self {
            GenerationRequest::CompanyOverview(_) => GenerationKind::CompanyOverview,
            GenerationRequest::TargetingFromBusinessInfo(_) => {
                GenerationKind::TargetingFromBusinessInfo
            }
            GenerationRequest::TargetingFromText(_) => GenerationKind::TargetingFromText,
            GenerationRequest::CreativeCopy(_) => GenerationKind::CreativeCopy,
            GenerationRequest::AdImage(_) => GenerationKind::AdImage,
        }
    }
}

impl GenerationRequest {
    /// The free text a natural language targeting request was issued with.
    pub fn free_text(&self) -> Option<&str> {
        match self {
            GenerationRequest::TargetingFromText(req) => Some(&req.free_text),
            _ => None,
        }
    }
}

impl GenerationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationKind::CompanyOverview => "company_overview",
            GenerationKind::TargetingFromBusinessInfo => "targeting_from_business_info",
            GenerationKind::TargetingFromText => "targeting_from_text",
            GenerationKind::CreativeCopy => "creative_copy",
            GenerationKind::AdImage => "ad_image",
        }
    }
}

// ─── Responses ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeCopy {
    pub headline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline_part2: Option<String>,
    pub description: String,
    pub cta_text: String,
}

impl CreativeCopy {
    /// Overlay generated copy onto an existing creative; styling fields are kept.
    pub fn merge_into(self, creative: &CreativeAsset) -> CreativeAsset {
        CreativeAsset {
            headline: self.headline,
            headline_part2: self.headline_part2,
            description: self.description,
            cta_text: self.cta_text,
            ..creative.clone()
        }
        .normalized()
    }
}

/// Result of a draft-populating call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum GeneratedContent {
    CompanyOverview(CompanyOverview),
    Targeting(TargetingCriteria),
    CreativeCopy(CreativeCopy),
    /// `data:` URI of the generated image.
    AdImage(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Success,
    Warning,
    Danger,
    #[default]
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: InsightKind,
    /// Plain English message.
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    pub detected: bool,
    pub description: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    pub insights: Vec<Insight>,
    pub anomaly: Anomaly,
}

/// One-line text summary of the counters, shared by the insight prompts.
pub fn metrics_summary(metrics: &CampaignMetrics) -> String {
    format!(
        "Impressions: {}\nClicks: {}\nCTR: {:.2}%\nSpend: ${:.2}\nConversions: {}",
        metrics.impressions, metrics.clicks, metrics.ctr, metrics.spend, metrics.conversions
    )
}
