//! Request and response bodies of the management API.

use crate::dashboard::{CampaignSummary, DashboardView};
use adpilot_core::types::{Campaign, CampaignStatus};
use adpilot_genai::GenerationKind;
use adpilot_wizard::WizardSnapshot;
use serde::{Deserialize, Serialize};

// ─── Wizard ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub kind: GenerationKind,
    /// Free text for natural language targeting.
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceResponse {
    pub wizard: WizardSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<Campaign>,
}

// ─── Campaigns ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: CampaignStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpendRequest {
    pub day: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

// ─── Dashboard ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub view: DashboardView,
    pub selected: Option<String>,
    pub campaigns: Vec<CampaignSummary>,
    /// The selected campaign, or the newest when nothing is selected.
    pub focused: Option<Campaign>,
}

// ─── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
