//! Axum REST handlers for the management API.

use crate::dashboard::{CampaignSummary, DashboardSession};
use crate::models::*;
use crate::registry::CampaignRegistry;
use adpilot_core::config::WizardConfig;
use adpilot_core::types::{BudgetConfig, Campaign, CampaignMetrics};
use adpilot_core::AdPilotError;
use adpilot_genai::{CollaboratorError, GenerationCollaborator, InsightReport};
use adpilot_wizard::{Advance, BudgetInput, FieldUpdate, WizardSession, WizardSnapshot};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared management state.
#[derive(Clone)]
pub struct ManagementState {
    pub wizard: WizardSession,
    pub registry: Arc<RwLock<CampaignRegistry>>,
    pub dashboard: Arc<Mutex<DashboardSession>>,
    pub collaborator: Arc<dyn GenerationCollaborator>,
}

impl ManagementState {
    pub fn new(collaborator: Arc<dyn GenerationCollaborator>, config: &WizardConfig) -> Self {
        let registry = if config.seed_demo_data {
            CampaignRegistry::with_demo(Utc::now())
        } else {
            CampaignRegistry::new()
        };
        Self {
            wizard: WizardSession::new(Arc::clone(&collaborator), config.auto_populate),
            registry: Arc::new(RwLock::new(registry)),
            dashboard: Arc::new(Mutex::new(DashboardSession::new())),
            collaborator,
        }
    }
}

// ─── Errors ────────────────────────────────────────────────────────────────

/// Error body plus status code returned by every handler.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl From<AdPilotError> for ApiError {
    fn from(e: AdPilotError) -> Self {
        let status = match &e {
            AdPilotError::Validation(_)
            | AdPilotError::InvalidPlatform { .. }
            | AdPilotError::InvalidStep(_) => StatusCode::BAD_REQUEST,
            AdPilotError::NotFound(_) => StatusCode::NOT_FOUND,
            AdPilotError::DuplicateId(_)
            | AdPilotError::InvalidTransition { .. }
            | AdPilotError::CapViolation { .. } => StatusCode::CONFLICT,
            AdPilotError::Config(_) => {
                error!(error = %e, "configuration error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            body: ErrorResponse {
                error: e.code().to_string(),
                message: e.to_string(),
            },
        }
    }
}

impl From<CollaboratorError> for ApiError {
    fn from(e: CollaboratorError) -> Self {
        warn!(error = %e, "collaborator call failed");
        metrics::counter!("management.collaborator.errors").increment(1);
        Self {
            status: StatusCode::BAD_GATEWAY,
            body: ErrorResponse {
                error: "collaborator_error".to_string(),
                message: e.user_message().to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

// ─── Wizard ────────────────────────────────────────────────────────────────

pub async fn get_wizard(State(state): State<ManagementState>) -> Json<WizardSnapshot> {
    Json(state.wizard.snapshot())
}

pub async fn update_draft(
    State(state): State<ManagementState>,
    Json(update): Json<FieldUpdate>,
) -> ApiResult<Json<WizardSnapshot>> {
    state.wizard.update(update)?;
    Ok(Json(state.wizard.snapshot()))
}

pub async fn update_budget_input(
    State(state): State<ManagementState>,
    Json(input): Json<BudgetInput>,
) -> ApiResult<Json<WizardSnapshot>> {
    state.wizard.update_budget_text(&input)?;
    Ok(Json(state.wizard.snapshot()))
}

pub async fn advance_wizard(
    State(state): State<ManagementState>,
) -> ApiResult<(StatusCode, Json<AdvanceResponse>)> {
    match state.wizard.advance() {
        Advance::Moved(_) => Ok((
            StatusCode::OK,
            Json(AdvanceResponse {
                wizard: state.wizard.snapshot(),
                created: None,
            }),
        )),
        Advance::Finalized(campaign) => {
            let created = state.registry.write().insert(campaign)?;
            state.dashboard.lock().back();
            metrics::counter!("management.campaigns.created").increment(1);
            Ok((
                StatusCode::CREATED,
                Json(AdvanceResponse {
                    wizard: state.wizard.snapshot(),
                    created: Some(created),
                }),
            ))
        }
    }
}

pub async fn retreat_wizard(State(state): State<ManagementState>) -> Json<WizardSnapshot> {
    state.wizard.retreat();
    Json(state.wizard.snapshot())
}

pub async fn reset_wizard(State(state): State<ManagementState>) -> Json<WizardSnapshot> {
    state.wizard.reset();
    Json(state.wizard.snapshot())
}

pub async fn generate(
    State(state): State<ManagementState>,
    Json(req): Json<GenerateRequest>,
) -> ApiResult<(StatusCode, Json<WizardSnapshot>)> {
    state
        .wizard
        .request_generation(req.kind, req.text.as_deref())?;
    Ok((StatusCode::ACCEPTED, Json(state.wizard.snapshot())))
}

// ─── Campaigns ─────────────────────────────────────────────────────────────

pub async fn list_campaigns(State(state): State<ManagementState>) -> Json<Vec<Campaign>> {
    Json(state.registry.read().list())
}

fn find_campaign(state: &ManagementState, id: &str) -> Result<Campaign, AdPilotError> {
    state
        .registry
        .read()
        .find_by_id(id)
        .cloned()
        .ok_or_else(|| AdPilotError::NotFound(id.to_string()))
}

pub async fn get_campaign(
    State(state): State<ManagementState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Campaign>> {
    Ok(Json(find_campaign(&state, &id)?))
}

pub async fn delete_campaign(
    State(state): State<ManagementState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.registry.write().delete(&id)?;
    state.dashboard.lock().on_deleted(&id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_status(
    State(state): State<ManagementState>,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdateRequest>,
) -> ApiResult<Json<Campaign>> {
    let campaign = state.registry.write().update_status(&id, req.status)?;
    Ok(Json(campaign))
}

pub async fn update_budget(
    State(state): State<ManagementState>,
    Path(id): Path<String>,
    Json(budget): Json<BudgetConfig>,
) -> ApiResult<Json<Campaign>> {
    let campaign = state.registry.write().update_budget(&id, budget)?;
    Ok(Json(campaign))
}

pub async fn update_metrics(
    State(state): State<ManagementState>,
    Path(id): Path<String>,
    Json(metrics): Json<CampaignMetrics>,
) -> ApiResult<Json<Campaign>> {
    let campaign = state.registry.write().update_metrics(&id, metrics)?;
    Ok(Json(campaign))
}

pub async fn record_spend(
    State(state): State<ManagementState>,
    Path(id): Path<String>,
    Json(req): Json<SpendRequest>,
) -> ApiResult<Json<Campaign>> {
    let campaign = state
        .registry
        .write()
        .record_daily_spend(&id, req.day, req.amount)?;
    Ok(Json(campaign))
}

pub async fn campaign_summary(
    State(state): State<ManagementState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CampaignSummary>> {
    let campaign = find_campaign(&state, &id)?;
    Ok(Json(CampaignSummary::compute(&campaign, Utc::now())))
}

pub async fn campaign_insights(
    State(state): State<ManagementState>,
    Path(id): Path<String>,
) -> ApiResult<Json<InsightReport>> {
    let metrics = find_campaign(&state, &id)?.metrics;
    let report = state.collaborator.insights(&metrics).await?;
    info!(
        campaign_id = %id,
        insights = report.insights.len(),
        anomaly = report.anomaly.detected,
        "insights generated"
    );
    Ok(Json(report))
}

pub async fn ask_campaign(
    State(state): State<ManagementState>,
    Path(id): Path<String>,
    Json(req): Json<AskRequest>,
) -> ApiResult<Json<AskResponse>> {
    let question = req.question.trim();
    if question.is_empty() {
        return Err(AdPilotError::Validation("question must not be empty".to_string()).into());
    }
    let metrics = find_campaign(&state, &id)?.metrics;
    let answer = state.collaborator.custom_insight(&metrics, question).await?;
    Ok(Json(AskResponse { answer }))
}

// ─── Dashboard ─────────────────────────────────────────────────────────────

fn dashboard_response(state: &ManagementState) -> DashboardResponse {
    let now = Utc::now();
    let registry = state.registry.read();
    let session = state.dashboard.lock();
    DashboardResponse {
        view: session.view(),
        selected: session.selected().map(str::to_string),
        campaigns: registry
            .list()
            .iter()
            .map(|c| CampaignSummary::compute(c, now))
            .collect(),
        focused: session.focused(&registry).cloned(),
    }
}

pub async fn get_dashboard(State(state): State<ManagementState>) -> Json<DashboardResponse> {
    Json(dashboard_response(&state))
}

pub async fn select_campaign(
    State(state): State<ManagementState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DashboardResponse>> {
    {
        let registry = state.registry.read();
        state.dashboard.lock().select(&registry, &id)?;
    }
    Ok(Json(dashboard_response(&state)))
}

pub async fn dashboard_back(State(state): State<ManagementState>) -> Json<DashboardResponse> {
    state.dashboard.lock().back();
    Json(dashboard_response(&state))
}

pub async fn reset_demo(State(state): State<ManagementState>) -> Json<DashboardResponse> {
    state.registry.write().load_demo(Utc::now());
    state.dashboard.lock().clear();
    Json(dashboard_response(&state))
}
