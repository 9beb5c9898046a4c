//! Management API router. Mounts the wizard, campaign and dashboard endpoints under /api/v1.

use crate::handlers::{self, ManagementState};
use axum::routing::{get, patch, post, put};
use axum::Router;

/// Build the management router. Merge it into the main app.
pub fn management_router(state: ManagementState) -> Router {
    Router::new()
        // Wizard
        .route("/api/v1/wizard", get(handlers::get_wizard))
        .route("/api/v1/wizard/draft", patch(handlers::update_draft))
        .route("/api/v1/wizard/budget", patch(handlers::update_budget_input))
        .route("/api/v1/wizard/advance", post(handlers::advance_wizard))
        .route("/api/v1/wizard/retreat", post(handlers::retreat_wizard))
        .route("/api/v1/wizard/reset", post(handlers::reset_wizard))
        .route("/api/v1/wizard/generate", post(handlers::generate))
        // Campaigns
        .route("/api/v1/campaigns", get(handlers::list_campaigns))
        .route(
            "/api/v1/campaigns/:id",
            get(handlers::get_campaign).delete(handlers::delete_campaign),
        )
        .route("/api/v1/campaigns/:id/status", put(handlers::update_status))
        .route("/api/v1/campaigns/:id/budget", put(handlers::update_budget))
        .route("/api/v1/campaigns/:id/metrics", put(handlers::update_metrics))
        .route("/api/v1/campaigns/:id/spend", post(handlers::record_spend))
        .route("/api/v1/campaigns/:id/summary", get(handlers::campaign_summary))
        .route("/api/v1/campaigns/:id/insights", post(handlers::campaign_insights))
        .route("/api/v1/campaigns/:id/ask", post(handlers::ask_campaign))
        // Dashboard
        .route("/api/v1/dashboard", get(handlers::get_dashboard))
        .route("/api/v1/dashboard/select/:id", post(handlers::select_campaign))
        .route("/api/v1/dashboard/back", post(handlers::dashboard_back))
        .route("/api/v1/demo/reset", post(handlers::reset_demo))
        .with_state(state)
}
