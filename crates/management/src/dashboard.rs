//! Dashboard navigation state and per-campaign derived statistics.

use crate::policy;
use crate::registry::CampaignRegistry;
use adpilot_core::types::{Campaign, CampaignStatus};
use adpilot_core::{AdPilotError, AdPilotResult};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DashboardView {
    #[default]
    List,
    Details,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSession {
    view: DashboardView,
    selected: Option<String>,
}

impl DashboardSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> DashboardView {
        self.view
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Open the details view for a campaign.
    pub fn select(&mut self, registry: &CampaignRegistry, id: &str) -> AdPilotResult<()> {
        if registry.find_by_id(id).is_none() {
            return Err(AdPilotError::NotFound(id.to_string()));
        }
        self.selected = Some(id.to_string());
        self.view = DashboardView::Details;
        Ok(())
    }

    pub fn back(&mut self) {
        self.view = DashboardView::List;
    }

    /// Drop the selection if it pointed at a deleted campaign.
    pub fn on_deleted(&mut self, id: &str) {
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
            self.view = DashboardView::List;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Selected campaign, falling back to the newest one.
    pub fn focused<'a>(&self, registry: &'a CampaignRegistry) -> Option<&'a Campaign> {
        self.selected
            .as_deref()
            .and_then(|id| registry.find_by_id(id))
            .or_else(|| registry.newest())
    }
}

/// Figures shown alongside a campaign on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
    pub id: String,
    pub name: String,
    pub display_status: CampaignStatus,
    pub days_remaining: u32,
    /// Spend as a percentage of the hard cap, capped at 100.
    pub spend_percent_of_cap: f64,
    pub remaining_budget: f64,
    pub conversion_rate: f64,
    pub cost_per_click: f64,
    pub cost_per_conversion: f64,
    pub click_through_rate: f64,
    pub estimated_total_spend: f64,
}

impl CampaignSummary {
    pub fn compute(campaign: &Campaign, now: DateTime<Utc>) -> Self {
        let m = &campaign.metrics;
        let b = &campaign.budget;

        let spend_percent_of_cap = if b.hard_cap > 0.0 {
            (m.spend / b.hard_cap * 100.0).min(100.0)
        } else {
            100.0
        };
        let ratio = |num: f64, den: u64| if den > 0 { num / den as f64 } else { 0.0 };

        Self {
            id: campaign.id.clone(),
            name: campaign.name.clone(),
            display_status: policy::display_status(campaign, now),
            days_remaining: policy::days_remaining(campaign.start_date, b.duration, now),
            spend_percent_of_cap,
            remaining_budget: (b.hard_cap - m.spend).max(0.0),
            conversion_rate: ratio(m.conversions as f64 * 100.0, m.clicks),
            cost_per_click: ratio(m.spend, m.clicks),
            cost_per_conversion: ratio(m.spend, m.conversions),
            click_through_rate: ratio(m.clicks as f64 * 100.0, m.impressions),
            estimated_total_spend: b.estimated_total_spend(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adpilot_core::types::CampaignMetrics;
    use chrono::Duration;

    fn registry() -> CampaignRegistry {
        CampaignRegistry::with_demo(Utc::now())
    }

    #[test]
    fn test_select_and_back() {
        let registry = registry();
        let mut session = DashboardSession::new();
        session.select(&registry, "demo-456").unwrap();
        assert_eq!(session.view(), DashboardView::Details);
        assert_eq!(session.selected(), Some("demo-456"));

        session.back();
        assert_eq!(session.view(), DashboardView::List);
        assert_eq!(session.selected(), Some("demo-456"));
    }

    #[test]
    fn test_select_unknown_is_not_found() {
        let registry = registry();
        let mut session = DashboardSession::new();
        assert!(matches!(
            session.select(&registry, "ghost"),
            Err(AdPilotError::NotFound(_))
        ));
        assert_eq!(session, DashboardSession::new());
    }

    #[test]
    fn test_deleting_selected_returns_to_list() {
        let mut registry = registry();
        let mut session = DashboardSession::new();
        session.select(&registry, "demo-456").unwrap();

        session.on_deleted("demo-123");
        assert_eq!(session.selected(), Some("demo-456"));

        registry.delete("demo-456").unwrap();
        session.on_deleted("demo-456");
        assert_eq!(session.selected(), None);
        assert_eq!(session.view(), DashboardView::List);
    }

    #[test]
    fn test_focus_falls_back_to_newest() {
        let registry = registry();
        let mut session = DashboardSession::new();
        assert_eq!(session.focused(&registry).map(|c| c.id.as_str()), Some("demo-123"));
        session.select(&registry, "demo-789").unwrap();
        assert_eq!(session.focused(&registry).map(|c| c.id.as_str()), Some("demo-789"));
        assert!(session.focused(&CampaignRegistry::new()).is_none());
    }

    #[test]
    fn test_summary_figures() {
        let now = Utc::now();
        let registry = CampaignRegistry::with_demo(now);
        let campaign = registry.find_by_id("demo-123").unwrap();
        let summary = CampaignSummary::compute(campaign, now);

        assert!((summary.spend_percent_of_cap - 51.0).abs() < 1e-9);
        assert_eq!(summary.remaining_budget, 980.0);
        assert!((summary.conversion_rate - 85.0 / 1200.0 * 100.0).abs() < 1e-9);
        assert!((summary.cost_per_click - 0.85).abs() < 1e-9);
        assert!((summary.cost_per_conversion - 12.0).abs() < 1e-9);
        assert_eq!(summary.estimated_total_spend, 3000.0);
        assert_eq!(summary.days_remaining, 16);
        assert_eq!(summary.display_status, CampaignStatus::Active);
    }

    #[test]
    fn test_summary_handles_zero_denominators() {
        let mut campaign = Campaign::draft_template();
        campaign.budget.hard_cap = 0.0;
        campaign.metrics = CampaignMetrics::default();
        campaign.start_date = Utc::now() - Duration::days(1);
        let summary = CampaignSummary::compute(&campaign, Utc::now());
        assert_eq!(summary.cost_per_click, 0.0);
        assert_eq!(summary.cost_per_conversion, 0.0);
        assert_eq!(summary.conversion_rate, 0.0);
        assert_eq!(summary.spend_percent_of_cap, 100.0);
    }
}
