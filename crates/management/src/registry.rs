//! In-memory registry of finalized campaigns.
//!
//! Campaigns are kept newest first, in insertion order. Every mutation goes
//! through a copy that is validated and reconciled against the hard cap
//! before it replaces the stored entry, so a failed operation leaves the
//! collection untouched.

use crate::demo;
use crate::policy;
use adpilot_core::types::{BudgetConfig, Campaign, CampaignMetrics, CampaignStatus};
use adpilot_core::{AdPilotError, AdPilotResult};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct CampaignRegistry {
    campaigns: Vec<Campaign>,
}

impl CampaignRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the demo campaigns.
    pub fn with_demo(now: DateTime<Utc>) -> Self {
        let mut registry = Self::new();
        registry.load_demo(now);
        registry
    }

    pub fn len(&self) -> usize {
        self.campaigns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }

    /// Snapshot in display order.
    pub fn list(&self) -> Vec<Campaign> {
        self.campaigns.clone()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Campaign> {
        self.campaigns.iter().find(|c| c.id == id)
    }

    pub fn newest(&self) -> Option<&Campaign> {
        self.campaigns.first()
    }

    fn position(&self, id: &str) -> AdPilotResult<usize> {
        self.campaigns
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| AdPilotError::NotFound(id.to_string()))
    }

    pub fn insert(&mut self, mut campaign: Campaign) -> AdPilotResult<Campaign> {
        if self.find_by_id(&campaign.id).is_some() {
            return Err(AdPilotError::DuplicateId(campaign.id));
        }
        if !campaign.metrics.is_aligned() {
            return Err(AdPilotError::Validation(format!(
                "campaign {} has {} dates but {} daily spend entries",
                campaign.id,
                campaign.metrics.dates.len(),
                campaign.metrics.daily_spend.len()
            )));
        }
        reconcile_logged(&mut campaign);

        info!(campaign_id = %campaign.id, status = ?campaign.status, "campaign registered");
        metrics::counter!("registry.campaigns.inserted").increment(1);
        self.campaigns.insert(0, campaign.clone());
        Ok(campaign)
    }

    pub fn update_status(&mut self, id: &str, status: CampaignStatus) -> AdPilotResult<Campaign> {
        self.modify(id, |campaign| {
            let from = campaign.status;
            campaign.status = policy::validate_transition(campaign, status)?;
            if from != campaign.status {
                info!(campaign_id = %campaign.id, ?from, to = ?campaign.status, "status changed");
            }
            Ok(())
        })
    }

    pub fn delete(&mut self, id: &str) -> AdPilotResult<Campaign> {
        let idx = self.position(id)?;
        let removed = self.campaigns.remove(idx);
        info!(campaign_id = %id, "campaign deleted");
        metrics::counter!("registry.campaigns.deleted").increment(1);
        Ok(removed)
    }

    /// Replace the metrics wholesale. `cpc` and `ctr` are recomputed.
    pub fn update_metrics(&mut self, id: &str, metrics: CampaignMetrics) -> AdPilotResult<Campaign> {
        validate_metrics(&metrics)?;
        self.modify(id, |campaign| {
            campaign.metrics = metrics;
            campaign.metrics.recompute_derived();
            Ok(())
        })
    }

    /// Append one day of spend.
    pub fn record_daily_spend(
        &mut self,
        id: &str,
        day: impl Into<String>,
        amount: f64,
    ) -> AdPilotResult<Campaign> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(AdPilotError::Validation(format!(
                "daily spend must be a non-negative amount, got {amount}"
            )));
        }
        let day = day.into();
        self.modify(id, |campaign| {
            campaign.metrics.record_daily_spend(day, amount);
            Ok(())
        })
    }

    pub fn update_budget(&mut self, id: &str, budget: BudgetConfig) -> AdPilotResult<Campaign> {
        self.modify(id, |campaign| {
            campaign.budget = budget.normalized();
            Ok(())
        })
    }

    /// Replace the collection with the demo campaigns.
    pub fn load_demo(&mut self, now: DateTime<Utc>) {
        self.campaigns = demo::demo_campaigns(now)
            .into_iter()
            .map(|mut c| {
                reconcile_logged(&mut c);
                c
            })
            .collect();
        info!(count = self.campaigns.len(), "demo campaigns loaded");
    }

    fn modify<F>(&mut self, id: &str, f: F) -> AdPilotResult<Campaign>
    where
        F: FnOnce(&mut Campaign) -> AdPilotResult<()>,
    {
        let idx = self.position(id)?;
        let mut next = self.campaigns[idx].clone();
        f(&mut next)?;
        reconcile_logged(&mut next);
        self.campaigns[idx] = next.clone();
        Ok(next)
    }
}

fn validate_metrics(metrics: &CampaignMetrics) -> AdPilotResult<()> {
    if !metrics.is_aligned() {
        return Err(AdPilotError::Validation(format!(
            "{} dates but {} daily spend entries",
            metrics.dates.len(),
            metrics.daily_spend.len()
        )));
    }
    if !metrics.spend.is_finite() || metrics.spend < 0.0 {
        return Err(AdPilotError::Validation(format!(
            "spend must be a non-negative amount, got {}",
            metrics.spend
        )));
    }
    Ok(())
}

fn reconcile_logged(campaign: &mut Campaign) {
    if let Some((from, to)) = policy::reconcile(campaign) {
        if to == CampaignStatus::CapReached {
            warn!(
                campaign_id = %campaign.id,
                spend = campaign.metrics.spend,
                hard_cap = campaign.budget.hard_cap,
                ?from,
                "hard cap reached, campaign stopped"
            );
            metrics::counter!("registry.cap_reached").increment(1);
        } else {
            info!(campaign_id = %campaign.id, ?from, ?to, "hard cap lifted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn campaign(id: &str, spend: f64, hard_cap: f64) -> Campaign {
        let mut c = Campaign::draft_template();
        c.id = id.to_string();
        c.status = CampaignStatus::Active;
        c.metrics.spend = spend;
        c.budget.hard_cap = hard_cap;
        c
    }

    #[test]
    fn test_insert_is_newest_first() {
        let mut registry = CampaignRegistry::new();
        registry.insert(campaign("a", 0.0, 500.0)).unwrap();
        registry.insert(campaign("b", 0.0, 500.0)).unwrap();
        let ids: Vec<String> = registry.list().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(registry.newest().map(|c| c.id.as_str()), Some("b"));
    }

    #[test]
    fn test_duplicate_insert_leaves_collection_unchanged() {
        let mut registry = CampaignRegistry::new();
        registry.insert(campaign("a", 0.0, 500.0)).unwrap();
        let before = registry.list();

        let mut dup = campaign("a", 10.0, 500.0);
        dup.name = "Other".to_string();
        assert!(matches!(
            registry.insert(dup),
            Err(AdPilotError::DuplicateId(id)) if id == "a"
        ));
        assert_eq!(registry.list(), before);
    }

    #[test]
    fn test_insert_over_cap_is_locked() {
        let mut registry = CampaignRegistry::new();
        let stored = registry.insert(campaign("a", 600.0, 500.0)).unwrap();
        assert_eq!(stored.status, CampaignStatus::CapReached);
    }

    #[test]
    fn test_spend_crossing_cap_locks_campaign() {
        let mut registry = CampaignRegistry::new();
        registry.insert(campaign("a", 480.0, 500.0)).unwrap();

        let updated = registry.record_daily_spend("a", "Mon", 40.0).unwrap();
        assert_eq!(updated.metrics.spend, 520.0);
        assert_eq!(updated.status, CampaignStatus::CapReached);

        let err = registry.update_status("a", CampaignStatus::Active).unwrap_err();
        assert!(matches!(err, AdPilotError::CapViolation { .. }));
        assert_eq!(
            registry.find_by_id("a").map(|c| c.status),
            Some(CampaignStatus::CapReached)
        );
    }

    #[test]
    fn test_raising_cap_rearms_to_paused() {
        let mut registry = CampaignRegistry::new();
        registry.insert(campaign("a", 520.0, 500.0)).unwrap();

        let updated = registry
            .update_budget(
                "a",
                BudgetConfig {
                    hard_cap: 1000.0,
                    ..BudgetConfig::default()
                },
            )
            .unwrap();
        assert_eq!(updated.status, CampaignStatus::Paused);

        let resumed = registry.update_status("a", CampaignStatus::Active).unwrap();
        assert_eq!(resumed.status, CampaignStatus::Active);
    }

    #[test]
    fn test_missing_ids_are_not_found() {
        let mut registry = CampaignRegistry::new();
        assert!(matches!(
            registry.delete("nope"),
            Err(AdPilotError::NotFound(_))
        ));
        assert!(matches!(
            registry.update_status("nope", CampaignStatus::Paused),
            Err(AdPilotError::NotFound(_))
        ));
        assert!(registry.find_by_id("nope").is_none());
    }

    #[test]
    fn test_misaligned_metrics_rejected() {
        let mut registry = CampaignRegistry::new();
        registry.insert(campaign("a", 0.0, 500.0)).unwrap();
        let metrics = CampaignMetrics {
            dates: vec!["Mon".to_string()],
            ..CampaignMetrics::default()
        };
        assert!(matches!(
            registry.update_metrics("a", metrics),
            Err(AdPilotError::Validation(_))
        ));
        assert!(registry.record_daily_spend("a", "Mon", -5.0).is_err());
    }

    #[test]
    fn test_status_change_keeps_position() {
        let mut registry = CampaignRegistry::new();
        registry.insert(campaign("a", 0.0, 500.0)).unwrap();
        registry.insert(campaign("b", 0.0, 500.0)).unwrap();
        registry.update_status("a", CampaignStatus::Paused).unwrap();
        let ids: Vec<String> = registry.list().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_demo_load_reconciles() {
        let registry = CampaignRegistry::with_demo(Utc::now());
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.find_by_id("demo-789").map(|c| c.status),
            Some(CampaignStatus::CapReached)
        );
        assert_eq!(
            registry.find_by_id("demo-123").map(|c| c.status),
            Some(CampaignStatus::Active)
        );
    }

    #[derive(Debug, Clone)]
    enum Op {
        Spend(f64),
        SetSpend(f64),
        Cap(f64),
        Status(CampaignStatus),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0.0f64..300.0).prop_map(Op::Spend),
            (0.0f64..1500.0).prop_map(Op::SetSpend),
            (-50.0f64..1500.0).prop_map(Op::Cap),
            prop::sample::select(vec![
                CampaignStatus::Draft,
                CampaignStatus::Active,
                CampaignStatus::Paused,
                CampaignStatus::Completed,
                CampaignStatus::CapReached,
            ])
            .prop_map(Op::Status),
        ]
    }

    proptest! {
        #[test]
        fn prop_hard_cap_invariant_holds(
            spend in 0.0f64..1000.0,
            cap in 0.0f64..1000.0,
            ops in prop::collection::vec(arb_op(), 0..40),
        ) {
            let mut registry = CampaignRegistry::new();
            registry.insert(campaign("p", spend, cap)).unwrap();

            for op in ops {
                let current = registry.find_by_id("p").cloned().unwrap();
                let _ = match op {
                    Op::Spend(amount) => registry.record_daily_spend("p", "day", amount),
                    Op::SetSpend(total) => registry.update_metrics("p", CampaignMetrics {
                        spend: total,
                        ..CampaignMetrics::default()
                    }),
                    Op::Cap(hard_cap) => registry.update_budget("p", BudgetConfig {
                        hard_cap,
                        ..current.budget.clone()
                    }),
                    Op::Status(status) => registry.update_status("p", status),
                };
                let c = registry.find_by_id("p").unwrap();
                prop_assert_eq!(
                    c.status == CampaignStatus::CapReached,
                    c.metrics.spend >= c.budget.hard_cap
                );
            }
        }
    }
}
