//! Campaign status lifecycle and the hard-cap budget lock.
//!
//! Allowed explicit transitions:
//!
//! ```text
//! Draft ──> Active <──> Paused
//!             ^           ^
//!             └─ CapReached ┘   (only once spend < hard cap)
//! ```
//!
//! `CapReached` itself is never requested; it is entered and left by
//! [`reconcile`] whenever spend or the cap changes.

use adpilot_core::types::{Campaign, CampaignStatus};
use adpilot_core::{AdPilotError, AdPilotResult};
use chrono::{DateTime, Utc};

const MS_PER_DAY: i64 = 86_400_000;

/// Check an explicit status request. Returns the status to store.
pub fn validate_transition(campaign: &Campaign, to: CampaignStatus) -> AdPilotResult<CampaignStatus> {
    let from = campaign.status;
    if from == to {
        return Ok(to);
    }

    if matches!(to, CampaignStatus::Active | CampaignStatus::Paused) && campaign.cap_exceeded() {
        return Err(AdPilotError::CapViolation {
            id: campaign.id.clone(),
            spend: campaign.metrics.spend,
            hard_cap: campaign.budget.hard_cap,
        });
    }

    let allowed = matches!(
        (from, to),
        (CampaignStatus::Draft, CampaignStatus::Active)
            | (CampaignStatus::Active, CampaignStatus::Paused)
            | (CampaignStatus::Paused, CampaignStatus::Active)
            | (CampaignStatus::CapReached, CampaignStatus::Active)
            | (CampaignStatus::CapReached, CampaignStatus::Paused)
    );

    if allowed {
        Ok(to)
    } else {
        Err(AdPilotError::InvalidTransition { from, to })
    }
}

/// Enforce the hard cap after spend or the cap changed.
///
/// Spend at or above the cap locks the campaign in `CapReached`. A locked
/// campaign whose cap was raised (or spend reset) is re-armed to `Paused`;
/// resuming it stays a manual decision. Returns `(from, to)` on change.
pub fn reconcile(campaign: &mut Campaign) -> Option<(CampaignStatus, CampaignStatus)> {
    let from = campaign.status;
    let to = match (campaign.cap_exceeded(), from) {
        (true, CampaignStatus::CapReached) => return None,
        (true, _) => CampaignStatus::CapReached,
        (false, CampaignStatus::CapReached) => CampaignStatus::Paused,
        (false, _) => return None,
    };
    campaign.status = to;
    Some((from, to))
}

/// Whole days left in the flight, counting a started day as used.
pub fn days_remaining(start: DateTime<Utc>, duration: u32, now: DateTime<Utc>) -> u32 {
    let elapsed_ms = (now - start).num_milliseconds().abs();
    let elapsed_days = (elapsed_ms + MS_PER_DAY - 1) / MS_PER_DAY;
    (i64::from(duration) - elapsed_days).max(0) as u32
}

/// Status as shown to the user: a running or paused campaign whose flight
/// has ended reads as `Completed`.
pub fn display_status(campaign: &Campaign, now: DateTime<Utc>) -> CampaignStatus {
    let finished = days_remaining(campaign.start_date, campaign.budget.duration, now) == 0;
    match campaign.status {
        CampaignStatus::Active | CampaignStatus::Paused if finished => CampaignStatus::Completed,
        status => status,
    }
}
