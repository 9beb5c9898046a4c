use crate::types::{CampaignStatus, Channel, Platform};
use thiserror::Error;

pub type AdPilotResult<T> = Result<T, AdPilotError>;

#[derive(Error, Debug)]
pub enum AdPilotError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Campaign {0} already exists")]
    DuplicateId(String),

    #[error("Campaign {0} not found")]
    NotFound(String),

    #[error("Hard cap reached for campaign {id}: spend {spend:.2} >= cap {hard_cap:.2}")]
    CapViolation {
        id: String,
        spend: f64,
        hard_cap: f64,
    },

    #[error("Invalid status transition: cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        from: CampaignStatus,
        to: CampaignStatus,
    },

    #[error("Platform {platform:?} is not available on channel {channel:?}")]
    InvalidPlatform { channel: Channel, platform: Platform },

    #[error("Wizard step {0} is out of range")]
    InvalidStep(usize),
}

impl AdPilotError {
    /// Stable machine-readable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AdPilotError::Config(_) => "config_error",
            AdPilotError::Validation(_) => "validation_error",
            AdPilotError::DuplicateId(_) => "duplicate_id",
            AdPilotError::NotFound(_) => "not_found",
            AdPilotError::CapViolation { .. } => "cap_violation",
            AdPilotError::InvalidTransition { .. } => "invalid_transition",
            AdPilotError::InvalidPlatform { .. } => "invalid_platform",
            AdPilotError::InvalidStep(_) => "invalid_step",
        }
    }
}
