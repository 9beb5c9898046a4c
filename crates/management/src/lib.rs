//! Campaign management backend: registry, hard-cap policy, dashboard and the REST API.
//!
//! Campaigns live in memory for the lifetime of the process.

pub mod dashboard;
pub mod demo;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod registry;
pub mod router;

pub use dashboard::{CampaignSummary, DashboardSession, DashboardView};
pub use handlers::ManagementState;
pub use registry::CampaignRegistry;
pub use router::management_router;
