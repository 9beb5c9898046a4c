//! The five-step campaign wizard: cascading draft edits, step navigation,
//! finalization and background population by the generation collaborator.

pub mod cascade;
pub mod controller;
pub mod population;
pub mod steps;

pub use cascade::{apply_field_update, CascadeTier, FieldName, FieldUpdate};
pub use controller::{Advance, GenerationTicket, WizardController, WizardSnapshot};
pub use population::WizardSession;
pub use steps::{BudgetInput, StepView, WizardStep};
