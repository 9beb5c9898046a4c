//! Generative AI collaborator: company overviews, targeting, ad copy, ad
//! images and performance insights.

pub mod collaborator;
pub mod error;
pub mod gemini;
pub mod normalize;
pub mod offline;
pub mod prompts;
pub mod types;

pub use collaborator::{dispatch, GenerationCollaborator};
pub use error::{CollaboratorError, CollaboratorResult};
pub use gemini::GeminiClient;
pub use offline::OfflineCollaborator;
pub use types::*;
