use thiserror::Error;

pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// Failure of a call to the generation service. Always recovered at the
/// call site; never allowed to reach draft or registry state.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generation service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Generation service returned no content")]
    EmptyResponse,

    #[error("Malformed generation response: {0}")]
    Malformed(String),

    #[error("No image was generated")]
    NoImage,

    #[error("Generation service unavailable: {0}")]
    Unavailable(String),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl CollaboratorError {
    /// True when retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            CollaboratorError::Http(e) => e.is_timeout() || e.is_connect(),
            CollaboratorError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Neutral message shown to users; details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            CollaboratorError::NoImage => "We couldn't generate an image right now. Please try again.",
            _ => "We couldn't process that request right now. Please try again.",
        }
    }
}

impl From<serde_json::Error> for CollaboratorError {
    fn from(e: serde_json::Error) -> Self {
        CollaboratorError::Malformed(e.to_string())
    }
}
