//! Error taxonomy for the safety pipeline.
//!
//! Every upstream failure is tagged with the reason it happened so callers can decide whether to
//! degrade a single name or report a failed aggregation.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SafetyError {
    #[error("drug name could not be resolved: {0}")]
    Unresolved(String),
    #[error("upstream service has no data for this request")]
    NoDataUpstream,
    #[error("upstream transport failure: {0}")]
    Transport(String),
    #[error("malformed upstream response: {0}")]
    Malformed(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl SafetyError {
    /// True for failures caused by the upstream service rather than by the request itself.
    ///
    /// `NoDataUpstream` is a valid empty answer, not a failure.
    pub fn is_upstream(&self) -> bool {
        matches!(self, SafetyError::Transport(_) | SafetyError::Malformed(_))
    }
}

impl From<reqwest::Error> for SafetyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SafetyError::Malformed(err.to_string())
        } else if err.is_timeout() {
            SafetyError::Transport(format!("request timed out: {err}"))
        } else {
            SafetyError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SafetyError {
    fn from(err: serde_json::Error) -> Self {
        SafetyError::Malformed(err.to_string())
    }
}

impl From<medsafe_types::TextError> for SafetyError {
    fn from(err: medsafe_types::TextError) -> Self {
        SafetyError::InvalidInput(err.to_string())
    }
}

pub type SafetyResult<T> = std::result::Result<T, SafetyError>;
