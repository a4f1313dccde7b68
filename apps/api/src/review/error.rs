use std::time::Duration;

use thiserror::Error;

use crate::llm_client::LlmError;

/// Failures of a single review. Missing fields in the model's reply are NOT errors;
/// they surface as `None` on `ReviewResult`.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("External service error: {0}")]
    ExternalService(#[source] LlmError),

    #[error("External service timed out after {after:?}")]
    Timeout { after: Duration },
}

impl From<LlmError> for ReviewError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Timeout { after } => ReviewError::Timeout { after },
            other => ReviewError::ExternalService(other),
        }
    }
}
