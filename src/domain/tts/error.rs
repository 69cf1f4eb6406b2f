use super::provider::{Provider, UnknownProvider};
use crate::error::AppError;

/// Failures surfaced by the synthesis façade and its repositories
#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    /// Missing or unusable provider credentials/configuration
    #[error("{0}")]
    NotConfigured(String),
    /// Caller input rejected before any network call
    #[error("{0}")]
    Invalid(String),
    /// Provider answered with a failure; the body is passed through verbatim
    #[error("{message}")]
    Provider {
        provider: Provider,
        status: u16,
        message: String,
    },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<UnknownProvider> for TtsServiceError {
    fn from(err: UnknownProvider) -> Self {
        TtsServiceError::Invalid(err.to_string())
    }
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        match err {
            TtsServiceError::NotConfigured(msg) => AppError::ServiceUnavailable(msg),
            TtsServiceError::Invalid(msg) => AppError::BadRequest(msg),
            TtsServiceError::Provider {
                status, message, ..
            } => AppError::Provider { status, message },
            TtsServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
