//! Provider error types.
//!
//! Every failure a reconciler reports ends up as one error diagnostic. The
//! summary is a short, stable phrase (e.g. `Unable to create Baseline`); the
//! detail carries the OME message verbatim.

use crate::diagnostics::Diagnostic;
use ome_client::OmeError;
use thiserror::Error;

/// Errors that can occur while serving a provider call.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Local check on the desired state failed; nothing was sent to OME
    #[error("Validation error: {0}")]
    Validation(String),

    /// An OME operation or job failed
    #[error("{summary}: {detail}")]
    Failed { summary: String, detail: String },

    /// The host's cancellation signal fired
    #[error("Operation cancelled")]
    Cancelled,

    /// Provider configuration is incomplete or invalid
    #[error("Invalid provider configuration: {0}")]
    Config(String),

    /// A state document could not be decoded into the resource's state type
    #[error("Invalid state document: {0}")]
    Decode(#[from] serde_json::Error),

    /// No resource or data source is registered under this name
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// The resource does not implement the requested operation
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl ProviderError {
    /// Failure with a stable summary and an OME or provider supplied detail
    pub fn failed(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        ProviderError::Failed {
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            ProviderError::Validation(_) => "Validation error".to_string(),
            ProviderError::Failed { summary, .. } => summary.clone(),
            ProviderError::Cancelled => "Operation cancelled".to_string(),
            ProviderError::Config(_) => "Invalid provider configuration".to_string(),
            ProviderError::Decode(_) => "Invalid state document".to_string(),
            ProviderError::UnknownType(_) => "Unknown type".to_string(),
            ProviderError::Unsupported(_) => "Unsupported operation".to_string(),
        }
    }

    pub fn detail(&self) -> String {
        match self {
            ProviderError::Validation(d)
            | ProviderError::Config(d)
            | ProviderError::UnknownType(d)
            | ProviderError::Unsupported(d) => d.clone(),
            ProviderError::Failed { detail, .. } => detail.clone(),
            ProviderError::Cancelled => {
                "the host cancelled the call; jobs already started keep running on OME".to_string()
            }
            ProviderError::Decode(e) => e.to_string(),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.summary(), self.detail())
    }
}

/// Attach a provider summary to OME client failures.
pub trait ResultExt<T> {
    /// Map an `OmeError` to `ProviderError::Failed` with `summary`.
    /// Cancellation stays `ProviderError::Cancelled`.
    fn or_fail(self, summary: &str) -> Result<T, ProviderError>;
}

impl<T> ResultExt<T> for Result<T, OmeError> {
    fn or_fail(self, summary: &str) -> Result<T, ProviderError> {
        self.map_err(|e| match e {
            OmeError::Cancelled => ProviderError::Cancelled,
            other => ProviderError::failed(summary, other.detail()),
        })
    }
}
