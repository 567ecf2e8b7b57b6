use shared::error::ErrorCategory;
use thiserror::Error;

pub const GENERATION_TRANSPORT_MESSAGE: &str = "Error generating Rust code.";
pub const UPLOAD_TRANSPORT_MESSAGE: &str = "Error uploading file.";
pub const REFRESH_TRANSPORT_MESSAGE: &str = "Error refreshing smart contracts.";
pub const MISSING_CONTRACT_NAME_MESSAGE: &str = "Please provide a contract name.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StudioError {
    /// Network or decoding failure with no structured payload. The cause is
    /// logged where it happens and never carried to the display.
    #[error("transport failure")]
    Transport,
    #[error("{0}")]
    ServiceReported(String),
    #[error("{0}")]
    Validation(String),
    #[error("index {index} is out of range for a list of {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("list must keep at least {minimum} entries")]
    BelowMinimum { minimum: usize },
    #[error("failed to read {file_name}: {reason}")]
    Read { file_name: String, reason: String },
}

impl StudioError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            StudioError::Transport => ErrorCategory::Transport,
            StudioError::ServiceReported(_) => ErrorCategory::ServiceReported,
            StudioError::Validation(_) | StudioError::BelowMinimum { .. } => {
                ErrorCategory::Validation
            }
            StudioError::IndexOutOfRange { .. } => ErrorCategory::IndexOutOfRange,
            StudioError::Read { .. } => ErrorCategory::Read,
        }
    }

    /// Text shown to the user. Transport failures collapse to `generic`;
    /// service messages pass through verbatim.
    pub fn display_message(&self, generic: &str) -> String {
        match self {
            StudioError::Transport => generic.to_string(),
            StudioError::ServiceReported(message) | StudioError::Validation(message) => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}
