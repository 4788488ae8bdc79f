use async_trait::async_trait;
use thiserror::Error;

use crate::models::submission::FormSubmission;
use crate::services::google_auth::GoogleAuthError;

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("sheets sink is not configured: {0}")]
    Configuration(String),
    #[error("{0}")]
    Transport(String),
}

impl From<GoogleAuthError> for SheetsError {
    fn from(err: GoogleAuthError) -> Self {
        match err {
            GoogleAuthError::MissingConfiguration(key) => SheetsError::Configuration(key.into()),
            GoogleAuthError::InvalidKey(detail) => SheetsError::Configuration(detail),
            other => SheetsError::Transport(other.to_string()),
        }
    }
}

/// Best-effort side channel: append one row per submission to an external
/// tabular store. Independent of the email transports.
#[async_trait]
pub trait SheetsSink: Send + Sync {
    async fn append_submission(&self, submission: &FormSubmission) -> Result<(), SheetsError>;
}

mod google_sheets;
mod mock_sheets;

pub use google_sheets::GoogleSheetsSink;
#[allow(unused_imports)]
pub use mock_sheets::MockSheetsSink;
