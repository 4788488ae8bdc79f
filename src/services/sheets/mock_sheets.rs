use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::submission::FormSubmission;
use crate::services::sheets::{SheetsError, SheetsSink};

/// Recording sink for tests.
#[derive(Debug, Default)]
pub struct MockSheetsSink {
    pub appended: Mutex<Vec<FormSubmission>>,
    pub fail_append: Option<String>,
}

impl MockSheetsSink {
    pub fn failing(detail: &str) -> Self {
        Self {
            fail_append: Some(detail.to_string()),
            ..Self::default()
        }
    }

    pub fn appended_count(&self) -> usize {
        self.appended.lock().unwrap().len()
    }
}

#[async_trait]
impl SheetsSink for MockSheetsSink {
    async fn append_submission(&self, submission: &FormSubmission) -> Result<(), SheetsError> {
        if let Some(detail) = &self.fail_append {
            return Err(SheetsError::Transport(detail.clone()));
        }
        self.appended.lock().unwrap().push(submission.clone());
        Ok(())
    }
}
