use std::sync::Arc;

use crate::config::Config;
use crate::services::mailer::Mailer;
use crate::services::sheets::SheetsSink;

#[derive(Clone)]
pub struct AppState {
    pub mailer: Arc<dyn Mailer>,
    /// Absent when no spreadsheet is configured; the coordinator then runs
    /// the email transport alone.
    pub sheets: Option<Arc<dyn SheetsSink>>,
    pub config: Arc<Config>,
}
