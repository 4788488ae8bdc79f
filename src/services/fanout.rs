use serde::Serialize;
use thiserror::Error;

use crate::config::Config;
use crate::models::submission::FormSubmission;
use crate::services::mailer::{MailError, Mailer, OutgoingEmail};
use crate::services::sheets::{SheetsError, SheetsSink};
use crate::services::template;

/// Outcome of one sink attempt, kept in the response payload for
/// diagnostics whether or not the overall dispatch succeeded.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SinkOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SinkOutcome {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn failed(detail: String) -> Self {
        Self {
            success: false,
            error: Some(detail),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReport {
    pub message: String,
    pub email_id: Option<String>,
    pub email: SinkOutcome,
    pub sheets: Option<SinkOutcome>,
}

/// Every attempted sink failed; the detail concatenates each sub-failure.
#[derive(Debug, Error)]
#[error("{detail}")]
pub struct AllSinksFailed {
    pub detail: String,
}

/// Fans one validated submission out to the email transport and, when
/// configured, the sheets sink. The two attempts run concurrently and are
/// judged independently: the dispatch succeeds as long as at least one sink
/// accepted the submission. The form must not look broken to the visitor
/// just because a single downstream integration is down.
pub async fn dispatch(
    mailer: &dyn Mailer,
    sheets: Option<&dyn SheetsSink>,
    config: &Config,
    submission: &FormSubmission,
) -> Result<SubmissionReport, AllSinksFailed> {
    let outgoing = OutgoingEmail {
        from_name: config.site_name.clone(),
        to: config.owner_email.clone(),
        reply_to: submission.email.clone(),
        subject: format!(
            "New Form Submission from {} - {}",
            submission.name, config.site_name
        ),
        html_body: template::render_submission_email(submission),
    };

    let Some(sink) = sheets else {
        return match mailer.send_form_notification(&outgoing).await {
            Ok(receipt) => {
                tracing::info!(email_id = ?receipt.message_id, "form submission email sent");
                Ok(SubmissionReport {
                    message: "Form submission email sent successfully".into(),
                    email_id: receipt.message_id,
                    email: SinkOutcome::ok(),
                    sheets: None,
                })
            }
            Err(err) => Err(AllSinksFailed {
                detail: mail_failure(err),
            }),
        };
    };

    let (email_result, sheets_result) = tokio::join!(
        mailer.send_form_notification(&outgoing),
        sink.append_submission(submission)
    );

    let (email_outcome, email_id) = match email_result {
        Ok(receipt) => (SinkOutcome::ok(), receipt.message_id),
        Err(err) => (SinkOutcome::failed(mail_failure(err)), None),
    };
    let sheets_outcome = match sheets_result {
        Ok(()) => SinkOutcome::ok(),
        Err(err) => SinkOutcome::failed(sheets_failure(err)),
    };

    if email_outcome.success || sheets_outcome.success {
        let message = format!(
            "Form saved{}{}",
            if sheets_outcome.success { " to sheets" } else { "" },
            if email_outcome.success { " and email sent" } else { "" },
        );
        tracing::info!(%message, "form submission dispatched");
        Ok(SubmissionReport {
            message,
            email_id,
            email: email_outcome,
            sheets: Some(sheets_outcome),
        })
    } else {
        Err(AllSinksFailed {
            detail: format!(
                "Both submissions failed - Sheets: {}, Email: {}",
                sheets_outcome.error.unwrap_or_default(),
                email_outcome.error.unwrap_or_default(),
            ),
        })
    }
}

/// Configuration failures are logged with detail but surface generically so
/// nothing about credentials reaches the caller.
fn mail_failure(err: MailError) -> String {
    match err {
        MailError::Configuration(detail) => {
            tracing::error!(%detail, "email transport is not configured");
            "Email service is not configured".into()
        }
        other => {
            tracing::error!(error = %other, "email send failed");
            other.to_string()
        }
    }
}

fn sheets_failure(err: SheetsError) -> String {
    match err {
        SheetsError::Configuration(detail) => {
            tracing::error!(%detail, "sheets sink is not configured");
            "Sheets sink is not configured".into()
        }
        other => {
            tracing::error!(error = %other, "sheets append failed");
            other.to_string()
        }
    }
}
