use async_trait::async_trait;
use thiserror::Error;

use crate::services::google_auth::GoogleAuthError;

#[derive(Debug, Error)]
pub enum MailError {
    /// Operator-fixable: required settings or credentials are absent. The
    /// detail names the setting, never its value.
    #[error("mail transport is not configured: {0}")]
    Configuration(String),
    #[error("invalid email address: {0}")]
    InvalidAddress(String),
    /// Provider-side rejection or network failure, with provider detail.
    #[error("{0}")]
    Transport(String),
}

impl From<GoogleAuthError> for MailError {
    fn from(err: GoogleAuthError) -> Self {
        match err {
            GoogleAuthError::MissingConfiguration(key) => MailError::Configuration(key.into()),
            GoogleAuthError::InvalidKey(detail) => MailError::Configuration(detail),
            other => MailError::Transport(other.to_string()),
        }
    }
}

impl From<lettre::address::AddressError> for MailError {
    fn from(err: lettre::address::AddressError) -> Self {
        MailError::InvalidAddress(err.to_string())
    }
}

impl From<lettre::error::Error> for MailError {
    fn from(err: lettre::error::Error) -> Self {
        MailError::Transport(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for MailError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        MailError::Transport(err.to_string())
    }
}

/// A fully rendered notification email, ready for any transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from_name: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub html_body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub message_id: Option<String>,
}

/// One capability, several transports: deliver a rendered notification email.
/// Implementations are fire-and-forget; the caller suspends until the
/// provider call resolves and no retry is attempted here.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_form_notification(
        &self,
        email: &OutgoingEmail,
    ) -> Result<DeliveryReceipt, MailError>;
}

mod gmail_mailer;
mod mock_mailer;
mod pluggable;
mod resend_mailer;
mod smtp_mailer;

pub use gmail_mailer::GmailMailer;
#[allow(unused_imports)]
pub use mock_mailer::MockMailer;
pub use pluggable::PluggableMailer;
pub use resend_mailer::ResendMailer;
pub use smtp_mailer::SmtpMailer;
