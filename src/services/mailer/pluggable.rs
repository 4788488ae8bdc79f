use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use super::gmail_mailer::GmailMailer;
use super::resend_mailer::ResendMailer;
use super::smtp_mailer::SmtpMailer;
use crate::services::mailer::{DeliveryReceipt, MailError, Mailer, OutgoingEmail};

enum AppSender {
    Gmail(Arc<GmailMailer>),
    Resend(Arc<ResendMailer>),
    Smtp(Arc<SmtpMailer>),
}

/// Transport selected once at startup via `EMAIL_PROVIDER`; every send goes
/// through whichever variant was configured.
pub struct PluggableMailer {
    sender: AppSender,
}

impl PluggableMailer {
    pub fn from_env(http: &Client) -> Result<Self, MailError> {
        let provider = env::var("EMAIL_PROVIDER").unwrap_or_else(|_| "gmail".into());
        let provider = provider.to_ascii_lowercase();

        let sender = match provider.as_str() {
            "gmail" => AppSender::Gmail(Arc::new(GmailMailer::from_env(http)?)),
            "resend" => AppSender::Resend(Arc::new(ResendMailer::from_env(http)?)),
            "smtp" => AppSender::Smtp(Arc::new(SmtpMailer::from_env()?)),
            other => {
                return Err(MailError::Configuration(format!(
                    "Unsupported EMAIL_PROVIDER: {} (expected 'gmail', 'resend' or 'smtp')",
                    other
                )))
            }
        };

        Ok(Self { sender })
    }
}

#[async_trait]
impl Mailer for PluggableMailer {
    async fn send_form_notification(
        &self,
        email: &OutgoingEmail,
    ) -> Result<DeliveryReceipt, MailError> {
        match &self.sender {
            AppSender::Gmail(gmail) => gmail.send_form_notification(email).await,
            AppSender::Resend(resend) => resend.send_form_notification(email).await,
            AppSender::Smtp(smtp) => smtp.send_form_notification(email).await,
        }
    }
}
