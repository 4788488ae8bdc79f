use std::sync::Mutex;

use async_trait::async_trait;

use crate::services::mailer::{DeliveryReceipt, MailError, Mailer, OutgoingEmail};

/// Recording mailer for tests. Stores every email it is asked to send so
/// assertions can check both payloads and call counts.
#[derive(Debug, Default)]
pub struct MockMailer {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    /// When set, sends fail with a transport error carrying this detail.
    pub fail_send: Option<String>,
    /// When true, sends fail as if the transport were unconfigured.
    pub fail_configuration: bool,
}

impl MockMailer {
    pub fn failing(detail: &str) -> Self {
        Self {
            fail_send: Some(detail.to_string()),
            ..Self::default()
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send_form_notification(
        &self,
        email: &OutgoingEmail,
    ) -> Result<DeliveryReceipt, MailError> {
        if self.fail_configuration {
            return Err(MailError::Configuration("MOCK_API_KEY".into()));
        }
        if let Some(detail) = &self.fail_send {
            return Err(MailError::Transport(detail.clone()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(DeliveryReceipt {
            message_id: Some("mock-email-id".into()),
        })
    }
}
