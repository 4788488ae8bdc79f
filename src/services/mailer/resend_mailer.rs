use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::services::mailer::{DeliveryReceipt, MailError, Mailer, OutgoingEmail};

pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com/emails";

/// API-key transport: structured send call, the provider handles MIME
/// assembly and encoding.
pub struct ResendMailer {
    http: Client,
    api_key: String,
    from_email: String,
    api_url: String,
}

impl ResendMailer {
    pub fn from_env(http: &Client) -> Result<Self, MailError> {
        let api_key = env::var("RESEND_API_KEY")
            .map_err(|_| MailError::Configuration("RESEND_API_KEY".into()))?;
        let from_email = env::var("RESEND_FROM_EMAIL")
            .map_err(|_| MailError::Configuration("RESEND_FROM_EMAIL".into()))?;
        Ok(Self::new(
            http.clone(),
            api_key,
            from_email,
            DEFAULT_RESEND_API_URL.into(),
        ))
    }

    pub fn new(http: Client, api_key: String, from_email: String, api_url: String) -> Self {
        Self {
            http,
            api_key,
            from_email,
            api_url,
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send_form_notification(
        &self,
        email: &OutgoingEmail,
    ) -> Result<DeliveryReceipt, MailError> {
        let payload = json!({
            "from": format!("{} <{}>", email.from_name, self.from_email),
            "to": email.to,
            "subject": email.subject,
            "html": email.html_body,
            "reply_to": email.reply_to,
        });

        let res = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        if res.status().is_success() {
            let body: Value = res.json().await.unwrap_or(Value::Null);
            Ok(DeliveryReceipt {
                message_id: body["id"].as_str().map(|s| s.to_string()),
            })
        } else {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            Err(MailError::Transport(format!(
                "Resend send failed: {} {}",
                status, text
            )))
        }
    }
}
