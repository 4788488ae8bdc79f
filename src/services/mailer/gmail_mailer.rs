use std::env;

use async_trait::async_trait;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use reqwest::Client;
use serde_json::{json, Value};

use crate::services::google_auth::{
    fetch_access_token, ServiceAccountKey, DEFAULT_TOKEN_URL, GMAIL_SEND_SCOPE,
};
use crate::services::mailer::{DeliveryReceipt, MailError, Mailer, OutgoingEmail};

pub const DEFAULT_GMAIL_SEND_URL: &str =
    "https://gmail.googleapis.com/gmail/v1/users/me/messages/send";

/// Domain-delegated transport: authenticates as a service account
/// impersonating a fixed mailbox, then submits a hand-assembled raw message
/// through the Gmail send endpoint. The impersonated mailbox is also the
/// `From` address.
pub struct GmailMailer {
    http: Client,
    key: ServiceAccountKey,
    impersonate: String,
    token_url: String,
    send_url: String,
}

impl GmailMailer {
    pub fn from_env(http: &Client) -> Result<Self, MailError> {
        let key = ServiceAccountKey::from_env()?;
        let impersonate = env::var("GMAIL_IMPERSONATE_USER")
            .map_err(|_| MailError::Configuration("GMAIL_IMPERSONATE_USER".into()))?;
        Ok(Self::new(
            http.clone(),
            key,
            impersonate,
            DEFAULT_TOKEN_URL.into(),
            DEFAULT_GMAIL_SEND_URL.into(),
        ))
    }

    pub fn new(
        http: Client,
        key: ServiceAccountKey,
        impersonate: String,
        token_url: String,
        send_url: String,
    ) -> Self {
        Self {
            http,
            key,
            impersonate,
            token_url,
            send_url,
        }
    }

    /// Assembles the RFC-2822 message and encodes it base64url without
    /// padding, as the messages.send endpoint expects. The subject is
    /// wrapped in a base64 encoded-word so non-ASCII subjects survive.
    fn build_raw_message(&self, email: &OutgoingEmail) -> String {
        let subject = format!("=?utf-8?B?{}?=", STANDARD.encode(&email.subject));
        let parts = [
            format!("From: \"{}\" <{}>", email.from_name, self.impersonate),
            format!("To: {}", email.to),
            format!("Reply-To: {}", email.reply_to),
            "Content-Type: text/html; charset=utf-8".to_string(),
            "MIME-Version: 1.0".to_string(),
            format!("Subject: {}", subject),
            String::new(),
            email.html_body.clone(),
        ];
        URL_SAFE_NO_PAD.encode(parts.join("\n"))
    }
}

#[async_trait]
impl Mailer for GmailMailer {
    async fn send_form_notification(
        &self,
        email: &OutgoingEmail,
    ) -> Result<DeliveryReceipt, MailError> {
        let token = fetch_access_token(
            &self.http,
            &self.key,
            GMAIL_SEND_SCOPE,
            Some(&self.impersonate),
            &self.token_url,
        )
        .await?;

        let raw = self.build_raw_message(email);

        let res = self
            .http
            .post(&self.send_url)
            .bearer_auth(token)
            .json(&json!({ "raw": raw }))
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
                "Gmail send failed: {} {}",
                status, text
            )))
        }
    }
}
