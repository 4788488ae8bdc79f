use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    address::Address,
    message::{Mailbox, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::services::mailer::{DeliveryReceipt, MailError, Mailer, OutgoingEmail};

/// Plain SMTP transport over TLS with credentials, for deployments that
/// relay through a mailbox provider instead of a transactional API.
pub struct SmtpMailer {
    transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    sender: Address,
}

impl SmtpMailer {
    pub fn from_env() -> Result<Self, MailError> {
        let host = required("SMTP_HOST")?;
        let username = required("SMTP_USERNAME")?;
        let password = required("SMTP_PASSWORD")?;
        let port: u16 = required("SMTP_PORT")?
            .parse()
            .map_err(|_| MailError::Configuration("SMTP_PORT must be a port number".into()))?;
        let sender: Address = required("SMTP_FROM")?.parse()?;

        let creds = Credentials::new(username, password);
        let tls = TlsParameters::new(host.clone())
            .map_err(|e| MailError::Transport(format!("Failed to configure TLS for {}: {}", host, e)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&host)?
            .port(port)
            .tls(Tls::Required(tls))
            .credentials(creds)
            .build();

        Ok(Self {
            transport: Arc::new(transport),
            sender,
        })
    }
}

fn required(key: &'static str) -> Result<String, MailError> {
    env::var(key).map_err(|_| MailError::Configuration(key.into()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_form_notification(
        &self,
        email: &OutgoingEmail,
    ) -> Result<DeliveryReceipt, MailError> {
        let from = Mailbox::new(Some(email.from_name.clone()), self.sender.clone());
        let message = Message::builder()
            .from(from)
            .to(email.to.parse()?)
            .reply_to(email.reply_to.parse()?)
            .subject(email.subject.clone())
            .singlepart(SinglePart::html(email.html_body.clone()))?;

        self.transport
            .send(message)
            .await
            .map(|_| DeliveryReceipt::default())
            .map_err(|e| e.into())
    }
}
