use crate::adapters::mail::{MailError, MailTransport};
use crate::config::MailConfig;
use crate::domain::outbound::{Mailbox, MessageContent, OutboundMessage};
use anyhow::Context;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, Transport};
use std::time::Duration;

/// Delivers plain-text messages over SMTP. Provider templates are not available here.
#[derive(Clone)]
pub struct SmtpTransport {
    mailer: lettre::SmtpTransport,
}

impl std::fmt::Debug for SmtpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpTransport").finish_non_exhaustive()
    }
}

impl SmtpTransport {
    /// # Errors
    /// Returns an error if the relay cannot be configured.
    pub fn new(config: &MailConfig) -> anyhow::Result<Self> {
        let timeout = Some(Duration::from_secs(config.timeout_secs));

        let mailer = if config.smtp_username.is_empty() || config.smtp_password.is_empty() {
            tracing::info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                "SMTP credentials not configured, using unauthenticated connection"
            );
            lettre::SmtpTransport::builder_dangerous(&config.smtp_host).port(config.smtp_port).timeout(timeout).build()
        } else {
            let creds = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());
            lettre::SmtpTransport::relay(&config.smtp_host)
                .context("Failed to create SMTP transport")?
                .port(config.smtp_port)
                .credentials(creds)
                .timeout(timeout)
                .build()
        };

        Ok(Self { mailer })
    }
}

fn mailbox(mailbox: &Mailbox) -> Result<lettre::message::Mailbox, MailError> {
    let address = mailbox
        .address
        .parse()
        .map_err(|e| MailError::Rejected(format!("invalid address {}: {e}", mailbox.address)))?;
    Ok(lettre::message::Mailbox::new(mailbox.name.clone(), address))
}

pub(crate) fn to_lettre(message: &OutboundMessage) -> Result<Message, MailError> {
    let MessageContent::PlainText { subject, body } = &message.content else {
        return Err(MailError::Unsupported("provider templates"));
    };

    Message::builder()
        .from(mailbox(&message.from)?)
        .to(mailbox(&message.to)?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.clone())
        .map_err(|e| MailError::Rejected(format!("failed to build email: {e}")))
}

#[async_trait]
impl MailTransport for SmtpTransport {
    #[tracing::instrument(level = "debug", skip(self, message), fields(to = %message.to.address), err)]
    async fn send(&self, message: &OutboundMessage) -> Result<(), MailError> {
        let email = to_lettre(message)?;
        let mailer = self.mailer.clone();

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .context("SMTP task failed")?
            .context("SMTP delivery failed")?;

        Ok(())
    }
}
