use crate::config::{MailConfig, MailTransportKind};
use crate::domain::outbound::OutboundMessage;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub mod sendgrid;
pub mod smtp;

pub use sendgrid::SendGridTransport;
pub use smtp::SmtpTransport;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Message rejected by provider: {0}")]
    Rejected(String),
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error("Unsupported by this transport: {0}")]
    Unsupported(&'static str),
    #[error("External service error: {0}")]
    Other(#[from] anyhow::Error),
}

impl MailError {
    /// Permanent failures will not succeed on redelivery.
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(self, Self::Rejected(_) | Self::Unsupported(_))
    }
}

#[async_trait]
pub trait MailTransport: Send + Sync + std::fmt::Debug {
    /// Hands a built message to the provider.
    ///
    /// # Errors
    /// Returns `MailError::Rejected` or `MailError::Unsupported` for messages that will never be accepted.
    async fn send(&self, message: &OutboundMessage) -> Result<(), MailError>;
}

/// Logs messages instead of delivering them.
#[derive(Debug, Default)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<(), MailError> {
        tracing::info!(
            from = %message.from.address,
            to = %message.to.address,
            template_id = message.template_id(),
            subject = message.subject(),
            "Mail delivery disabled, dropping message"
        );
        Ok(())
    }
}

/// Builds the transport selected in configuration.
///
/// # Errors
/// Returns an error if the selected transport is missing credentials or cannot be constructed.
pub fn build_transport(config: &MailConfig) -> anyhow::Result<Arc<dyn MailTransport>> {
    let transport: Arc<dyn MailTransport> = match config.transport {
        MailTransportKind::Sendgrid => Arc::new(SendGridTransport::new(config)?),
        MailTransportKind::Smtp => Arc::new(SmtpTransport::new(config)?),
        MailTransportKind::Log => Arc::new(LogTransport),
    };
    tracing::info!(transport = ?config.transport, "Mail transport initialized");
    Ok(transport)
}
