use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mailbox {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Mailbox {
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self { address: address.into(), name: None }
    }

    #[must_use]
    pub fn named(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self { address: address.into(), name: Some(name.into()) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Substitution {
    pub key: String,
    pub value: String,
}

/// Either a provider-side template with substitutions, or a plain-text digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageContent {
    Template { template_id: String, substitutions: Vec<Substitution> },
    PlainText { subject: String, body: String },
}

/// Email ready to be handed to a mail transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub from: Mailbox,
    pub to: Mailbox,
    pub content: MessageContent,
}

impl OutboundMessage {
    #[must_use]
    pub fn template_id(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Template { template_id, .. } => Some(template_id),
            MessageContent::PlainText { .. } => None,
        }
    }

    #[must_use]
    pub fn substitutions(&self) -> &[Substitution] {
        match &self.content {
            MessageContent::Template { substitutions, .. } => substitutions,
            MessageContent::PlainText { .. } => &[],
        }
    }

    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        match &self.content {
            MessageContent::PlainText { subject, .. } => Some(subject),
            MessageContent::Template { .. } => None,
        }
    }

    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match &self.content {
            MessageContent::PlainText { body, .. } => Some(body),
            MessageContent::Template { .. } => None,
        }
    }
}
