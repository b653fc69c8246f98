use crate::config::{SenderConfig, SenderNameMode};
use crate::domain::outbound::{Mailbox, MessageContent, OutboundMessage, Substitution};
use crate::domain::settings::FormSettings;
use crate::domain::submission::Submission;

pub const FALLBACK_SUBJECT: &str = "Nuevo contacto web";
const INTRO_PREFIX: &str = "Se ha recibido un contacto a través de la página web ";

/// How the sender display name is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SenderName {
    Static { label: String },
    /// Renders `"{value} (web)"` from the named field, or `fallback` if the field is missing or blank.
    FieldDerived { field: String, fallback: String },
}

impl SenderName {
    fn resolve(&self, submission: &Submission) -> String {
        match self {
            Self::Static { label } => label.clone(),
            Self::FieldDerived { field, fallback } => match submission.field(field).map(str::trim) {
                Some(value) if !value.is_empty() => format!("{value} (web)"),
                _ => fallback.clone(),
            },
        }
    }
}

impl From<&SenderConfig> for SenderName {
    fn from(config: &SenderConfig) -> Self {
        match config.name_mode {
            SenderNameMode::Static => Self::Static { label: config.label.clone() },
            SenderNameMode::Field => Self::FieldDerived { field: config.field.clone(), fallback: config.label.clone() },
        }
    }
}

/// Turns form settings and a submission into an email. Pure: no I/O, no state.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    sender_name: SenderName,
}

impl MessageBuilder {
    #[must_use]
    pub const fn new(sender_name: SenderName) -> Self {
        Self { sender_name }
    }

    #[must_use]
    pub fn build(&self, settings: &FormSettings, submission: &Submission) -> OutboundMessage {
        let from = Mailbox::named(&settings.from_address, self.sender_name.resolve(submission));
        let to = Mailbox::new(&settings.to_address);

        let content = match settings.template_id.as_deref().filter(|t| !t.is_empty()) {
            Some(template_id) => MessageContent::Template {
                template_id: template_id.to_string(),
                substitutions: submission
                    .fields
                    .iter()
                    .map(|f| Substitution { key: f.name.clone(), value: f.value.clone() })
                    .collect(),
            },
            None => MessageContent::PlainText { subject: FALLBACK_SUBJECT.to_string(), body: digest(submission) },
        };

        OutboundMessage { from, to, content }
    }
}

fn digest(submission: &Submission) -> String {
    let mut body = format!("{INTRO_PREFIX}{}\n", submission.site_url);
    for field in &submission.fields {
        body.push_str(&format!("- {}: {}\n", field.name, field.value));
    }
    body
}
