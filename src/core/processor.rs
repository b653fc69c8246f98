use crate::core::message_builder::MessageBuilder;
use crate::core::stores::{ContactStore, SettingsStore};
use crate::domain::contact::ContactRecord;
use crate::domain::outbound::OutboundMessage;
use crate::domain::settings::SettingsKey;
use crate::domain::submission::Submission;
use crate::error::{AppError, Result};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Handles one submission: stores its contact block, resolves the form's
/// delivery settings and builds the notification email.
#[derive(Debug)]
pub struct SubmissionProcessor {
    settings: Arc<dyn SettingsStore>,
    contacts: Arc<dyn ContactStore>,
    builder: MessageBuilder,
    stores_ready: OnceCell<()>,
}

impl SubmissionProcessor {
    #[must_use]
    pub fn new(settings: Arc<dyn SettingsStore>, contacts: Arc<dyn ContactStore>, builder: MessageBuilder) -> Self {
        Self { settings, contacts, builder, stores_ready: OnceCell::new() }
    }

    /// Creates both backing stores if missing. Runs at most once successfully
    /// per processor; failures are retried on the next call.
    ///
    /// # Errors
    /// Returns the store error if either container cannot be created.
    pub async fn ensure_stores(&self) -> Result<()> {
        self.stores_ready
            .get_or_try_init(|| async {
                self.settings.ensure_exists().await?;
                self.contacts.ensure_exists().await?;
                tracing::debug!("Settings and contact stores ready");
                Ok::<(), AppError>(())
            })
            .await?;
        Ok(())
    }

    /// Returns `Ok(None)` when the form has no delivery settings.
    ///
    /// # Errors
    /// Propagates store failures unchanged, including a duplicate contact insert.
    /// A failed insert stops processing before the settings lookup.
    #[tracing::instrument(
        skip(self, submission),
        err,
        fields(submission_id = %submission.id, site_url = %submission.site_url, form_name = %submission.form_name)
    )]
    pub async fn process(&self, submission: &Submission) -> Result<Option<OutboundMessage>> {
        self.ensure_stores().await?;

        if let Some(record) = ContactRecord::from_submission(submission) {
            self.contacts.insert(&record).await?;
            tracing::debug!("Contact details stored");
        }

        let key = SettingsKey::for_form(&submission.site_url, &submission.form_name);
        let Some(settings) = self.settings.get(&key).await? else {
            tracing::info!(row_key = %key.row_key, "No delivery settings for form, skipping email");
            return Ok(None);
        };

        let message = self.builder.build(&settings, submission);
        tracing::debug!(templated = message.template_id().is_some(), "Notification email built");
        Ok(Some(message))
    }
}
