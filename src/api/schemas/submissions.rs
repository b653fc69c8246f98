use crate::domain::submission::Submission;
use serde::{Deserialize, Serialize};

const MAX_FIELDS: usize = 200;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnqueueResponse {
    pub message_id: String,
}

/// Checks the identifying parts of a submission before it is queued.
///
/// # Errors
/// Returns a message naming the first missing or invalid attribute.
pub fn validate(submission: &Submission) -> Result<(), String> {
    if submission.id.trim().is_empty() {
        return Err("Submission id cannot be empty".into());
    }
    if submission.site_url.trim().is_empty() {
        return Err("Site URL cannot be empty".into());
    }
    if submission.form_name.trim().is_empty() {
        return Err("Form name cannot be empty".into());
    }
    if submission.fields.len() > MAX_FIELDS {
        return Err(format!("Too many fields (max {MAX_FIELDS})"));
    }
    Ok(())
}
