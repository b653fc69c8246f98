use crate::domain::submission::Submission;

/// Persisted contact details, keyed by (site URL, submission id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub site_url: String,
    pub submission_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactRecord {
    #[must_use]
    pub fn from_submission(submission: &Submission) -> Option<Self> {
        submission.contact.as_ref().map(|contact| Self {
            site_url: submission.site_url.clone(),
            submission_id: submission.id.clone(),
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
        })
    }
}
