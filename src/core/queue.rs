use crate::domain::submission::Submission;
use async_trait::async_trait;
use std::time::Duration;

/// A submission handed out by the queue, hidden from other consumers until
/// it is acknowledged or its visibility timeout expires.
#[derive(Debug, Clone)]
pub struct LeasedSubmission {
    pub message_id: String,
    /// Number of times this entry has been delivered, including this one.
    pub attempts: u32,
    pub submission: Submission,
}

#[async_trait]
pub trait SubmissionQueue: Send + Sync + std::fmt::Debug {
    /// Adds a submission and returns its queue message id.
    async fn enqueue(&self, submission: &Submission) -> anyhow::Result<String>;

    /// Leases up to `limit` visible submissions for `visibility_timeout`.
    async fn lease(&self, limit: usize, visibility_timeout: Duration) -> anyhow::Result<Vec<LeasedSubmission>>;

    /// Removes a successfully handled submission.
    async fn ack(&self, message_id: &str) -> anyhow::Result<()>;

    /// Moves a submission that can never succeed to the poison list.
    async fn bury(&self, leased: &LeasedSubmission) -> anyhow::Result<()>;
}
