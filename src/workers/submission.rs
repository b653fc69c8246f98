use crate::adapters::mail::MailTransport;
use crate::config::QueueConfig;
use crate::core::processor::SubmissionProcessor;
use crate::core::queue::{LeasedSubmission, SubmissionQueue};
use futures::StreamExt;
use opentelemetry::{KeyValue, global, metrics::Counter};
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

#[derive(Clone, Debug)]
struct Metrics {
    processed: Counter<u64>,
    sent: Counter<u64>,
    skipped: Counter<u64>,
    errors: Counter<u64>,
    poisoned: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("contact-relay");
        Self {
            processed: meter
                .u64_counter("submissions_processed_total")
                .with_description("Total number of submission deliveries handled")
                .build(),
            sent: meter
                .u64_counter("submission_emails_sent_total")
                .with_description("Total number of notification emails handed to the transport")
                .build(),
            skipped: meter
                .u64_counter("submissions_skipped_total")
                .with_description("Total number of submissions for forms without delivery settings")
                .build(),
            errors: meter
                .u64_counter("submission_errors_total")
                .with_description("Total number of failed submission deliveries")
                .build(),
            poisoned: meter
                .u64_counter("submissions_poisoned_total")
                .with_description("Total number of submissions moved to the poison list")
                .build(),
        }
    }
}

/// What happened to one leased submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// An email was built and accepted by the transport.
    Sent,
    /// The form has no delivery settings; nothing to send.
    Skipped,
    /// Left leased; it becomes visible again after the visibility timeout.
    Retry,
    /// Moved to the poison list.
    Poisoned,
}

/// Drains the submission queue: one processor invocation per leased entry.
#[derive(Debug)]
pub struct SubmissionWorker {
    queue: Arc<dyn SubmissionQueue>,
    processor: Arc<SubmissionProcessor>,
    transport: Arc<dyn MailTransport>,
    poll_interval: Duration,
    visibility_timeout: Duration,
    max_attempts: u32,
    concurrency: usize,
    metrics: Metrics,
}

impl SubmissionWorker {
    #[must_use]
    pub fn new(
        queue: Arc<dyn SubmissionQueue>,
        processor: Arc<SubmissionProcessor>,
        transport: Arc<dyn MailTransport>,
        config: &QueueConfig,
    ) -> Self {
        Self {
            queue,
            processor,
            transport,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            visibility_timeout: Duration::from_secs(config.visibility_timeout_secs),
            max_attempts: config.max_attempts,
            concurrency: config.concurrency.max(1),
            metrics: Metrics::new(),
        }
    }

    pub async fn run(self, mut shutdown: tokio::sync::watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.poll_interval);

        while !*shutdown.borrow() {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.process_due_jobs()
                        .instrument(tracing::debug_span!("submission_worker_iteration"))
                        .await
                    {
                        tracing::error!(error = %e, "Failed to process leased submissions");
                    }
                }
                _ = shutdown.changed() => break,
            }
        }

        tracing::info!("Submission worker shutting down...");
    }

    /// Leases a batch of visible submissions and handles them concurrently.
    ///
    /// # Errors
    /// Returns an error if the queue cannot be read.
    #[tracing::instrument(level = "debug", skip(self), err)]
    pub async fn process_due_jobs(&self) -> anyhow::Result<Vec<JobOutcome>> {
        let leased = self.queue.lease(self.concurrency, self.visibility_timeout).await?;

        if leased.is_empty() {
            tracing::debug!("No submissions due");
            return Ok(Vec::new());
        }

        tracing::info!(count = leased.len(), "Processing leased submissions");

        let outcomes = futures::stream::iter(leased)
            .map(|job| {
                let span = tracing::info_span!(
                    "handle_submission",
                    message_id = %job.message_id,
                    submission_id = %job.submission.id,
                    attempts = job.attempts
                );
                async move { self.handle(&job).await }.instrument(span)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        Ok(outcomes)
    }

    async fn handle(&self, job: &LeasedSubmission) -> JobOutcome {
        if job.attempts > self.max_attempts {
            tracing::warn!(max_attempts = self.max_attempts, "Submission exceeded delivery attempts");
            return self.bury(job).await;
        }

        self.metrics.processed.add(1, &[]);

        let message = match self.processor.process(&job.submission).await {
            Ok(Some(message)) => message,
            Ok(None) => {
                self.metrics.skipped.add(1, &[]);
                self.ack(job).await;
                return JobOutcome::Skipped;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Submission processing failed, will retry");
                self.metrics.errors.add(1, &[KeyValue::new("reason", "processing")]);
                return JobOutcome::Retry;
            }
        };

        match self.transport.send(&message).await {
            Ok(()) => {
                tracing::info!(to = %message.to.address, "Notification email handed to transport");
                self.metrics.sent.add(1, &[]);
                self.ack(job).await;
                JobOutcome::Sent
            }
            Err(e) if e.is_permanent() => {
                tracing::error!(error = %e, "Notification email permanently rejected");
                self.metrics.errors.add(1, &[KeyValue::new("reason", "rejected")]);
                self.bury(job).await
            }
            Err(e) => {
                tracing::warn!(error = %e, "Notification email delivery failed, will retry");
                self.metrics.errors.add(1, &[KeyValue::new("reason", "transport")]);
                JobOutcome::Retry
            }
        }
    }

    async fn ack(&self, job: &LeasedSubmission) {
        if let Err(e) = self.queue.ack(&job.message_id).await {
            // The entry will be redelivered once its lease expires.
            tracing::error!(error = %e, "Failed to acknowledge submission");
        }
    }

    async fn bury(&self, job: &LeasedSubmission) -> JobOutcome {
        match self.queue.bury(job).await {
            Ok(()) => {
                self.metrics.poisoned.add(1, &[]);
                JobOutcome::Poisoned
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to move submission to poison list");
                JobOutcome::Retry
            }
        }
    }
}
