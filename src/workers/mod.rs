pub mod submission;

pub use submission::{JobOutcome, SubmissionWorker};
