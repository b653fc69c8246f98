pub mod contact;
pub mod outbound;
pub mod settings;
pub mod submission;
