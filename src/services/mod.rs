pub mod submission_handler;

pub use submission_handler::{Settlement, SubmissionHandler};
