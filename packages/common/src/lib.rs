pub mod grading;
pub mod retry;
pub mod submission_status;

pub use grading::{GradeOutcome, GradeReport, GradingJob};
pub use submission_status::SubmissionStatus;
