use serde::{Deserialize, Serialize};

/// A grading job accepted by the grading service and held in its queue.
///
/// This is also the wire body of `POST /` on the grading service, so field
/// names (including the camelCase `testCode`) must stay stable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GradingJob {
    /// ID of the submission row this job grades.
    pub submission_id: i32,
    /// Submitted source code.
    pub code: String,
    /// Test code executed against the submission.
    #[serde(rename = "testCode")]
    pub test_code: String,
    /// Owner of the submission; routes the result event back to the
    /// right client.
    pub user_uuid: String,
}

/// Grading result delivered back to the submission API
/// (`POST /grading/{user_uuid}`).
///
/// `passed` is the structured verdict. Older graders omit it, in which case
/// the legacy convention applies: a `result` whose first byte is `.` (the
/// test runner's "all dots" summary line) counts as passed.
#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GradeReport {
    /// ID of the graded submission.
    pub submission_id: i32,
    /// The code that was graded.
    pub code: String,
    /// Free-text runner output, stored as grader feedback.
    pub result: String,
    /// Structured verdict; falls back to the legacy `result` convention
    /// when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passed: Option<bool>,
}

impl GradeReport {
    /// Resolve the verdict, preferring the structured field over the
    /// legacy leading-dot convention.
    pub fn outcome(&self) -> GradeOutcome {
        let passed = self
            .passed
            .unwrap_or_else(|| legacy_result_passed(&self.result));
        GradeOutcome {
            passed,
            details: self.result.clone(),
        }
    }
}

/// Structured grading verdict produced by a code runner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeOutcome {
    /// Whether every test passed.
    pub passed: bool,
    /// Runner output shown to the user as feedback.
    pub details: String,
}

impl GradeOutcome {
    /// Parse a legacy free-text result into a structured outcome.
    pub fn from_legacy(result: impl Into<String>) -> Self {
        let details = result.into();
        Self {
            passed: legacy_result_passed(&details),
            details,
        }
    }
}

/// Legacy verdict convention: the first character of the runner summary is
/// `.` exactly when all tests passed. Inherited from the original test
/// runner's output format; kept bit-for-bit for compatibility.
fn legacy_result_passed(result: &str) -> bool {
    result.as_bytes().first() == Some(&b'.')
}
