use chrono::{DateTime, Utc};
use common::SubmissionStatus;
use serde::{Deserialize, Serialize};

use crate::entity::submission;
use crate::error::AppError;

/// Request body for `POST /submissions/{id}`.
#[derive(Clone, Debug, Deserialize, utoipa::ToSchema)]
pub struct SubmissionRequest {
    /// Solution source code.
    #[schema(example = "def hello():\n    return 'Hello world'")]
    pub code: String,
    /// Client-generated identity of the submitter.
    #[schema(example = "6bf2d822-ac52-47b1-8097-d7738eaf66c5")]
    pub user_uuid: String,
}

/// A user's submission record. Also the `data:` payload of the status
/// event stream.
#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SubmissionRecord {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub assignment_id: i32,
    pub user_uuid: String,
    pub code: String,
    pub status: SubmissionStatus,
    /// Runner output; `null` until processed.
    pub grader_feedback: Option<String>,
    pub correct: bool,
    pub last_updated: DateTime<Utc>,
}

impl From<submission::Model> for SubmissionRecord {
    fn from(model: submission::Model) -> Self {
        Self {
            id: model.id,
            assignment_id: model.assignment_id,
            user_uuid: model.user_uuid,
            code: model.code,
            status: model.status,
            grader_feedback: model.grader_feedback,
            correct: model.correct,
            last_updated: model.last_updated,
        }
    }
}

/// Body returned when a submission is rejected as a duplicate.
#[derive(Clone, Debug, Serialize, utoipa::ToSchema)]
pub struct DuplicateResponse {
    /// Always `"Duplicate submission"`.
    #[schema(example = "Duplicate submission")]
    pub data: String,
}

impl DuplicateResponse {
    pub fn new() -> Self {
        Self {
            data: "Duplicate submission".to_string(),
        }
    }
}

impl Default for DuplicateResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a submission request body.
pub fn validate_submission_request(payload: &SubmissionRequest) -> Result<(), AppError> {
    if payload.user_uuid.trim().is_empty() {
        return Err(AppError::Validation("user_uuid must not be empty".into()));
    }
    Ok(())
}
