use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::assignment;

/// An assignment as returned by `GET /assignments/{id}`.
///
/// Includes `test_code`, matching the original service's `SELECT *`
/// behavior that existing clients depend on.
#[derive(Clone, Debug, Serialize, utoipa::ToSchema)]
pub struct AssignmentResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Hello world")]
    pub title: String,
    /// 1-based position in the exercise sequence.
    #[schema(example = 1)]
    pub assignment_order: i32,
    /// Prompt text, in Markdown.
    pub handout: String,
    /// Test code run against submissions.
    pub test_code: String,
    pub created_at: DateTime<Utc>,
}

impl From<assignment::Model> for AssignmentResponse {
    fn from(model: assignment::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            assignment_order: model.assignment_order,
            handout: model.handout,
            test_code: model.test_code,
            created_at: model.created_at,
        }
    }
}
