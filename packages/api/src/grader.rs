use async_trait::async_trait;
use common::GradingJob;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;

/// Acknowledgement returned by the grading service when a job is accepted.
/// Relayed verbatim to the submitting client.
#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DispatchResponse {
    /// `"Enqueued"` on success, `"Error"` when the grader rejected the job.
    #[schema(example = "Enqueued")]
    pub status: String,
}

/// Seam between the coordinator and the grading service.
///
/// Production uses [`HttpGraderDispatch`]; tests substitute a recording stub
/// so coordinator behavior is checkable without a second process.
#[async_trait]
pub trait GraderDispatch: Send + Sync {
    async fn dispatch(&self, job: GradingJob) -> Result<DispatchResponse, AppError>;
}

/// Dispatches jobs to the grading service over HTTP (`POST {base_url}/`).
pub struct HttpGraderDispatch {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGraderDispatch {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl GraderDispatch for HttpGraderDispatch {
    async fn dispatch(&self, job: GradingJob) -> Result<DispatchResponse, AppError> {
        debug!(
            submission_id = job.submission_id,
            user_uuid = %job.user_uuid,
            "Dispatching grading job"
        );

        let response = self
            .client
            .post(format!("{}/", self.base_url.trim_end_matches('/')))
            .json(&job)
            .send()
            .await?
            .json::<DispatchResponse>()
            .await?;

        Ok(response)
    }
}
