use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use common::GradingJob;
use queue::JobQueue;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Clone)]
pub struct GraderState {
    pub queue: Arc<JobQueue<GradingJob>>,
}

/// Acknowledgement body for the enqueue endpoint.
#[derive(Serialize)]
pub struct EnqueueResponse {
    pub status: &'static str,
}

/// Accept a grading job and queue it for the worker loop.
///
/// Legacy contract: malformed bodies get `200 {"status":"Error"}`, not a
/// 400 — existing clients switch on the `status` field.
pub async fn enqueue_job(
    State(state): State<GraderState>,
    payload: Result<Json<GradingJob>, JsonRejection>,
) -> Json<EnqueueResponse> {
    match payload {
        Ok(Json(job)) => {
            info!(
                submission_id = job.submission_id,
                user_uuid = %job.user_uuid,
                "Enqueued grading job"
            );
            state.queue.enqueue(job).await;
            Json(EnqueueResponse { status: "Enqueued" })
        }
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected malformed grading job");
            Json(EnqueueResponse { status: "Error" })
        }
    }
}

/// Build the grading service router.
pub fn build_router(state: GraderState) -> Router {
    Router::new().route("/", post(enqueue_job)).with_state(state)
}
