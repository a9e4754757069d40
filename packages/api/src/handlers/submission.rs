use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use tracing::instrument;

use crate::coordinator::SubmissionOutcome;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::grader::DispatchResponse;
use crate::models::submission::{
    DuplicateResponse, SubmissionRecord, SubmissionRequest, validate_submission_request,
};
use crate::state::AppState;

/// Submit a solution for the assignment with ordering index `id`.
#[utoipa::path(
    post,
    path = "/submissions/{id}",
    tag = "Submissions",
    operation_id = "createSubmission",
    summary = "Submit a solution for grading",
    description = "Accepts a solution, persists it as pending and forwards it to the \
                   grading service. A resubmission with unchanged code, or while the \
                   previous round is still pending, is rejected as a duplicate.",
    params(
        ("id" = i32, Path, description = "Assignment ordering index (1-based)")
    ),
    request_body = SubmissionRequest,
    responses(
        (status = 200, description = "Grader acknowledgement, or a duplicate notice", body = DispatchResponse),
        (status = 400, description = "Malformed body (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Assignment not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(assignment_order = id))]
pub async fn create_submission(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<SubmissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_submission_request(&payload)?;

    let outcome = state.coordinator.submit(id, payload).await?;
    let response = match outcome {
        SubmissionOutcome::Duplicate => Json(DuplicateResponse::new()).into_response(),
        SubmissionOutcome::Dispatched(ack) => Json(ack).into_response(),
    };
    Ok(response)
}

/// Current submission for a `(assignment, user)` pair.
///
/// Recovery read for clients whose event stream dropped: the hub buffers
/// nothing, so reconnecting clients re-query here.
#[utoipa::path(
    get,
    path = "/submissions/{id}/{user_uuid}",
    tag = "Submissions",
    operation_id = "getCurrentSubmission",
    summary = "Fetch a user's current submission for an assignment",
    params(
        ("id" = i32, Path, description = "Assignment ordering index (1-based)"),
        ("user_uuid" = String, Path, description = "Submitter identity"),
    ),
    responses(
        (status = 200, description = "Current submission, as a 0- or 1-element array", body = [SubmissionRecord]),
    ),
)]
#[instrument(skip(state), fields(assignment_order = id))]
pub async fn get_current_submission(
    State(state): State<AppState>,
    Path((id, user_uuid)): Path<(i32, String)>,
) -> Result<Json<Vec<SubmissionRecord>>, AppError> {
    let record = state.coordinator.current_record(id, &user_uuid).await?;
    Ok(Json(record.into_iter().collect()))
}
