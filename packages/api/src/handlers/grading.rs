use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use common::GradeReport;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::{Stream, StreamExt};
use tracing::{instrument, warn};

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::state::AppState;

/// Grading-result callback from the worker loop.
#[utoipa::path(
    post,
    path = "/grading/{user_uuid}",
    tag = "Grading",
    operation_id = "recordGradingResult",
    summary = "Record a grading result",
    description = "Called by the grading worker once a submission has been executed. \
                   Marks the submission processed and publishes the transition on the \
                   owner's event stream.",
    params(
        ("user_uuid" = String, Path, description = "Owner of the graded submission")
    ),
    request_body = GradeReport,
    responses(
        (status = 200, description = "Result recorded", body = String),
        (status = 400, description = "Malformed body (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Unknown submission (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, report), fields(user_uuid = %user_uuid))]
pub async fn record_grading_result(
    State(state): State<AppState>,
    Path(user_uuid): Path<String>,
    AppJson(report): AppJson<GradeReport>,
) -> Result<&'static str, AppError> {
    state.coordinator.record_result(&user_uuid, report).await?;
    Ok("OK")
}

/// Long-lived status event stream for one user.
///
/// Each event's `data:` is the JSON-encoded current submission record.
/// Dropping the connection drops the stream, which drops the broadcast
/// receiver and thereby deregisters the listener on every exit path.
#[utoipa::path(
    get,
    path = "/grading/{user_uuid}",
    tag = "Grading",
    operation_id = "streamStatusEvents",
    summary = "Subscribe to submission status events",
    params(
        ("user_uuid" = String, Path, description = "Submitter identity")
    ),
    responses(
        (status = 200, description = "text/event-stream of submission records"),
    ),
)]
#[instrument(skip(state), fields(user_uuid = %user_uuid))]
pub async fn stream_status_events(
    State(state): State<AppState>,
    Path(user_uuid): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.hub.subscribe(&user_uuid).await;

    let stream = BroadcastStream::new(receiver).filter_map(move |msg| match msg {
        Ok(payload) => Some(Ok(Event::default().data(payload))),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            // At-most-once delivery: a lagging client just misses events and
            // recovers via the store, so skipping here is fine.
            warn!(%user_uuid, skipped, "Status stream lagged");
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
