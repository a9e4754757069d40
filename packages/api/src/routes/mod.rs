use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

/// Route table. Paths are wire-compatible with the original service, so
/// there is no version prefix.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/assignments/{id}", get(handlers::assignment::get_assignment))
        .route(
            "/submissions/{id}",
            post(handlers::submission::create_submission),
        )
        .route(
            "/submissions/{id}/{user_uuid}",
            get(handlers::submission::get_current_submission),
        )
        .route(
            "/grading/{user_uuid}",
            get(handlers::grading::stream_status_events)
                .post(handlers::grading::record_grading_result),
        )
}
