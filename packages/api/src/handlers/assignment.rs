use axum::Json;
use axum::extract::{Path, State};
use sea_orm::*;
use tracing::instrument;

use crate::entity::assignment;
use crate::error::AppError;
use crate::models::assignment::AssignmentResponse;
use crate::state::AppState;

/// Fetch an assignment by its ordering index.
///
/// Returns an array for compatibility with the original row-set response:
/// one element when the assignment exists, empty otherwise.
#[utoipa::path(
    get,
    path = "/assignments/{id}",
    tag = "Assignments",
    operation_id = "getAssignment",
    summary = "Fetch an assignment by ordering index",
    params(
        ("id" = i32, Path, description = "Assignment ordering index (1-based)")
    ),
    responses(
        (status = 200, description = "Matching assignment, as a 0- or 1-element array", body = [AssignmentResponse]),
    ),
)]
#[instrument(skip(state))]
pub async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<AssignmentResponse>>, AppError> {
    let rows = assignment::Entity::find()
        .filter(assignment::Column::AssignmentOrder.eq(id))
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(AssignmentResponse::from).collect()))
}
