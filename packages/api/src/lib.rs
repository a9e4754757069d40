pub mod config;
pub mod coordinator;
pub mod database;
pub mod entity;
pub mod error;
pub mod events;
pub mod extractors;
pub mod grader;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod seed;
pub mod state;

use std::time::Duration;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Programming Exercise Submission API",
        version = "1.0.0",
        description = "REST API for submitting programming-exercise solutions and \
                       following their grading status"
    ),
    paths(
        handlers::assignment::get_assignment,
        handlers::submission::create_submission,
        handlers::submission::get_current_submission,
        handlers::grading::record_grading_result,
        handlers::grading::stream_status_events,
    ),
    tags(
        (name = "Assignments", description = "Exercise prompts and test code"),
        (name = "Submissions", description = "Solution submission and lookup"),
        (name = "Grading", description = "Worker callbacks and status event streams"),
    )
)]
struct ApiDoc;

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);

    axum::Router::new()
        .merge(routes::routes())
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
}

/// Browser clients are served from a different origin, so default to a
/// permissive policy when no explicit origin list is configured.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age));

    if config.allow_origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allow_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        layer.allow_origin(origins)
    }
}
