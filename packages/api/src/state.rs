use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::coordinator::SubmissionCoordinator;
use crate::events::StatusEventHub;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub hub: StatusEventHub,
    pub coordinator: Arc<SubmissionCoordinator>,
}
