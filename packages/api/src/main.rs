use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use api::config::AppConfig;
use api::coordinator::SubmissionCoordinator;
use api::events::StatusEventHub;
use api::grader::HttpGraderDispatch;
use api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = api::database::init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    api::seed::ensure_indexes(&db)
        .await
        .context("Failed to create indexes")?;

    let hub = StatusEventHub::new();
    let dispatcher = Arc::new(HttpGraderDispatch::new(config.grader.url.clone()));
    let coordinator = Arc::new(SubmissionCoordinator::new(
        db.clone(),
        hub.clone(),
        dispatcher,
    ));

    let state = AppState {
        db,
        config: config.clone(),
        hub,
        coordinator,
    };

    let app = api::build_router(state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!(%addr, grader_url = %config.grader.url, "Submission API listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind")?;
    axum::serve(listener, app).await.context("Server exited")?;

    Ok(())
}
