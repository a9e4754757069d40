use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use queue::JobQueue;
use tracing::info;

use grader::config::GraderAppConfig;
use grader::runner::CommandRunner;
use grader::server::GraderState;
use grader::worker::WorkerLoop;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = GraderAppConfig::load().context("Failed to load config")?;

    let queue = Arc::new(JobQueue::new());
    let runner = Arc::new(CommandRunner::new(config.runner.clone()));

    let worker = WorkerLoop::new(Arc::clone(&queue), runner, config.worker.clone());
    tokio::spawn(worker.run());

    let app = grader::build_router(GraderState { queue });

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!(%addr, api_url = %config.worker.api_url, "Grading service listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind")?;
    axum::serve(listener, app).await.context("Server exited")?;

    Ok(())
}
