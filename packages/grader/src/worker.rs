//! Polling worker loop.
//!
//! Single consumer of the grading queue: peek, dequeue the head, execute the
//! job through the [`CodeRunner`] seam and deliver the report to the
//! submission API. An empty queue pauses the loop for the configured poll
//! interval. Delivery failures are retried with exponential backoff; once
//! retries are exhausted the result is logged and dropped, which leaves the
//! submission pending on the API side — explicit and observable, but still
//! terminal (no dead-letter store in this pipeline).

use std::sync::Arc;

use common::retry::calculate_backoff;
use common::{GradeOutcome, GradeReport, GradingJob};
use queue::JobQueue;
use tracing::{error, info, warn};

use crate::config::WorkerConfig;
use crate::error::GraderError;
use crate::runner::CodeRunner;

pub struct WorkerLoop {
    queue: Arc<JobQueue<GradingJob>>,
    runner: Arc<dyn CodeRunner>,
    client: reqwest::Client,
    config: WorkerConfig,
}

impl WorkerLoop {
    pub fn new(
        queue: Arc<JobQueue<GradingJob>>,
        runner: Arc<dyn CodeRunner>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            queue,
            runner,
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Run forever: drain the queue one job at a time, sleeping between
    /// polls while it is empty.
    pub async fn run(self) {
        info!(
            api_url = %self.config.api_url,
            poll_interval_ms = self.config.poll_interval_ms,
            "Worker loop started"
        );
        loop {
            if !self.drain_one().await {
                tokio::time::sleep(std::time::Duration::from_millis(
                    self.config.poll_interval_ms,
                ))
                .await;
            }
        }
    }

    /// Process the head of the queue, if any. Returns whether a job was
    /// consumed.
    pub async fn drain_one(&self) -> bool {
        if self.queue.peek().await.is_none() {
            return false;
        }
        let Some(job) = self.queue.dequeue().await else {
            return false;
        };

        let submission_id = job.submission_id;
        info!(submission_id, user_uuid = %job.user_uuid, "Processing grading job");

        let outcome = match self.runner.run(&job.code, &job.test_code).await {
            Ok(outcome) => outcome,
            Err(e) => {
                // Report runner failures as a failed grade rather than
                // leaving the submission pending forever.
                error!(submission_id, error = %e, "Runner failed");
                GradeOutcome {
                    passed: false,
                    details: format!("Grading failed: {e}"),
                }
            }
        };

        let report = GradeReport {
            submission_id,
            code: job.code,
            result: outcome.details,
            passed: Some(outcome.passed),
        };

        if let Err(e) = self.deliver(&job.user_uuid, &report).await {
            error!(
                submission_id,
                user_uuid = %job.user_uuid,
                error = %e,
                "Dropping grading result after exhausted delivery retries"
            );
        }
        true
    }

    /// Deliver a report to `POST {api_url}/grading/{user_uuid}`, retrying
    /// with backoff on failure.
    async fn deliver(&self, user_uuid: &str, report: &GradeReport) -> Result<(), GraderError> {
        let url = format!(
            "{}/grading/{}",
            self.config.api_url.trim_end_matches('/'),
            user_uuid
        );

        let mut attempt: u8 = 0;
        loop {
            match self.try_deliver(&url, report).await {
                Ok(()) => {
                    info!(
                        submission_id = report.submission_id,
                        passed = report.passed,
                        "Delivered grading result"
                    );
                    return Ok(());
                }
                Err(e) if attempt < self.config.delivery_retries => {
                    attempt += 1;
                    let delay = calculate_backoff(
                        attempt,
                        self.config.delivery_base_delay_ms,
                        self.config.delivery_max_delay_ms,
                    );
                    warn!(
                        submission_id = report.submission_id,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying result delivery"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_deliver(&self, url: &str, report: &GradeReport) -> Result<(), GraderError> {
        let response = self
            .client
            .post(url)
            .json(report)
            .send()
            .await
            .map_err(|e| GraderError::Delivery(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GraderError::Delivery(format!(
                "Callback returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
