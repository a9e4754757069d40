use async_trait::async_trait;
use common::GradeOutcome;
use tokio::process::Command;
use tracing::debug;

use crate::config::RunnerConfig;
use crate::error::GraderError;

/// Executes a submission against its test code.
///
/// The worker loop only knows this seam; tests substitute a canned
/// implementation so the pipeline is checkable without spawning processes.
#[async_trait]
pub trait CodeRunner: Send + Sync {
    async fn run(&self, code: &str, test_code: &str) -> crate::error::Result<GradeOutcome>;
}

/// Runs the configured command with the submission and test file paths
/// appended as the final two arguments.
///
/// The verdict is structured: exit status decides `passed`, and the combined
/// output becomes the feedback text. Consumers that still speak the legacy
/// leading-`.` convention get the explicit `passed` flag alongside the raw
/// text, so nothing needs to parse runner output here.
pub struct CommandRunner {
    config: RunnerConfig,
}

impl CommandRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CodeRunner for CommandRunner {
    async fn run(&self, code: &str, test_code: &str) -> crate::error::Result<GradeOutcome> {
        let dir = tempfile::tempdir()
            .map_err(|e| GraderError::Runner(format!("Failed to create scratch dir: {e}")))?;

        let code_path = dir.path().join("submission.py");
        let test_path = dir.path().join("tests.py");
        tokio::fs::write(&code_path, code)
            .await
            .map_err(|e| GraderError::Runner(format!("Failed to write submission: {e}")))?;
        tokio::fs::write(&test_path, test_code)
            .await
            .map_err(|e| GraderError::Runner(format!("Failed to write tests: {e}")))?;

        debug!(command = %self.config.command, "Running submission");

        let output = Command::new(&self.config.command)
            .args(&self.config.args)
            .arg(&code_path)
            .arg(&test_path)
            .current_dir(dir.path())
            .output()
            .await
            .map_err(|e| {
                GraderError::Runner(format!("Failed to run {}: {e}", self.config.command))
            })?;

        let mut details = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            if !details.is_empty() {
                details.push('\n');
            }
            details.push_str(&stderr);
        }

        Ok(GradeOutcome {
            passed: output.status.success(),
            details,
        })
    }
}
