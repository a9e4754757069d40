use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Listener configuration for the enqueue endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Worker-loop configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct WorkerConfig {
    /// Base URL of the submission API receiving result callbacks.
    pub api_url: String,
    /// Sleep between queue polls when the queue is empty.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Callback delivery retries before a result is dropped.
    #[serde(default = "default_delivery_retries")]
    pub delivery_retries: u8,
    /// Base delay for delivery backoff.
    #[serde(default = "default_delivery_base_delay_ms")]
    pub delivery_base_delay_ms: u64,
    /// Delay cap for delivery backoff.
    #[serde(default = "default_delivery_max_delay_ms")]
    pub delivery_max_delay_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    1000
}
fn default_delivery_retries() -> u8 {
    3
}
fn default_delivery_base_delay_ms() -> u64 {
    500
}
fn default_delivery_max_delay_ms() -> u64 {
    10_000
}

/// Command used to execute a submission against its test code. The two file
/// paths (submission, tests) are appended as the final arguments.
#[derive(Debug, Deserialize, Clone)]
pub struct RunnerConfig {
    #[serde(default = "default_runner_command")]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_runner_command() -> String {
    "python3".into()
}

/// Grading service configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct GraderAppConfig {
    pub server: ServerConfig,
    pub worker: WorkerConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            command: default_runner_command(),
            args: vec![],
        }
    }
}

impl GraderAppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("GRADER_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 7000)?
            .set_default("worker.api_url", "http://localhost:7777")?
            .set_default("worker.poll_interval_ms", 1000_i64)?
            .set_default("worker.delivery_retries", 3_i64)?
            .set_default("worker.delivery_base_delay_ms", 500_i64)?
            .set_default("worker.delivery_max_delay_ms", 10_000_i64)?
            .set_default("runner.command", "python3")?
            .add_source(File::with_name(&config_path).required(false))
            .add_source(Environment::with_prefix("GRADER").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
