use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraderError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Runner error: {0}")]
    Runner(String),

    #[error("Delivery error: {0}")]
    Delivery(String),
}

pub type Result<T> = std::result::Result<T, GraderError>;
