pub mod config;
pub mod error;
pub mod runner;
pub mod server;
pub mod worker;

pub use config::GraderAppConfig;
pub use error::{GraderError, Result};
pub use runner::{CodeRunner, CommandRunner};
pub use server::{GraderState, build_router};
pub use worker::WorkerLoop;
