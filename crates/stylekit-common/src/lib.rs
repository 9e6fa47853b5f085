//! # StyleKit Common
//!
//! Configuration and logging setup shared by the StyleKit crates.

use thiserror::Error;

pub mod config;
pub mod logging;

pub use config::StyleConfig;
pub use logging::{init_logging, LogConfig, LogFormat};

/// Errors raised while setting up the shared infrastructure.
#[derive(Error, Debug)]
pub enum CommonError {
    /// The configuration document could not be read.
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    /// A log filter directive was rejected.
    #[error("Invalid log filter '{filter}': {message}")]
    LogFilter { filter: String, message: String },

    /// A global subscriber is already installed.
    #[error("Logging already initialized: {0}")]
    LoggingInitialized(String),
}

/// Result type alias for the shared infrastructure.
pub type Result<T> = std::result::Result<T, CommonError>;
