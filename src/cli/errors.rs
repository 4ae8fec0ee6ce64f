//! CLI-specific error types
//!
//! All CLI errors are fatal: they are printed to stderr and the process exits
//! non-zero.

use std::io;

use thiserror::Error;

use crate::seed::SeedError;
use crate::store::StoreError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error("QUIZ_CLI_CONFIG_ERROR: {0}")]
    Config(String),

    #[error("QUIZ_CLI_IO_ERROR: {0}")]
    Io(String),

    #[error("QUIZ_CLI_STORE_ERROR: {0}")]
    Store(#[from] StoreError),

    #[error("QUIZ_CLI_SEED_ERROR: {0}")]
    Seed(#[from] SeedError),

    #[error("QUIZ_CLI_BOOT_FAILED: {0}")]
    BootFailed(String),
}

impl CliError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::BootFailed(msg.into())
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        match self {
            Self::Config(_) => "QUIZ_CLI_CONFIG_ERROR",
            Self::Io(_) => "QUIZ_CLI_IO_ERROR",
            Self::Store(_) => "QUIZ_CLI_STORE_ERROR",
            Self::Seed(_) => "QUIZ_CLI_SEED_ERROR",
            Self::BootFailed(_) => "QUIZ_CLI_BOOT_FAILED",
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::Io(format!("JSON error: {}", e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
