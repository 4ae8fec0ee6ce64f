//! Configuration file
//!
//! ```json
//! {
//!   "data_dir": "./quiz-data",
//!   "seed_file": "./questions.json",
//!   "log_filter": "info",
//!   "server": { "host": "127.0.0.1", "port": 5000, "cors_origins": [] }
//! }
//! ```
//!
//! Every field is optional. Without `data_dir` the question bank lives in
//! memory only, which `start` accepts and `init` rejects.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::http_server::HttpServerConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the durable record file
    #[serde(default)]
    pub data_dir: Option<String>,

    /// JSON array of questions used instead of the built-in set
    #[serde(default)]
    pub seed_file: Option<String>,

    /// `tracing` filter directive (default "info")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(default)]
    pub server: HttpServerConfig,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            seed_file: None,
            log_filter: default_log_filter(),
            server: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load from `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> CliResult<()> {
        if self.server.host.trim().is_empty() {
            return Err(CliError::config_error("server.host must not be empty"));
        }

        if self.server.port == 0 {
            return Err(CliError::config_error("server.port must be > 0"));
        }

        if matches!(&self.data_dir, Some(dir) if dir.trim().is_empty()) {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> Option<&Path> {
        self.data_dir.as_deref().map(Path::new)
    }

    pub fn seed_path(&self) -> Option<&Path> {
        self.seed_file.as_deref().map(Path::new)
    }
}
