//! CLI command implementations
//!
//! Boot sequence shared by every command:
//! 1. Configuration load
//! 2. Store open (replays and verifies the record file)
//! 3. Seeding (no-op when the store already holds questions)
//!
//! `start` then hands the store to the HTTP server.

use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tracing::info;

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::write_response;
use crate::http_server::HttpServer;
use crate::logging;
use crate::seed::{load_seed_file, reference_questions, seed_if_empty, SeedOutcome};
use crate::service::QuizService;
use crate::store::{FileQuestionStore, InMemoryQuestionStore, QuestionStore};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(config.as_deref()),
        Command::Start { config, port } => start(config.as_deref(), port),
    }
}

/// Open the store and seed it, then report what happened.
///
/// Requires `data_dir`: an in-memory bank would be discarded on exit.
pub fn init(config_path: Option<&Path>) -> CliResult<()> {
    let config = Config::load_or_default(config_path)?;
    if config.data_dir.is_none() {
        return Err(CliError::config_error(
            "init requires data_dir; an in-memory question bank is discarded on exit",
        ));
    }
    logging::init(&config.log_filter);

    let (store, outcome) = boot(&config)?;
    let (seeded, already_seeded) = match outcome {
        SeedOutcome::Seeded(n) => (n, false),
        SeedOutcome::AlreadySeeded(_) => (0, true),
    };

    write_response(json!({
        "initialized": true,
        "seeded": seeded,
        "already_seeded": already_seeded,
        "total": store.len()?,
    }))
}

/// Boot, seed if needed, and serve the HTTP API until Ctrl-C
pub fn start(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    let mut config = Config::load_or_default(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }
    logging::init(&config.log_filter);

    let (store, _) = boot(&config)?;
    let service = Arc::new(QuizService::new(store));
    let server = HttpServer::with_config(config.server.clone(), service);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Open the configured store and run seeding.
pub fn boot(config: &Config) -> CliResult<(Arc<dyn QuestionStore>, SeedOutcome)> {
    let store = open_store(config)?;

    let questions = match config.seed_path() {
        Some(path) => load_seed_file(path)?,
        None => reference_questions(),
    };
    let outcome = seed_if_empty(store.as_ref(), questions)?;

    Ok((store, outcome))
}

/// File-backed store when `data_dir` is set, in-memory otherwise
pub fn open_store(config: &Config) -> CliResult<Arc<dyn QuestionStore>> {
    match config.data_path() {
        Some(data_dir) => {
            let store = FileQuestionStore::open(data_dir)?;
            info!(
                path = %store.path().display(),
                questions = store.len()?,
                "opened question store"
            );
            Ok(Arc::new(store))
        }
        None => {
            info!("using in-memory question store");
            Ok(Arc::new(InMemoryQuestionStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_boot_in_memory_seeds_reference_set() {
        let (store, outcome) = boot(&Config::default()).unwrap();
        assert_eq!(outcome, SeedOutcome::Seeded(3));
        assert_eq!(store.len().unwrap(), 3);
    }

    #[test]
    fn test_boot_twice_on_same_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: Some(temp_dir.path().to_string_lossy().into_owned()),
            ..Default::default()
        };

        let (_, first) = boot(&config).unwrap();
        let (store, second) = boot(&config).unwrap();

        assert_eq!(first, SeedOutcome::Seeded(3));
        assert_eq!(second, SeedOutcome::AlreadySeeded(3));
        assert_eq!(store.len().unwrap(), 3);
    }

    #[test]
    fn test_boot_uses_seed_file() {
        let temp_dir = TempDir::new().unwrap();
        let seed_path = temp_dir.path().join("seed.json");
        fs::write(
            &seed_path,
            r#"[{"question": "Largest ocean?", "options": ["Atlantic", "Pacific"], "answer": "Pacific"}]"#,
        )
        .unwrap();

        let config = Config {
            seed_file: Some(seed_path.to_string_lossy().into_owned()),
            ..Default::default()
        };

        let (store, outcome) = boot(&config).unwrap();
        assert_eq!(outcome, SeedOutcome::Seeded(1));
        assert_eq!(store.list_all().unwrap()[0].answer, "Pacific");
    }

    #[test]
    fn test_boot_reports_missing_seed_file() {
        let config = Config {
            seed_file: Some("/nonexistent/seed.json".to_string()),
            ..Default::default()
        };

        assert!(matches!(boot(&config), Err(CliError::Seed(_))));
    }

    #[test]
    fn test_init_requires_data_dir() {
        assert!(matches!(init(None), Err(CliError::Config(_))));

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("quiz.json");
        fs::write(&config_path, r#"{"log_filter": "warn"}"#).unwrap();

        match init(Some(&config_path)) {
            Err(CliError::Config(msg)) => assert!(msg.contains("data_dir")),
            other => panic!("expected config error, got {:?}", other),
        }
    }
}
