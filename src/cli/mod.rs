//! CLI module for quizd
//!
//! Provides command-line interface for:
//! - init: Open the store and seed it
//! - start: Boot, seed if needed, and serve the HTTP API

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{boot, init, open_store, run, run_command, start};
pub use config::Config;
pub use errors::{CliError, CliResult};
pub use io::write_response;
