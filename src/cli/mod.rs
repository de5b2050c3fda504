//! CLI module
//!
//! Clap argument tree and command handlers.

mod args;
mod commands;
mod logging;

pub use args::{Cli, Command};
pub use commands::run_command;
pub use logging::LogLevel;
