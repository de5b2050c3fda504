//! CLI command implementations

mod evaluate;
mod ingest;
mod init;
mod models;
mod pipeline;
mod preprocess;
mod promote;
mod serve;
mod train;
mod validate;

use crate::cli::args::{Cli, Command};
use crate::cli::LogLevel;

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let log_level = if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    };

    match cli.command {
        Command::Init(args) => init::run_init(args, log_level),
        Command::Ingest(args) => ingest::run_ingest(args, log_level),
        Command::Preprocess(args) => preprocess::run_preprocess(args, log_level),
        Command::Train(args) => train::run_train(args, log_level),
        Command::Evaluate(args) => evaluate::run_evaluate(args, log_level),
        Command::Pipeline(args) => pipeline::run_pipeline_command(args, log_level),
        Command::Models(args) => models::run_models(args, log_level),
        Command::Promote(args) => promote::run_promote(args, log_level),
        Command::Serve(args) => serve::run_serve(args, log_level),
        Command::Validate(args) => validate::run_validate(args, log_level),
    }
}
