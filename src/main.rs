//! Fiar CLI
//!
//! Command-line entry point for the credit-default prediction pipeline.
//!
//! # Usage
//!
//! ```bash
//! # Validate configuration
//! fiar validate fiar.yaml
//!
//! # Register the raw dataset in the dev workspace
//! fiar ingest --env dev
//!
//! # Run the full pipeline and register the trained model
//! fiar pipeline --env dev --register
//!
//! # Promote the latest test model to prod
//! fiar promote --from test --to prod
//!
//! # Serve the latest prod model
//! fiar serve --env prod
//! ```

use clap::Parser;
use fiar::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
