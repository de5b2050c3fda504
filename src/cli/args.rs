//! CLI argument tree

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::registry::Stage;

/// Fiar: credit-default prediction pipeline
#[derive(Parser, Debug, Clone)]
#[command(name = "fiar")]
#[command(version)]
#[command(about = "Credit-default prediction pipeline: preprocess, train, evaluate, promote, serve")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Initialize the workspace layout for an environment
    Init(EnvArgs),

    /// Register a raw dataset as a versioned data asset
    Ingest(IngestArgs),

    /// Run the preprocess stage (clean, engineer, scale, split)
    Preprocess(PreprocessArgs),

    /// Run the train stage (model selection over the persisted splits)
    Train(StageArgs),

    /// Run the evaluate stage (threshold tuning and report artifacts)
    Evaluate(StageArgs),

    /// Run the full pipeline under a tracked run
    Pipeline(PipelineArgs),

    /// List registered versions of a model
    Models(ModelsArgs),

    /// Promote a model version to the next environment
    Promote(PromoteArgs),

    /// Serve a registered model as a scoring endpoint
    Serve(ServeArgs),

    /// Validate a configuration file without running anything
    Validate(ValidateArgs),
}

/// Arguments shared by environment-scoped commands
#[derive(Parser, Debug, Clone)]
pub struct EnvArgs {
    /// Path to the configuration file
    #[arg(short, long, default_value = "fiar.yaml")]
    pub config: PathBuf,

    /// Target environment
    #[arg(long, default_value = "dev")]
    pub env: Stage,
}

/// Arguments for the ingest command
#[derive(Parser, Debug, Clone)]
pub struct IngestArgs {
    /// Path to the configuration file
    #[arg(short, long, default_value = "fiar.yaml")]
    pub config: PathBuf,

    /// Target environment
    #[arg(long, default_value = "dev")]
    pub env: Stage,

    /// Dataset file to register (defaults to pipeline.input_data)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Asset name
    #[arg(long, default_value = "credit_default_data")]
    pub name: String,
}

/// Arguments for the preprocess command
#[derive(Parser, Debug, Clone)]
pub struct PreprocessArgs {
    /// Path to the configuration file
    #[arg(short, long, default_value = "fiar.yaml")]
    pub config: PathBuf,

    /// Override the raw dataset path
    #[arg(long)]
    pub input_data: Option<PathBuf>,

    /// Override the artifact output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for the train and evaluate commands
#[derive(Parser, Debug, Clone)]
pub struct StageArgs {
    /// Path to the configuration file
    #[arg(short, long, default_value = "fiar.yaml")]
    pub config: PathBuf,

    /// Override the artifact output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Override the random seed
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for the pipeline command
#[derive(Parser, Debug, Clone)]
pub struct PipelineArgs {
    /// Path to the configuration file
    #[arg(short, long, default_value = "fiar.yaml")]
    pub config: PathBuf,

    /// Target environment (tracking and optional registration)
    #[arg(long, default_value = "dev")]
    pub env: Stage,

    /// Register the trained bundle into the environment's model registry
    #[arg(long)]
    pub register: bool,
}

/// Arguments for the models command
#[derive(Parser, Debug, Clone)]
pub struct ModelsArgs {
    /// Path to the configuration file
    #[arg(short, long, default_value = "fiar.yaml")]
    pub config: PathBuf,

    /// Target environment
    #[arg(long, default_value = "dev")]
    pub env: Stage,

    /// Model name (defaults to pipeline.model_name)
    #[arg(long)]
    pub name: Option<String>,
}

/// Arguments for the promote command
#[derive(Parser, Debug, Clone)]
pub struct PromoteArgs {
    /// Path to the configuration file
    #[arg(short, long, default_value = "fiar.yaml")]
    pub config: PathBuf,

    /// Source environment
    #[arg(long, default_value = "test")]
    pub from: Stage,

    /// Target environment
    #[arg(long, default_value = "prod")]
    pub to: Stage,

    /// Model name (defaults to pipeline.model_name)
    #[arg(long)]
    pub name: Option<String>,

    /// Version to promote (defaults to the source's highest version)
    #[arg(long)]
    pub version: Option<String>,
}

/// Arguments for the serve command
#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Path to the configuration file
    #[arg(short, long, default_value = "fiar.yaml")]
    pub config: PathBuf,

    /// Environment whose registry backs the endpoint
    #[arg(long, default_value = "dev")]
    pub env: Stage,

    /// Model name (defaults to pipeline.model_name)
    #[arg(long)]
    pub name: Option<String>,

    /// Model version (defaults to the latest registered)
    #[arg(long)]
    pub version: Option<String>,

    /// Override the bind address
    #[arg(long)]
    pub address: Option<String>,

    /// Override the deployed decision threshold
    #[arg(long)]
    pub threshold: Option<f64>,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    /// Path to the configuration file
    #[arg(value_name = "CONFIG", default_value = "fiar.yaml")]
    pub config: PathBuf,
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
