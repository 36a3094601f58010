//! Geni CLI
//!
//! Synthesizes typed TypeScript functions from a task file and runs them:
//! - `geni synthesize <task>` finds or generates a passing function and prints it
//! - `geni run <task> --args '[...]'` synthesizes, then calls it once
//! - `geni config` prints the effective configuration

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use geni_kernel::{Geni, GeniConfig};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod config;

/// Geni CLI application
#[derive(Debug, Parser)]
#[command(name = "geni")]
#[command(about = "Geni - synthesize typed, tested functions with an LLM", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "GENI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding generated attempts
    #[arg(long, env = "GENI_CACHE_ROOT")]
    pub cache_root: Option<PathBuf>,

    /// LLM generations allowed per synthesis
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Per-test timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find or generate a function for a task and print its source
    Synthesize {
        /// Task file (JSON, or TOML with a .toml extension)
        task: PathBuf,
    },

    /// Synthesize a task's function, then call it
    Run {
        /// Task file (JSON, or TOML with a .toml extension)
        task: PathBuf,

        /// Arguments as a JSON array, one element per input
        #[arg(short, long, default_value = "[]")]
        args: String,
    },

    /// Show the effective configuration
    Config,
}

impl Cli {
    /// Overlay command-line flags onto a loaded configuration.
    pub fn apply_overrides(&self, config: &mut GeniConfig) {
        if let Some(cache_root) = &self.cache_root {
            config.cache_root = cache_root.clone();
        }
        if let Some(max_attempts) = self.max_attempts {
            config.max_attempts = max_attempts;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.test_timeout_ms = timeout_ms;
        }
    }
}

/// Run using the current process arguments.
pub async fn run() -> anyhow::Result<()> {
    run_with_args(std::env::args_os()).await
}

/// Run using the provided argument iterator.
pub async fn run_with_args<I, T>(args: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    let mut config = config::load(cli.config.as_deref())?;
    config::apply_api_key(&mut config, |name| std::env::var(name).ok());
    cli.apply_overrides(&mut config);

    match &cli.command {
        Commands::Synthesize { task } => {
            let task = config::load_task(task)?;
            let geni = Geni::from_config(config)?;
            let function = geni.synthesize(&task).await?;
            info!(fingerprint = %function.fingerprint(), "Function ready");
            println!("{}", function.source());
            Ok(())
        }
        Commands::Run { task, args } => {
            let args: Vec<Value> =
                serde_json::from_str(args).context("--args must be a JSON array")?;
            let task = config::load_task(task)?;
            let geni = Geni::from_config(config)?;
            let function = geni.synthesize(&task).await?;
            let result = function.call(&args).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Commands::Config => {
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}
