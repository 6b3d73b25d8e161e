//! e3 - inspect the e3 module catalog and installed e3 environments

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use e3_core::catalog::{CatalogClient, CatalogConfig, GitlabClient};
use e3_core::env::EnvConfig;

mod env_cli;
mod group_cli;
mod module_cli;
mod outcome;

use outcome::{Outcome, EXIT_FAILURE};

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "e3",
    about = "Inspect the e3 module catalog and installed e3 environments",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Catalog configuration file (defaults to ~/.config/e3/config.yaml)
    #[clap(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
enum Command {
    /// e3 GitLab group commands
    Group(group_cli::GroupCommand),

    /// e3 GitLab module commands
    Module(module_cli::ModuleCommand),

    /// e3 environment commands
    Env(env_cli::EnvCommand),
}

/// Initialize tracing from the --log-level flag
///
/// Logs always go to stderr so command output on stdout stays clean.
fn initialize_tracing(log_level: &LogLevel) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level.to_filter_directive()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        // Usage errors share the generic failure code; help and version exit 0
        if e.use_stderr() {
            let _ = e.print();
            std::process::exit(EXIT_FAILURE);
        }
        e.exit()
    });

    initialize_tracing(&cli.log_level);

    let code = match run(cli).await {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            debug!("Command failed: {:?}", e);
            eprintln!("Error: {e:#}");
            EXIT_FAILURE
        }
    };

    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<Outcome> {
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    match cli.command {
        Command::Group(command) => {
            let (config, client) = connect(cli.config.as_deref())?;
            command.execute(&client, &config, &mut stdout, &mut stderr).await
        }
        Command::Module(command) => {
            let (config, client) = connect(cli.config.as_deref())?;
            command.execute(&client, &config, &mut stdout, &mut stderr).await
        }
        Command::Env(command) => {
            let config = EnvConfig::from_env()?;
            command.execute(&config, &mut stdout, &mut stderr)
        }
    }
}

/// Load catalog configuration and build the GitLab client
fn connect(config_path: Option<&Path>) -> Result<(CatalogConfig, GitlabClient)> {
    let config = CatalogConfig::load(config_path)?;
    let client = GitlabClient::new(&config)?;
    debug!(
        "Using '{}' catalog at {} (root group {})",
        client.name(),
        config.url,
        config.group_id
    );
    Ok((config, client))
}
