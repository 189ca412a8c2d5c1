use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use rf_cli::session::Session;
use rf_cli::tracing_init::init_tracing;
use rf_cli::{cmd_check, cmd_fire, cmd_lint};

#[derive(Parser)]
#[command(name = "rulefire", about = "RuleFire business rules engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Path to rulefire.toml config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Rules file (.yaml/.yml/.json/.toml); overrides [rules] in the config
    #[arg(short, long)]
    rules: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fire the rules against a JSON facts file and print the resulting facts
    Fire {
        #[command(flatten)]
        source: SourceArgs,
        /// JSON object of initial facts
        #[arg(short, long)]
        facts: PathBuf,
        /// Keep firing until no rule matches
        #[arg(long)]
        inference: bool,
    },
    /// Report which rules match the facts without running any action
    Check {
        #[command(flatten)]
        source: SourceArgs,
        /// JSON object of facts
        #[arg(short, long)]
        facts: PathBuf,
    },
    /// Load and validate the rules, print them in firing order
    Lint {
        #[command(flatten)]
        source: SourceArgs,
    },
}

fn open(source: &SourceArgs) -> Result<Session> {
    Session::open(source.config.as_deref(), source.rules.as_deref())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let session = match &cli.command {
        Commands::Fire { source, .. }
        | Commands::Check { source, .. }
        | Commands::Lint { source } => open(source)?,
    };
    let _guard = init_tracing(&session.config.logging, &session.base_dir)?;
    rf_core::rf_debug!(
        sys,
        rules = %session.rules_path().display(),
        format = %session.rules.format,
        "session opened"
    );

    match cli.command {
        Commands::Fire {
            facts, inference, ..
        } => cmd_fire::run(&session, &facts, inference)?,
        Commands::Check { facts, .. } => cmd_check::run(&session, &facts)?,
        Commands::Lint { .. } => cmd_lint::run(&session)?,
    }

    Ok(())
}
