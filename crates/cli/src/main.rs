//! CPU Model Report CLI
//!
//! Reads a Kubernetes node list and reports, for every CPU model advertised
//! by KubeVirt's node labeller, how many nodes can run it and how many
//! report it as their host model.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{inspect, report};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{Overrides, Settings};

/// CPU Model Report CLI
#[derive(Parser)]
#[command(name = "cpu-models")]
#[command(author, version, about = "CPU model compatibility report for KubeVirt nodes", long_about = None)]
pub struct Cli {
    /// Read the node list from a file instead of stdin
    #[arg(long, short, global = true)]
    pub input: Option<PathBuf>,

    /// Output format
    #[arg(long, short, global = true)]
    pub format: Option<output::OutputFormat>,

    /// Which nodes count toward the total
    #[arg(long, global = true, value_parser = ["all", "allocatable"])]
    pub eligibility: Option<String>,

    /// Resource a node must have allocatable when eligibility is `allocatable`
    #[arg(long, global = true)]
    pub resource: Option<String>,

    /// How to treat CPU model labels with an empty model name
    #[arg(long, global = true, value_parser = ["reject", "skip"])]
    pub empty_model_names: Option<String>,

    /// Path to config file (defaults to ~/.config/cpu-models/config.toml)
    #[arg(long, global = true, env = "CPU_MODELS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
pub enum Commands {
    /// Rank CPU models by node support (default)
    Report,

    /// Show CPU model labels and eligibility per node
    Inspect,
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries the report
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn run(cli: Cli) -> Result<()> {
    let overrides = Overrides {
        config_file: cli.config.clone(),
        ..Default::default()
    }
    .set("format", cli.format.map(|f| f.as_str()))
    .set("eligibility", cli.eligibility)
    .set("resource_name", cli.resource)
    .set("empty_model_names", cli.empty_model_names);

    let settings = Settings::load(&overrides)?;
    let aggregator = settings.aggregator()?;
    let nodes = commands::load_nodes(cli.input.as_deref())?;

    let out = match cli.command.unwrap_or(Commands::Report) {
        Commands::Report => report::run(&aggregator, &nodes, settings.format)?,
        Commands::Inspect => inspect::run(&aggregator, &nodes, settings.format)?,
    };
    print!("{}", out);

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_error(&format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
