// Copyright 2025 Oxide Computer Company

//! apicompat CLI
//!
//! Gate OpenAPI documents on backward compatibility.

use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use apicompat::{
    CompositeRule, Diagnostic, RuleKind,
    baseline::{self, Baseline, Outcome},
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "apicompat")]
#[command(about = "Detect backward-incompatible changes between OpenAPI documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check every document in a directory against its lock file
    Check(CheckArgs),
    /// Compare two documents
    Diff(DiffArgs),
}

#[derive(Debug, Args)]
struct RuleArgs {
    /// Do not run the named rule (may be repeated)
    #[arg(long = "skip-rule", value_name = "RULE")]
    skip_rules: Vec<RuleKind>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

impl RuleArgs {
    fn rules(&self) -> CompositeRule {
        CompositeRule::backward_compatibility().without(&self.skip_rules)
    }
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Directory containing the OpenAPI documents (*.yml, *.yaml, *.json)
    #[arg(long, default_value = "src/main/openapi")]
    source_dir: PathBuf,

    /// Directory containing the accepted baselines (*.lock)
    #[arg(long, default_value = "src/main/openapi")]
    lock_dir: PathBuf,

    /// Skip the check entirely
    #[arg(long)]
    skip: bool,

    #[command(flatten)]
    rules: RuleArgs,
}

#[derive(Debug, Args)]
struct DiffArgs {
    /// The previously accepted document
    old: PathBuf,

    /// The document to check
    new: PathBuf,

    #[command(flatten)]
    rules: RuleArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("apicompat=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check(args) => check(args),
        Command::Diff(args) => diff(args),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every group passed.
fn check(args: CheckArgs) -> Result<bool> {
    let baseline = Baseline {
        source_dir: args.source_dir,
        lock_dir: args.lock_dir,
        skip: args.skip,
    };
    let report = baseline.check(&args.rules.rules())?;

    match args.rules.format {
        Format::Text => {
            for (name, outcome) in &report.groups {
                println!("{name}: {outcome}");
                if let Outcome::Failed(diagnostics) = outcome {
                    for diagnostic in diagnostics {
                        println!("  {diagnostic}");
                    }
                }
            }
        }
        Format::Json => {
            let groups = report
                .groups
                .iter()
                .map(|(name, outcome)| {
                    let diagnostics: &[Diagnostic] = match outcome {
                        Outcome::Failed(diagnostics) => diagnostics.as_slice(),
                        _ => &[],
                    };
                    serde_json::json!({
                        "group": name,
                        "outcome": outcome.to_string(),
                        "success": outcome.is_success(),
                        "diagnostics": diagnostics,
                    })
                })
                .collect::<Vec<_>>();
            println!("{}", serde_json::to_string_pretty(&groups)?);
        }
    }

    Ok(report.is_success())
}

/// Returns whether the documents are compatible.
fn diff(args: DiffArgs) -> Result<bool> {
    let diagnostics = baseline::compare_files(&args.old, &args.new, &args.rules.rules())?;
    print_diagnostics(&diagnostics, args.rules.format)?;
    Ok(diagnostics.is_empty())
}

fn print_diagnostics(diagnostics: &[Diagnostic], format: Format) -> Result<()> {
    match format {
        Format::Text => {
            for diagnostic in diagnostics {
                println!("{diagnostic}");
            }
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(diagnostics)?),
    }
    Ok(())
}
