//! tnsgen - tensor artifact front end
//!
//! Usage:
//!   tnsgen gentensor A 4,4 d,s                 # write A.tns here
//!   tnsgen gentensor A 4,4 d,s --seed 7        # reproducible nonzeros
//!   tnsgen gentensor A 4,4,8 d,s,g --out ./t   # choose the output directory
//!   tnsgen evaluate "<expression>" "<schedule>" # accepted, not implemented
//!
//! Dimension specs are comma-separated positive extents; format specs are
//! comma-separated tokens from {s,d,c,g}, positionally aligned with the
//! extents. Every failure, argument errors included, exits with code 1.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

/// tnsgen - generate packed tensor artifacts for tensor-algebra tooling
#[derive(Debug, Parser)]
#[command(name = "tnsgen")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a random tensor and write it as <NAME>.tns
    Gentensor {
        /// Tensor identifier; names the output file
        #[arg(value_name = "NAME")]
        name: String,

        /// Comma-separated positive extents, e.g. "4,4,8"
        #[arg(value_name = "DIMS")]
        dims: String,

        /// Comma-separated mode format tokens from {s,d,c,g}, e.g. "d,s,g"
        #[arg(value_name = "FORMATS")]
        formats: String,

        /// Random seed; identical seeds reproduce identical tensors
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Keep probability per coordinate for sparse/compressed modes
        #[arg(long, default_value_t = 0.05)]
        density: f64,

        /// Directory the artifact is written into
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Evaluate a tensor-algebra expression under a schedule (not implemented)
    Evaluate {
        /// Tensor-algebra expression, e.g. "a(i) = B(i,j) * c(j)"
        #[arg(value_name = "EXPRESSION")]
        expression: String,

        /// Schedule directives applied to the expression
        #[arg(value_name = "SCHEDULE")]
        schedule: String,
    },
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Gentensor {
            name,
            dims,
            formats,
            seed,
            density,
            out,
        } => commands::gentensor::run(&name, &dims, &formats, seed, density, &out),
        Commands::Evaluate {
            expression,
            schedule,
        } => commands::evaluate::run(&expression, &schedule),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Single outcome per command, mapped to an exit code here; command
    // bodies return Results instead of exiting early. Argument errors exit
    // with code 1 (not clap's default 2); --help and --version exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
