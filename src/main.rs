//! # Main — CLI Entry Point
//!
//! Parses arguments, sets up logging and configuration, and hands off to the
//! subcommand runners in `cli.rs`.
//!
//! ## Subcommands
//!
//! - `find <N>`: primitive elements of the field of order N (`--first` for
//!   the smallest one only, `--modulus` to pick the defining polynomial).
//! - `repl`: read orders from stdin until `quit`.
//! - `inspect <N>`: classification and group facts without the search.
//!
//! ## Global Options
//!
//! - `--config` / `GFPRIM_CONFIG`: TOML file with a `[search]` table.
//! - `--max-order` / `GFPRIM_MAX_ORDER`: refuse fields larger than this.
//! - `--mr-rounds` / `GFPRIM_MR_ROUNDS`: Miller–Rabin rounds.
//! - `--check` / `GFPRIM_CHECK`: `factored` (default) or `exhaustive`.
//! - `--json`: machine-readable output.
//!
//! `LOG_FORMAT=json` switches logs to JSON lines; `RUST_LOG` sets the filter.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gfprim::OrderCheck;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(
    name = "gfprim",
    about = "Find the primitive elements of a finite field GF(p) or GF(p^k)"
)]
struct Cli {
    /// TOML config file with a [search] table
    #[arg(long, env = "GFPRIM_CONFIG")]
    config: Option<PathBuf>,

    /// Largest field order p^k to search (default: 1000000)
    #[arg(long, env = "GFPRIM_MAX_ORDER")]
    max_order: Option<u64>,

    /// Miller-Rabin rounds used to classify the input (default: 25)
    #[arg(long, env = "GFPRIM_MR_ROUNDS")]
    mr_rounds: Option<u32>,

    /// Order check: "factored" (prime divisors of q-1) or "exhaustive" (every exponent)
    #[arg(long, env = "GFPRIM_CHECK")]
    check: Option<OrderCheck>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the primitive elements of the field of order N
    Find {
        /// Field order: a prime p or a prime power p^k
        #[arg(allow_negative_numbers = true)]
        n: String,
        /// Only report the first primitive element
        #[arg(long)]
        first: bool,
        /// Defining polynomial for GF(p^k), comma-separated coefficients, constant term first
        #[arg(long)]
        modulus: Option<String>,
    },
    /// Read field orders from stdin until "quit"
    Repl {
        /// Only report the first primitive element
        #[arg(long)]
        first: bool,
    },
    /// Show the field's classification and group order without searching
    Inspect {
        /// Field order: a prime p or a prime power p^k
        #[arg(allow_negative_numbers = true)]
        n: String,
        /// Defining polynomial for GF(p^k), comma-separated coefficients, constant term first
        #[arg(long)]
        modulus: Option<String>,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();

    match &cli.command {
        Commands::Find { n, first, modulus } => {
            let config = cli::resolve_config(&cli, *first, modulus.as_deref())?;
            cli::run_find(n, &config, cli.json)
        }
        Commands::Repl { first } => {
            let config = cli::resolve_config(&cli, *first, None)?;
            cli::run_repl(&config, cli.json)
        }
        Commands::Inspect { n, modulus } => {
            let config = cli::resolve_config(&cli, false, modulus.as_deref())?;
            cli::run_inspect(n, &config, cli.json)
        }
    }
}
