mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::loan::LoanArgs;
use commands::rate::RateArgs;
use commands::simulate::SimulateArgs;
use commands::Context;

/// Dealership loan simulator
#[derive(Parser)]
#[command(
    name = "credito",
    version,
    about = "Dealership loan simulator",
    long_about = "Simulates fixed-rate vehicle loans with decimal precision: monthly \
                  payment, total interest and amortization schedule, with the \
                  reference annual rate (TNA) fetched from public statistics APIs."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Rate provider configuration file (JSON or YAML)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Upper bound for the reference-rate fetch, in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Log more (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the monthly payment and totals of a loan
    Calc(LoanArgs),
    /// Print the month-by-month amortization schedule
    Schedule(LoanArgs),
    /// Fetch the reference annual rate (TNA)
    Rate(RateArgs),
    /// Fill in the simulator form interactively
    Simulate(SimulateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Version = cli.command {
        println!("credito {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> =
        Context::load(cli.config.as_deref(), cli.timeout_ms).and_then(|ctx| match cli.command {
            Commands::Calc(args) => commands::loan::run_calc(args, &ctx),
            Commands::Schedule(args) => commands::loan::run_schedule(args, &ctx),
            Commands::Rate(args) => commands::rate::run_rate(args, &ctx),
            Commands::Simulate(args) => commands::simulate::run_simulate(args, &ctx),
            Commands::Version => unreachable!("handled above"),
        });

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
