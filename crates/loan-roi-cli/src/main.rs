mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::advisor::{PromptArgs, RecommendArgs};
use commands::lending::{LoanArgs, PaymentArgs, StrategiesArgs};
use commands::portfolio::PortfolioArgs;

/// Rental property loan simulation and payoff planning
#[derive(Parser)]
#[command(
    name = "lroi",
    version,
    about = "Rental property loan simulation and payoff planning",
    long_about = "A CLI for simulating amortising property loans against the rent they \
                  finance, with decimal precision. Supports month-by-month simulation, \
                  borrowing capacity, duration comparison, payoff strategy search, \
                  rent-vesting projections and advisor prompts."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate the loan month by month with rent and appreciation
    Simulate(LoanArgs),
    /// Largest loan the income supports under the 37% debt ratio
    MaxLoan(LoanArgs),
    /// Compare 10, 15, 20 and 25 year durations
    Scenarios(LoanArgs),
    /// Search overdrive/injection combinations for payoff strategies
    Strategies(StrategiesArgs),
    /// Project a rent-vesting two-property portfolio
    Portfolio(PortfolioArgs),
    /// Rule-based recommendations for a simulated loan
    Recommend(RecommendArgs),
    /// Build the advisor prompt for a text-generation service
    Prompt(PromptArgs),
    /// Monthly annuity payment for a principal, rate and duration
    Payment(PaymentArgs),
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

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Simulate(args) => commands::lending::run_simulate(args),
        Commands::MaxLoan(args) => commands::lending::run_max_loan(args),
        Commands::Scenarios(args) => commands::lending::run_scenarios(args),
        Commands::Strategies(args) => commands::lending::run_strategies(args),
        Commands::Portfolio(args) => commands::portfolio::run_portfolio(args),
        Commands::Recommend(args) => commands::advisor::run_recommend(args),
        Commands::Prompt(args) => commands::advisor::run_prompt(args),
        Commands::Payment(args) => commands::lending::run_payment(args),
        Commands::Version => {
            println!("lroi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

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
