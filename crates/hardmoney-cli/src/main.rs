mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::lenders::LenderArgs;
use commands::underwrite::DealArgs;

/// Hard-money deal underwriting and scenario analysis
#[derive(Parser)]
#[command(
    name = "hmu",
    version,
    about = "Hard-money deal underwriting and scenario analysis",
    long_about = "A CLI for underwriting short-term real estate loans with decimal \
                  precision. Prices fix & flip, ground-up, and cash-out refinance \
                  deals, and runs stress-test, worst-case, hold-time, APR, \
                  cash-to-close, and DSCR-refinance scenarios."
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
    /// Underwrite a deal end to end (terms, costs, profit, verdict)
    Underwrite(DealArgs),
    /// Re-run the deal under rehab and ARV shocks
    StressTest(DealArgs),
    /// Combined downside: ARV -10%, rehab +15%, 6-month extension
    WorstCase(DealArgs),
    /// Profit sensitivity to 4/6/9/12-month hold times
    HoldSensitivity(DealArgs),
    /// Effective APR plus extension and default carry costs
    AprRisk(DealArgs),
    /// Itemized out-of-pocket closing costs
    CashToClose(DealArgs),
    /// DSCR refinance feasibility from a rent proxy
    RefiDscr(DealArgs),
    /// Discover and grade local lenders from a directory file
    FindLenders(LenderArgs),
    /// Rank local lenders by reputation score
    CompareLenders(LenderArgs),
    /// Show the next unanswered intake question for a partial deal
    Intake(DealArgs),
    /// Derive the session title for a deal
    SessionTitle(DealArgs),
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

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Underwrite(args) => commands::underwrite::run_underwrite(args),
        Commands::StressTest(args) => commands::scenarios::run_stress_test(args),
        Commands::WorstCase(args) => commands::scenarios::run_worst_case(args),
        Commands::HoldSensitivity(args) => commands::scenarios::run_hold_sensitivity(args),
        Commands::AprRisk(args) => commands::scenarios::run_apr_risk(args),
        Commands::CashToClose(args) => commands::scenarios::run_cash_to_close(args),
        Commands::RefiDscr(args) => commands::scenarios::run_refi_dscr(args),
        Commands::FindLenders(args) => commands::lenders::run_find_lenders(args),
        Commands::CompareLenders(args) => commands::lenders::run_compare_lenders(args),
        Commands::Intake(args) => commands::intake::run_intake(args),
        Commands::SessionTitle(args) => commands::intake::run_session_title(args),
        Commands::Version => {
            println!("hmu {}", env!("CARGO_PKG_VERSION"));
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
