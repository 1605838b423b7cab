use clap::Args;
use serde_json::Value;

use hardmoney_core::lenders::{compare_lenders, find_lenders, LenderRecord, LenderSearch};
use hardmoney_core::types::RawDeal;
use hardmoney_core::HardMoneyResult;

use crate::input;

/// Lender commands read the candidate pool from a JSON file (an array of
/// directory records) instead of a live search backend.
#[derive(Args)]
pub struct LenderArgs {
    /// Path to a JSON file with directory search results
    #[arg(long)]
    pub lenders: String,

    /// Property city
    #[arg(long)]
    pub city: Option<String>,

    /// Property state
    #[arg(long)]
    pub state: Option<String>,

    /// Loan program: fix_and_flip, ground_up, or cash_out_refi
    #[arg(long)]
    pub loan_program: Option<String>,
}

/// File-backed stand-in for the live directory search.
struct FileDirectory {
    records: Vec<LenderRecord>,
}

impl LenderSearch for FileDirectory {
    fn search(&self, _city: &str, _state: &str, limit: usize) -> HardMoneyResult<Vec<LenderRecord>> {
        Ok(self.records.iter().take(limit).cloned().collect())
    }
}

fn load(args: &LenderArgs) -> Result<(RawDeal, FileDirectory), Box<dyn std::error::Error>> {
    let records: Vec<LenderRecord> = input::file::read_json(&args.lenders)?;
    let raw = RawDeal {
        city: args.city.clone(),
        state: args.state.clone(),
        loan_program: args.loan_program.clone(),
        ..RawDeal::default()
    };
    Ok((raw, FileDirectory { records }))
}

pub fn run_find_lenders(args: LenderArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (raw, directory) = load(&args)?;
    let report = find_lenders(&raw, &directory)?;
    Ok(serde_json::to_value(report)?)
}

pub fn run_compare_lenders(args: LenderArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (raw, directory) = load(&args)?;
    let report = compare_lenders(&raw, &directory)?;
    Ok(serde_json::to_value(report)?)
}
