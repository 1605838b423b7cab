use serde_json::Value;

use hardmoney_core::scenarios::{
    apr_and_default_risk, cash_to_close, hold_time_sensitivity, refi_dscr, stress_test, worst_case,
};
use hardmoney_core::types::Deal;
use hardmoney_core::underwriting::RandomSummaries;

use super::underwrite::DealArgs;

fn strict_deal(args: &DealArgs) -> Result<Deal, Box<dyn std::error::Error>> {
    let raw = args.resolve()?;
    Ok(Deal::from_raw(&raw)?)
}

pub fn run_stress_test(args: DealArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal = strict_deal(&args)?;
    Ok(serde_json::to_value(stress_test(&deal, &RandomSummaries))?)
}

pub fn run_worst_case(args: DealArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal = strict_deal(&args)?;
    Ok(serde_json::to_value(worst_case(&deal, &RandomSummaries))?)
}

pub fn run_hold_sensitivity(args: DealArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal = strict_deal(&args)?;
    Ok(serde_json::to_value(hold_time_sensitivity(
        &deal,
        &RandomSummaries,
    ))?)
}

pub fn run_apr_risk(args: DealArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal = strict_deal(&args)?;
    let report = apr_and_default_risk(&deal, &RandomSummaries)?;
    Ok(serde_json::to_value(report)?)
}

pub fn run_cash_to_close(args: DealArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal = strict_deal(&args)?;
    Ok(serde_json::to_value(cash_to_close(&deal, &RandomSummaries))?)
}

/// DSCR refinance works from the raw deal: missing rent or city comes
/// back as a chat prompt payload rather than an error.
pub fn run_refi_dscr(args: DealArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = args.resolve()?;
    let outcome = refi_dscr(&raw)?;
    Ok(serde_json::to_value(outcome)?)
}
