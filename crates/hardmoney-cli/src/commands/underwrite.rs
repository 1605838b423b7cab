use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use hardmoney_core::types::{AnalysisReport, RawDeal, UiMode};
use hardmoney_core::underwriting::{underwrite_raw, RandomSummaries};

use crate::input;

/// Deal input shared by every underwriting and scenario command. A JSON
/// file or piped stdin overrides the individual flags; monetary fields in
/// the file may be numbers or formatted strings like "$250,000".
#[derive(Args)]
pub struct DealArgs {
    /// Path to a JSON deal file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan program: fix_and_flip, ground_up, or cash_out_refi
    #[arg(long)]
    pub loan_program: Option<String>,

    /// Transaction type: purchase or refinance
    #[arg(long)]
    pub transaction_type: Option<String>,

    /// Purchase price (original price on a refinance)
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// After-repair value
    #[arg(long)]
    pub arv: Option<Decimal>,

    /// Rehab budget
    #[arg(long)]
    pub rehab_budget: Option<Decimal>,

    /// Current payoff balance on the property
    #[arg(long)]
    pub existing_loan_balance: Option<Decimal>,

    /// Cash available to cover interest during the project
    #[arg(long)]
    pub interest_reserves: Option<Decimal>,

    /// Monthly rent (for DSCR refinance)
    #[arg(long)]
    pub monthly_rent: Option<Decimal>,

    /// Flip count or tier name (beginner, intermediate, pro)
    #[arg(long)]
    pub experience: Option<String>,

    /// Property city
    #[arg(long)]
    pub city: Option<String>,

    /// Property state
    #[arg(long)]
    pub state: Option<String>,

    /// Property street address
    #[arg(long)]
    pub address: Option<String>,
}

impl DealArgs {
    /// Resolve the deal from file, stdin, or flags, in that order.
    pub fn resolve(&self) -> Result<RawDeal, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.input {
            return input::file::read_json(path);
        }
        if let Some(data) = input::stdin::read_stdin()? {
            return Ok(serde_json::from_value(data)?);
        }
        Ok(self.to_raw_deal())
    }

    fn to_raw_deal(&self) -> RawDeal {
        RawDeal {
            loan_program: self.loan_program.clone(),
            transaction_type: self.transaction_type.clone(),
            purchase_price: self.purchase_price.map(money_value),
            arv: self.arv.map(money_value),
            rehab_budget: self.rehab_budget.map(money_value),
            existing_loan_balance: self.existing_loan_balance.map(money_value),
            interest_reserves: self.interest_reserves.map(money_value),
            monthly_rent: self.monthly_rent.map(money_value),
            experience_level: self.experience.clone().map(Value::String),
            city: self.city.clone(),
            state: self.state.clone(),
            address: self.address.clone(),
            ..RawDeal::default()
        }
    }
}

// Decimal flags carry through as strings so the normalization layer
// treats CLI and wire input identically.
fn money_value(d: Decimal) -> Value {
    Value::String(d.to_string())
}

pub fn run_underwrite(args: DealArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = args.resolve()?;
    let analysis = underwrite_raw(&raw, &RandomSummaries)?;
    Ok(serde_json::to_value(AnalysisReport::new(
        UiMode::CardDeal,
        analysis,
    ))?)
}
