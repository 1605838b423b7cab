use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{AnalysisReport, Deal, Money, UiMode};
use crate::underwriting::engine::underwrite;
use crate::underwriting::pricing;
use crate::underwriting::verdict::SummarySource;

const HOLD_WARNING: &str = "Each additional month materially impacts profit. \
     Timeline risk is the #1 killer of flip returns.";

const HOLD_PERIODS: [u32; 4] = [4, 6, 9, 12];

#[derive(Debug, Clone, Serialize)]
pub struct HoldScenario {
    pub hold_months: u32,
    pub interest_cost: Money,
    pub net_profit: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct HoldSensitivity {
    pub monthly_burn: Money,
    pub scenarios: Vec<HoldScenario>,
    pub warning: &'static str,
}

/// Profit sensitivity to hold time: for each candidate hold period,
/// interest carry at the base loan's terms is netted against the base
/// gross profit.
pub fn hold_time_sensitivity(deal: &Deal, summaries: &dyn SummarySource) -> AnalysisReport<HoldSensitivity> {
    let base = underwrite(deal, summaries);

    let monthly =
        pricing::monthly_interest(base.terms.loan_amount, base.terms.interest_rate);
    let base_profit = base.sale_and_profit.gross_profit;

    let scenarios = HOLD_PERIODS
        .iter()
        .map(|&months| {
            let interest = monthly * Decimal::from(months);
            HoldScenario {
                hold_months: months,
                interest_cost: interest.round_dp(2),
                net_profit: (base_profit - interest).round_dp(2),
            }
        })
        .collect();

    AnalysisReport::new(
        UiMode::CardHoldSensitivity,
        HoldSensitivity {
            monthly_burn: monthly.round_dp(2),
            scenarios,
            warning: HOLD_WARNING,
        },
    )
}
