use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::error::HardMoneyError;
use crate::types::{AnalysisReport, Deal, Money, Rate, UiMode};
use crate::underwriting::engine::underwrite;
use crate::underwriting::pricing;
use crate::underwriting::verdict::SummarySource;
use crate::HardMoneyResult;

const APR_WARNING: &str = "Hard money loans are priced for speed, not forgiveness. \
     Extensions and defaults dramatically increase effective cost of capital.";

/// Rate bump applied when a hard-money note goes into default.
const DEFAULT_RATE_BUMP: Decimal = dec!(5.0);

#[derive(Debug, Clone, Serialize)]
pub struct BaseCosts {
    pub interest_paid: Money,
    pub points_cost: Money,
    pub total_financing_cost: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtensionRisk {
    pub monthly_interest: Money,
    #[serde(rename = "3_month_extension")]
    pub three_month_extension: Money,
    #[serde(rename = "6_month_extension")]
    pub six_month_extension: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct DefaultRisk {
    pub default_rate: Rate,
    pub monthly_interest_at_default: Money,
    #[serde(rename = "90_day_default_cost")]
    pub ninety_day_default_cost: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct AprRisk {
    pub headline_apr: Rate,
    pub base_costs: BaseCosts,
    pub extension_risk: ExtensionRisk,
    pub default_risk: DefaultRisk,
    pub warning: &'static str,
}

/// Effective APR over the full term (interest plus points, annualized
/// over the term length), with extension and default-rate carry costs.
pub fn apr_and_default_risk(
    deal: &Deal,
    summaries: &dyn SummarySource,
) -> HardMoneyResult<AnalysisReport<AprRisk>> {
    let base = underwrite(deal, summaries);

    let loan = base.terms.loan_amount;
    let rate = base.terms.interest_rate;
    let points = base.terms.points;
    let term = base.terms.loan_term_months;

    if loan.is_zero() || rate.is_zero() || term == 0 {
        return Err(HardMoneyError::missing("loan terms"));
    }

    let years = Decimal::from(term) / dec!(12);
    let interest_paid = loan * (rate / dec!(100)) * years;
    let points_cost = loan * (points / dec!(100));

    let effective_apr = (interest_paid + points_cost) / loan / years * dec!(100);

    let monthly = pricing::monthly_interest(loan, rate);
    let extension_3mo = monthly * dec!(3);
    let extension_6mo = monthly * dec!(6);

    let default_rate = rate + DEFAULT_RATE_BUMP;
    let default_monthly = pricing::monthly_interest(loan, default_rate);
    let default_90_day_cost = default_monthly * dec!(3);

    Ok(AnalysisReport::new(
        UiMode::CardAprRisk,
        AprRisk {
            headline_apr: effective_apr.round_dp(2),
            base_costs: BaseCosts {
                interest_paid: interest_paid.round_dp(2),
                points_cost: points_cost.round_dp(2),
                total_financing_cost: (interest_paid + points_cost).round_dp(2),
            },
            extension_risk: ExtensionRisk {
                monthly_interest: monthly.round_dp(2),
                three_month_extension: extension_3mo.round_dp(2),
                six_month_extension: extension_6mo.round_dp(2),
            },
            default_risk: DefaultRisk {
                default_rate: default_rate.round_dp(2),
                monthly_interest_at_default: default_monthly.round_dp(2),
                ninety_day_default_cost: default_90_day_cost.round_dp(2),
            },
            warning: APR_WARNING,
        },
    ))
}
