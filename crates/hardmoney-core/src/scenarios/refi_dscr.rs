use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::error::HardMoneyError;
use crate::normalize::{to_number, to_trimmed};
use crate::types::{AnalysisReport, ChatPrompt, LoanProgram, Money, RawDeal, UiMode};
use crate::underwriting::pricing;
use crate::HardMoneyResult;

/// DSCR leverage cap: 75% of ARV.
const DSCR_LTV_CAP: Decimal = dec!(0.75);
/// NOI proxy: 65% of gross rent covers vacancy, taxes, insurance, and
/// maintenance without a full operating statement.
const NOI_FACTOR: Decimal = dec!(0.65);
/// Estimated refinance closing costs: 2% of the new loan.
const REFI_CLOSING_COST_RATE: Decimal = dec!(0.02);

const DSCR_GUIDANCE: &str = "DSCR refinance assumes payoff of existing bridge loan. \
     Passing DSCR does not guarantee cash-out.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DscrStatus {
    Strong,
    Borderline,
    Weak,
    Unknown,
}

#[derive(Debug, Clone, Serialize)]
pub struct DscrAssumptions {
    pub ltv_cap: &'static str,
    pub noi_factor: &'static str,
    pub payment_type: &'static str,
    pub closing_costs: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DscrAnalysis {
    pub status: DscrStatus,
    pub dscr: Option<Decimal>,
    pub estimated_noi: Money,
    pub monthly_debt_service: Money,
    pub max_dscr_loan: Money,
    pub existing_loan_payoff: Money,
    pub cash_out: Money,
    pub short_to_close: Money,
    pub overleveraged: bool,
    pub assumptions: DscrAssumptions,
    pub guidance: &'static str,
}

/// Either the analysis card, or a conversational prompt for a missing
/// prerequisite (rent or city).
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RefiDscrOutcome {
    Prompt(ChatPrompt),
    Analysis(AnalysisReport<DscrAnalysis>),
}

/// DSCR refinance feasibility off a rent proxy.
///
/// Takes the raw deal rather than the strict form: the exit analysis
/// runs from deals that never went through full intake, so missing rent
/// or city turns into a chat prompt instead of an error. Only the
/// appraised value is hard-required.
pub fn refi_dscr(raw: &RawDeal) -> HardMoneyResult<RefiDscrOutcome> {
    let monthly_rent = to_number(raw.monthly_rent.as_ref()).filter(|r| *r > Decimal::ZERO);
    let Some(monthly_rent) = monthly_rent else {
        return Ok(RefiDscrOutcome::Prompt(ChatPrompt::new(
            "monthlyRent",
            "What is the monthly rent for the property?",
        )));
    };

    if to_trimmed(raw.city.as_ref()).is_none() {
        return Ok(RefiDscrOutcome::Prompt(ChatPrompt::new(
            "city",
            "What city is the property located in?",
        )));
    }

    let arv = to_number(raw.arv.as_ref())
        .filter(|a| *a > Decimal::ZERO)
        .ok_or_else(|| HardMoneyError::missing("arv"))?;

    let program = raw
        .loan_program
        .as_deref()
        .and_then(|p| p.parse::<LoanProgram>().ok())
        .unwrap_or(LoanProgram::CashOutRefi);

    let max_dscr_loan = arv * DSCR_LTV_CAP;

    // Payoff priority: the bridge loan from a prior full analysis wins
    // over a user-entered balance.
    let bridge_loan = raw
        .terms
        .as_ref()
        .and_then(|t| to_number(t.loan_amount.as_ref()))
        .filter(|b| *b > Decimal::ZERO);
    let existing_loan = bridge_loan
        .or_else(|| to_number(raw.existing_loan_balance.as_ref()))
        .unwrap_or(Decimal::ZERO);

    let interest_rate = pricing::rate_from_program(program);

    // Interest-only DSCR assumption.
    let monthly_debt = pricing::monthly_interest(max_dscr_loan, interest_rate);
    let noi = monthly_rent * NOI_FACTOR;

    let dscr = if monthly_debt > Decimal::ZERO {
        Some(noi / monthly_debt)
    } else {
        None
    };

    let refi_closing_costs = max_dscr_loan * REFI_CLOSING_COST_RATE;
    let net_refi_proceeds = max_dscr_loan - existing_loan - refi_closing_costs;

    let cash_out = net_refi_proceeds.max(Decimal::ZERO);
    let short_to_close = (-net_refi_proceeds).max(Decimal::ZERO);
    let overleveraged = existing_loan > max_dscr_loan;

    let status = match dscr {
        None => DscrStatus::Unknown,
        Some(d) if d >= dec!(1.25) => DscrStatus::Strong,
        Some(d) if d >= dec!(1.10) => DscrStatus::Borderline,
        Some(_) => DscrStatus::Weak,
    };

    Ok(RefiDscrOutcome::Analysis(AnalysisReport::new(
        UiMode::ChatDscr,
        DscrAnalysis {
            status,
            dscr: dscr.map(|d| d.round_dp(2)),
            estimated_noi: noi.round_dp(2),
            monthly_debt_service: monthly_debt.round_dp(2),
            max_dscr_loan: max_dscr_loan.round_dp(2),
            existing_loan_payoff: existing_loan.round_dp(2),
            cash_out: cash_out.round_dp(2),
            short_to_close: short_to_close.round_dp(2),
            overleveraged,
            assumptions: DscrAssumptions {
                ltv_cap: "75% ARV",
                noi_factor: "65% of rent",
                payment_type: "interest-only",
                closing_costs: "2% estimate",
            },
            guidance: DSCR_GUIDANCE,
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn rental_raw(rent: serde_json::Value, arv: serde_json::Value) -> RawDeal {
        RawDeal {
            monthly_rent: Some(rent),
            arv: Some(arv),
            city: Some("Memphis".into()),
            loan_program: Some("cash_out_refi".into()),
            ..RawDeal::default()
        }
    }

    fn analysis(outcome: RefiDscrOutcome) -> DscrAnalysis {
        match outcome {
            RefiDscrOutcome::Analysis(report) => report.response,
            RefiDscrOutcome::Prompt(p) => panic!("expected analysis, got prompt for {}", p.pending_field),
        }
    }

    #[test]
    fn test_missing_rent_prompts_instead_of_failing() {
        let mut raw = rental_raw(json!(2000), json!(300000));
        raw.monthly_rent = None;
        match refi_dscr(&raw).unwrap() {
            RefiDscrOutcome::Prompt(p) => {
                assert_eq!(p.pending_field, "monthlyRent");
                assert_eq!(p.ui_mode, UiMode::Chat);
            }
            _ => panic!("expected prompt"),
        }

        // Zero rent counts as unanswered too.
        let raw = rental_raw(json!(0), json!(300000));
        assert!(matches!(refi_dscr(&raw).unwrap(), RefiDscrOutcome::Prompt(_)));
    }

    #[test]
    fn test_missing_city_prompts_after_rent() {
        let mut raw = rental_raw(json!(2000), json!(300000));
        raw.city = None;
        match refi_dscr(&raw).unwrap() {
            RefiDscrOutcome::Prompt(p) => assert_eq!(p.pending_field, "city"),
            _ => panic!("expected prompt"),
        }
    }

    #[test]
    fn test_missing_arv_is_an_error() {
        let mut raw = rental_raw(json!(2000), json!(300000));
        raw.arv = None;
        let err = refi_dscr(&raw).unwrap_err();
        assert!(matches!(
            err,
            HardMoneyError::MissingField { ref field } if field == "arv"
        ));
    }

    #[test]
    fn test_dscr_arithmetic() {
        // ARV 1,664,000 -> max loan 1,248,000 at 10.5% interest-only
        // -> debt 10,920/month. Rent 21,000 -> NOI 13,650.
        let raw = rental_raw(json!(21000), json!(1664000));
        let out = analysis(refi_dscr(&raw).unwrap());

        assert_eq!(out.max_dscr_loan, dec!(1248000.00));
        assert_eq!(out.monthly_debt_service, dec!(10920.00));
        assert_eq!(out.estimated_noi, dec!(13650.00));
        assert_eq!(out.dscr, Some(dec!(1.25)));
        assert_eq!(out.status, DscrStatus::Strong);
    }

    #[test]
    fn test_status_boundaries() {
        // Exactly 1.25 is strong.
        let strong = analysis(refi_dscr(&rental_raw(json!(21000), json!(1664000))).unwrap());
        assert_eq!(strong.status, DscrStatus::Strong);

        // A hair under 1.25 drops to borderline.
        let borderline = analysis(refi_dscr(&rental_raw(json!(20999), json!(1664000))).unwrap());
        assert_eq!(borderline.status, DscrStatus::Borderline);

        // Exactly 1.10 is still borderline.
        let at_110 = analysis(refi_dscr(&rental_raw(json!(23100), json!(2080000))).unwrap());
        assert_eq!(at_110.dscr, Some(dec!(1.10)));
        assert_eq!(at_110.status, DscrStatus::Borderline);

        // A hair under 1.10 is weak.
        let weak = analysis(refi_dscr(&rental_raw(json!(23099), json!(2080000))).unwrap());
        assert_eq!(weak.status, DscrStatus::Weak);
    }

    #[test]
    fn test_bridge_loan_preferred_over_entered_balance() {
        let mut raw = rental_raw(json!(3000), json!(400000));
        raw.existing_loan_balance = Some(json!(120000));
        raw.terms = Some(crate::types::PriorTerms {
            loan_amount: Some(json!(210000)),
        });

        let out = analysis(refi_dscr(&raw).unwrap());
        assert_eq!(out.existing_loan_payoff, dec!(210000.00));
    }

    #[test]
    fn test_falls_back_to_entered_balance_without_bridge() {
        let mut raw = rental_raw(json!(3000), json!(400000));
        raw.existing_loan_balance = Some(json!("$120,000"));
        let out = analysis(refi_dscr(&raw).unwrap());
        assert_eq!(out.existing_loan_payoff, dec!(120000.00));
    }

    #[test]
    fn test_proceeds_split_and_overleverage() {
        // Max loan 300k, payoff 350k: overleveraged and short to close.
        let mut raw = rental_raw(json!(3000), json!(400000));
        raw.existing_loan_balance = Some(json!(350000));
        let out = analysis(refi_dscr(&raw).unwrap());

        assert!(out.overleveraged);
        assert_eq!(out.cash_out, dec!(0.00));
        // 300,000 - 350,000 - 6,000 closing = -56,000 short.
        assert_eq!(out.short_to_close, dec!(56000.00));

        // Light payoff cashes out.
        let mut raw = rental_raw(json!(3000), json!(400000));
        raw.existing_loan_balance = Some(json!(100000));
        let out = analysis(refi_dscr(&raw).unwrap());
        assert!(!out.overleveraged);
        assert_eq!(out.cash_out, dec!(194000.00));
        assert_eq!(out.short_to_close, dec!(0.00));
    }
}
