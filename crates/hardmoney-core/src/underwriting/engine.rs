//! The deal-underwriting engine: a pure function from a strict `Deal` to
//! a complete `DealAnalysis`. Every scenario analyzer composes this with
//! perturbed inputs, so the numeric behavior here must stay reproducible
//! call-to-call; the only nondeterminism is the verdict summary string.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::normalize::round_percent;
use crate::types::{Deal, LoanProgram, Money, Rate, RawDeal, TransactionType};
use crate::underwriting::pricing;
use crate::underwriting::verdict::{self, SummarySource, VerdictRating};
use crate::HardMoneyResult;

// ---------------------------------------------------------------------------
// Policy constants
// ---------------------------------------------------------------------------

/// Purchase leverage: max 70% of ARV.
const MAX_LTV_ARV: Decimal = dec!(0.70);
/// Purchase leverage: max 90% of purchase price, plus 100% of rehab.
const MAX_LTC_PURCHASE: Decimal = dec!(0.90);
/// Floor on the origination fee regardless of points.
const MIN_ORIGINATION_FEE: Decimal = dec!(5000);
/// Flat docs + processing charge on every loan.
const PROCESSING_DOCS_FEE: Decimal = dec!(1195);
/// Underwriting surcharge on small loans.
const SMALL_LOAN_SURCHARGE: Decimal = dec!(595);
const SMALL_LOAN_THRESHOLD: Decimal = dec!(150000);

const BASE_STIPULATIONS: [&str; 3] = [
    "Loan application",
    "Credit authorization",
    "Last 3 months of bank statements",
];

const GROUND_UP_STIPULATIONS: [&str; 2] = [
    "Construction bid",
    "Proof of permits / permit status (and lot ownership docs if applicable)",
];

const CASH_OUT_REFI_STIPULATIONS: [&str; 1] = ["Certificate of occupancy"];

const FIX_AND_FLIP_FOLLOW_UPS: [&str; 4] = [
    "Want me to stress-test the deal (rehab +10%, timeline +2 months)?",
    "Want tips to lower rehab costs without hurting ARV?",
    "Want me to estimate a realistic resale net after realtor + closing costs?",
    "Want me to find hard money lenders in the property area?",
];

const GROUND_UP_FOLLOW_UPS: [&str; 4] = [
    "Want me to estimate draw schedule + interest reserve impact?",
    "Want me to stress-test the budget (materials +10%) and timeline (+3 months)?",
    "Want me to list common new-construction underwriting pitfalls?",
    "Want me to find local construction lenders / private lenders?",
];

const CASH_OUT_REFI_FOLLOW_UPS: [&str; 4] = [
    "Want me to compute your cash-to-borrower after payoff + closing costs?",
    "Want me to estimate monthly payment + DSCR style view?",
    "Want me to analyze risk if ARV comes in low by 5–10%?",
    "Want me to find lenders that do cash-out refis in this area?",
];

const IMPROVEMENTS: [&str; 2] = [
    "Negotiate purchase price or reduce scope to widen margin.",
    "Increase ARV confidence with stronger comps and conservative exit assumptions.",
];

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub interest_rate: Rate,
    pub points: Decimal,
    /// Loan amount over ARV, as a percentage. `None` on a degenerate ARV.
    pub ltv_arv: Option<Rate>,
    pub loan_amount: Money,
    pub loan_term_months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingCosts {
    pub prepaid_interest: Money,
    pub origination_fees: Money,
    pub processing_fees: Money,
    pub total_closing_costs: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanPayoff {
    /// Principal retired out of sale proceeds; baked into the cost basis.
    pub loan_principal_payoff_at_sale: Money,
    /// Existing lien payoff; zero on a purchase.
    pub existing_loan_payoff: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashAtClose {
    pub cash_to_borrower: Money,
    pub cash_from_borrower: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleAndProfit {
    pub estimated_sale_price: Money,
    pub loan_payoff: LoanPayoff,
    pub cash_at_close: CashAtClose,
    pub purchase_price: Money,
    pub rehab_budget: Money,
    pub financing_costs: Money,
    pub total_project_cost: Money,
    pub gross_profit: Money,
    /// `None` when the cost basis is zero.
    pub roi_percent: Option<Rate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefiAnalysis {
    pub transaction_type: TransactionType,
    pub existing_loan_balance: Money,
    pub short_to_close: Money,
    pub is_overleveraged: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub rating: VerdictRating,
    pub summary: String,
    pub improvements: Vec<String>,
}

/// Immutable snapshot of one deal's underwriting at one point in time.
/// Never partially populated: the engine returns this whole or fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealAnalysis {
    pub property: PropertyInfo,
    pub terms: LoanTerms,
    pub financing_costs: FinancingCosts,
    pub sale_and_profit: SaleAndProfit,
    pub refi_analysis: RefiAnalysis,
    pub stipulations: Vec<String>,
    pub key_risks: Vec<String>,
    pub follow_up_questions: Vec<String>,
    pub verdict: Verdict,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Underwrite a strictly-typed deal.
///
/// Pure in every numeric field; only the verdict summary string depends
/// on the `SummarySource`. Reusable any number of times per request.
pub fn underwrite(deal: &Deal, summaries: &dyn SummarySource) -> DealAnalysis {
    // --- Loan sizing ---
    let loan_amount = match deal.transaction_type {
        TransactionType::Purchase => {
            // Cap by 70% ARV and by cost-basis leverage (90% purchase
            // plus 100% of rehab).
            let loan_by_arv = deal.arv * MAX_LTV_ARV;
            let loan_by_cost = deal.purchase_price * MAX_LTC_PURCHASE + deal.rehab_budget;
            loan_by_arv.min(loan_by_cost)
        }
        // Existing liens are handled in payoff / short-to-close, never
        // in loan sizing.
        TransactionType::Refinance => deal.arv * MAX_LTV_ARV,
    }
    .max(Decimal::ZERO);

    let loan_term_months = pricing::term_months_from_ltv(loan_amount, deal.arv, deal.program);

    // --- Pricing ---
    let base_rate = pricing::rate_from_program(deal.program);
    let discount = pricing::rate_discount_from_experience(deal.experience);
    let interest_rate = (base_rate - discount).max(Decimal::ZERO);

    let points = pricing::points_from_loan_amount(loan_amount);
    let origination_fees = (points / dec!(100) * loan_amount).max(MIN_ORIGINATION_FEE);

    let underwriting_fee = if loan_amount < SMALL_LOAN_THRESHOLD {
        SMALL_LOAN_SURCHARGE
    } else {
        Decimal::ZERO
    };
    let processing_fees = PROCESSING_DOCS_FEE + underwriting_fee;

    let prepaid_interest = pricing::prepaid_interest_from_reserves(
        loan_amount,
        interest_rate,
        deal.interest_reserves,
        deal.program,
    );

    // --- Hold-period interest ---
    let monthly_interest = pricing::monthly_interest(loan_amount, interest_rate);
    let total_interest_over_term = monthly_interest * Decimal::from(loan_term_months);
    // Prepaid interest offsets the carry but never goes negative.
    let net_interest_cost = (total_interest_over_term - prepaid_interest).max(Decimal::ZERO);

    let total_closing_costs = origination_fees + processing_fees + prepaid_interest;

    // --- Payoff logic + cash at close ---
    let loan_principal_payoff_at_sale = loan_amount;

    // Refi must pay off the existing lien; a purchase ignores it.
    let existing_loan_payoff = if deal.transaction_type.is_refinance() {
        deal.existing_loan_balance
    } else {
        Decimal::ZERO
    };

    let net_loan_proceeds = loan_amount - existing_loan_payoff;
    let net_cash_at_close = net_loan_proceeds - total_closing_costs;

    let cash_to_borrower = net_cash_at_close.max(Decimal::ZERO);
    let cash_from_borrower = (-net_cash_at_close).max(Decimal::ZERO);

    let mut short_to_close = Decimal::ZERO;
    let mut is_overleveraged = false;
    if deal.transaction_type.is_refinance() && net_cash_at_close < Decimal::ZERO {
        short_to_close = net_cash_at_close.abs();
        is_overleveraged = true;
    }

    // --- Equity / cost basis (purchase only) ---
    let purchase_equity = match deal.transaction_type {
        TransactionType::Purchase => (deal.purchase_price - loan_amount).max(Decimal::ZERO),
        TransactionType::Refinance => Decimal::ZERO,
    };

    // --- Profit ---
    let estimated_sale_price = deal.arv;

    let total_project_cost = purchase_equity
        + deal.rehab_budget
        + total_closing_costs
        + net_interest_cost
        + loan_principal_payoff_at_sale;

    let gross_profit = estimated_sale_price - total_project_cost;
    let roi_percent = if total_project_cost > Decimal::ZERO {
        Some(gross_profit / total_project_cost * dec!(100))
    } else {
        None
    };

    let key_risks = derive_key_risks(deal, roi_percent, is_overleveraged);
    let verdict = derive_verdict(deal, roi_percent, gross_profit, is_overleveraged, summaries);

    let mut stipulations: Vec<String> = BASE_STIPULATIONS.iter().map(|s| s.to_string()).collect();
    stipulations.extend(program_stipulations(deal.program).iter().map(|s| s.to_string()));

    let follow_up_questions = follow_ups(deal.program).iter().map(|s| s.to_string()).collect();

    let ltv_arv = if deal.arv.is_zero() {
        None
    } else {
        Some(loan_amount / deal.arv * dec!(100))
    };

    DealAnalysis {
        property: PropertyInfo {
            city: deal.city.clone(),
            state: deal.state.clone(),
        },
        terms: LoanTerms {
            interest_rate: interest_rate.round_dp(2),
            points: points.round_dp(2),
            ltv_arv: round_percent(ltv_arv),
            loan_amount: loan_amount.round_dp(2),
            loan_term_months,
        },
        financing_costs: FinancingCosts {
            prepaid_interest: prepaid_interest.round_dp(2),
            origination_fees: origination_fees.round_dp(2),
            processing_fees: processing_fees.round_dp(2),
            total_closing_costs: total_closing_costs.round_dp(2),
        },
        sale_and_profit: SaleAndProfit {
            estimated_sale_price: estimated_sale_price.round_dp(2),
            loan_payoff: LoanPayoff {
                loan_principal_payoff_at_sale: loan_principal_payoff_at_sale.round_dp(2),
                existing_loan_payoff: existing_loan_payoff.round_dp(2),
            },
            cash_at_close: CashAtClose {
                cash_to_borrower: cash_to_borrower.round_dp(2),
                cash_from_borrower: cash_from_borrower.round_dp(2),
            },
            purchase_price: deal.purchase_price.round_dp(2),
            rehab_budget: deal.rehab_budget.round_dp(2),
            financing_costs: total_closing_costs.round_dp(2),
            total_project_cost: total_project_cost.round_dp(2),
            gross_profit: gross_profit.round_dp(2),
            roi_percent: round_percent(roi_percent),
        },
        refi_analysis: RefiAnalysis {
            transaction_type: deal.transaction_type,
            existing_loan_balance: deal.existing_loan_balance.round_dp(2),
            short_to_close: short_to_close.round_dp(2),
            is_overleveraged,
        },
        stipulations,
        key_risks,
        follow_up_questions,
        verdict,
    }
}

/// Normalize a wire-shaped deal and underwrite it in one step. Fails with
/// `MissingField` before any numbers are produced; there is no partial
/// result to clean up.
pub fn underwrite_raw(raw: &RawDeal, summaries: &dyn SummarySource) -> HardMoneyResult<DealAnalysis> {
    let deal = Deal::from_raw(raw)?;
    Ok(underwrite(&deal, summaries))
}

// ---------------------------------------------------------------------------
// Risks and verdict
// ---------------------------------------------------------------------------

fn derive_key_risks(deal: &Deal, roi_percent: Option<Rate>, is_overleveraged: bool) -> Vec<String> {
    let mut risks: Vec<String> = Vec::new();
    let refi = deal.transaction_type.is_refinance();

    if refi && deal.existing_loan_balance <= Decimal::ZERO {
        risks.push("Refinance requires an existing payoff balance—confirm current lien(s).".into());
    }

    if refi && is_overleveraged {
        risks.push(
            "Overleveraged: refinance proceeds do not cover existing payoff + closing costs.".into(),
        );
    }

    if matches!(roi_percent, Some(roi) if roi < dec!(10)) {
        risks.push("Thin margin: small cost/timeline changes can erase profit.".into());
    }

    if deal.rehab_budget > Decimal::ZERO && deal.rehab_budget > dec!(0.20) * deal.arv {
        risks.push(
            "High rehab relative to ARV: budget overruns are common—verify bids and contingency."
                .into(),
        );
    }

    if deal.experience == Some(crate::types::ExperienceLevel::Beginner) {
        risks.push(
            "Beginner execution risk: timelines and change-orders tend to run higher for first-time flippers."
                .into(),
        );
    }

    if risks.is_empty() {
        risks.push(
            "Main risk is ARV accuracy—validate comps and conservative exit assumptions.".into(),
        );
    }

    risks
}

fn derive_verdict(
    deal: &Deal,
    roi_percent: Option<Rate>,
    gross_profit: Money,
    is_overleveraged: bool,
    summaries: &dyn SummarySource,
) -> Verdict {
    let (rating, summary) = if deal.transaction_type.is_refinance() && is_overleveraged {
        (VerdictRating::Weak, verdict::OVERLEVERAGED_SUMMARY.to_string())
    } else {
        let rating = match roi_percent {
            Some(roi) if roi >= dec!(25) && gross_profit > Decimal::ZERO => VerdictRating::Strong,
            Some(roi) if roi >= dec!(10) && gross_profit > Decimal::ZERO => VerdictRating::Borderline,
            _ => VerdictRating::Weak,
        };
        let summary = summaries.pick(rating, verdict::summary_pool(rating));
        (rating, summary)
    };

    Verdict {
        rating,
        summary,
        improvements: IMPROVEMENTS.iter().map(|s| s.to_string()).collect(),
    }
}

fn program_stipulations(program: LoanProgram) -> &'static [&'static str] {
    match program {
        LoanProgram::GroundUp => &GROUND_UP_STIPULATIONS,
        LoanProgram::CashOutRefi => &CASH_OUT_REFI_STIPULATIONS,
        LoanProgram::FixAndFlip => &[],
    }
}

fn follow_ups(program: LoanProgram) -> &'static [&'static str] {
    match program {
        LoanProgram::FixAndFlip => &FIX_AND_FLIP_FOLLOW_UPS,
        LoanProgram::GroundUp => &GROUND_UP_FOLLOW_UPS,
        LoanProgram::CashOutRefi => &CASH_OUT_REFI_FOLLOW_UPS,
    }
}
