use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::normalize::round_percent;
use crate::types::{AnalysisReport, Deal, Money, Rate, UiMode};
use crate::underwriting::engine::underwrite;
use crate::underwriting::pricing;
use crate::underwriting::verdict::SummarySource;

const WORST_CASE_WARNING: &str = "Worst-case assumes no lender concessions, no market rebound, \
     and full interest carry during extension.";

#[derive(Debug, Clone, Serialize)]
pub struct WorstCaseAssumptions {
    pub arv_change: &'static str,
    pub rehab_change: &'static str,
    pub hold_extension_months: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseSummary {
    pub gross_profit: Money,
    pub roi_percent: Option<Rate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DamageBreakdown {
    pub arv_hit: Money,
    pub rehab_overrun: Money,
    pub hold_extension_cost: Money,
    pub total_profit_erosion: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorstCaseRating {
    Survivable,
    #[serde(rename = "Danger Zone")]
    DangerZone,
    Failing,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorstCaseVerdict {
    pub rating: WorstCaseRating,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorstCase {
    pub assumptions: WorstCaseAssumptions,
    pub base_case: CaseSummary,
    pub worst_case: CaseSummary,
    pub damage_breakdown: DamageBreakdown,
    pub verdict: WorstCaseVerdict,
    pub warning: &'static str,
}

/// Worst-case downside: ARV -10% and rehab +15% applied together, plus a
/// 6-month hold extension carried at the shocked loan's own terms (the
/// shocked run re-prices the loan, and the extension compounds on that,
/// not on the base terms).
pub fn worst_case(deal: &Deal, summaries: &dyn SummarySource) -> AnalysisReport<WorstCase> {
    let base = underwrite(deal, summaries);
    let base_profit = base.sale_and_profit.gross_profit;
    let base_cost = base.sale_and_profit.total_project_cost;

    let shocked_arv = deal.arv * dec!(0.90);
    let shocked_rehab = deal.rehab_budget * dec!(1.15);

    let shocked_deal = Deal {
        arv: shocked_arv,
        rehab_budget: shocked_rehab,
        ..deal.clone()
    };
    let shocked = underwrite(&shocked_deal, summaries);

    let shocked_profit = shocked.sale_and_profit.gross_profit;
    let shocked_cost = shocked.sale_and_profit.total_project_cost;

    let monthly =
        pricing::monthly_interest(shocked.terms.loan_amount, shocked.terms.interest_rate);
    let extension_cost = monthly * dec!(6);

    let worst_profit = shocked_profit - extension_cost;
    let worst_roi = if shocked_cost > Decimal::ZERO {
        Some(worst_profit / shocked_cost * dec!(100))
    } else {
        None
    };

    let (rating, message) = if worst_profit > Decimal::ZERO {
        (
            WorstCaseRating::Survivable,
            "Deal remains profitable but margin compression is severe.",
        )
    } else if worst_profit > dec!(-25000) {
        (
            WorstCaseRating::DangerZone,
            "Minor execution errors turn this deal unprofitable.",
        )
    } else {
        (
            WorstCaseRating::Failing,
            "Worst-case scenario results in a material capital loss.",
        )
    };

    let base_roi = if base_cost > Decimal::ZERO {
        Some(base_profit / base_cost * dec!(100))
    } else {
        None
    };

    AnalysisReport::new(
        UiMode::CardWorstCase,
        WorstCase {
            assumptions: WorstCaseAssumptions {
                arv_change: "-10%",
                rehab_change: "+15%",
                hold_extension_months: 6,
            },
            base_case: CaseSummary {
                gross_profit: base_profit.round_dp(2),
                roi_percent: round_percent(base_roi),
            },
            worst_case: CaseSummary {
                gross_profit: worst_profit.round_dp(2),
                roi_percent: round_percent(worst_roi),
            },
            damage_breakdown: DamageBreakdown {
                arv_hit: (deal.arv - shocked_arv).round_dp(2),
                rehab_overrun: (shocked_rehab - deal.rehab_budget).round_dp(2),
                hold_extension_cost: extension_cost.round_dp(2),
                total_profit_erosion: (base_profit - worst_profit).round_dp(2),
            },
            verdict: WorstCaseVerdict {
                rating,
                message: message.to_string(),
            },
            warning: WORST_CASE_WARNING,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::stress_test::stress_test;
    use crate::types::{ExperienceLevel, LoanProgram, TransactionType};
    use crate::underwriting::verdict::FirstSummary;
    use pretty_assertions::assert_eq;

    fn sample_deal() -> Deal {
        Deal {
            transaction_type: TransactionType::Purchase,
            program: LoanProgram::FixAndFlip,
            purchase_price: dec!(200000),
            arv: dec!(320000),
            rehab_budget: dec!(40000),
            existing_loan_balance: Decimal::ZERO,
            interest_reserves: None,
            experience: Some(ExperienceLevel::Pro),
            monthly_rent: None,
            city: None,
            state: None,
            address: None,
        }
    }

    #[test]
    fn test_damage_breakdown_reconciles() {
        let report = worst_case(&sample_deal(), &FirstSummary).response;
        let damage = &report.damage_breakdown;

        assert_eq!(damage.arv_hit, dec!(32000.00));
        assert_eq!(damage.rehab_overrun, dec!(6000.00));
        assert!(damage.hold_extension_cost > dec!(0));
        assert_eq!(
            damage.total_profit_erosion,
            report.base_case.gross_profit - report.worst_case.gross_profit
        );
    }

    #[test]
    fn test_worst_case_below_arv_minus_10_stress_scenario() {
        // Worst case stacks a rehab overrun and the hold extension on
        // top of the same ARV haircut, so it can never beat it.
        let deal = sample_deal();
        let stress = stress_test(&deal, &FirstSummary);
        let arv10 = &stress.response.scenarios[3];
        assert_eq!(arv10.name, "ARV -10%");

        let worst = worst_case(&deal, &FirstSummary);
        assert!(worst.response.worst_case.gross_profit <= arv10.gross_profit);
    }

    #[test]
    fn test_extension_carries_shocked_terms() {
        let deal = sample_deal();
        let shocked_deal = Deal {
            arv: deal.arv * dec!(0.90),
            rehab_budget: deal.rehab_budget * dec!(1.15),
            ..deal.clone()
        };
        let shocked = underwrite(&shocked_deal, &FirstSummary);
        let expected =
            (shocked.terms.loan_amount * shocked.terms.interest_rate / dec!(100) / dec!(12)
                * dec!(6))
            .round_dp(2);

        let report = worst_case(&deal, &FirstSummary).response;
        assert_eq!(report.damage_breakdown.hold_extension_cost, expected);
    }

    #[test]
    fn test_rating_bands() {
        // Healthy deal stays survivable.
        let report = worst_case(&sample_deal(), &FirstSummary).response;
        assert_eq!(report.verdict.rating, WorstCaseRating::Survivable);

        // A thin deal slides into the danger zone or worse.
        let mut thin = sample_deal();
        thin.arv = dec!(265000);
        let report = worst_case(&thin, &FirstSummary).response;
        assert!(matches!(
            report.verdict.rating,
            WorstCaseRating::DangerZone | WorstCaseRating::Failing
        ));
        assert!(report.worst_case.gross_profit <= dec!(0));
    }
}
