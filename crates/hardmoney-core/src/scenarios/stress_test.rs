use rust_decimal_macros::dec;
use serde::Serialize;

use crate::types::{AnalysisReport, Deal, Money, Rate, UiMode};
use crate::underwriting::engine::{underwrite, DealAnalysis};
use crate::underwriting::pricing;
use crate::underwriting::verdict::{SummarySource, VerdictRating};

/// One shocked re-run of the engine, reduced to its headline numbers.
#[derive(Debug, Clone, Serialize)]
pub struct StressScenario {
    pub name: String,
    pub roi_percent: Option<Rate>,
    pub gross_profit: Money,
    pub verdict: VerdictRating,
}

#[derive(Debug, Clone, Serialize)]
pub struct StressTest {
    pub base: DealAnalysis,
    /// Two months of extra carry at the base loan's terms; the engine
    /// has no hold-period input, so the timeline shock is shown
    /// alongside the scenarios instead of re-run through it.
    pub extra_interest_2mo: Money,
    pub scenarios: Vec<StressScenario>,
}

/// Run the base deal plus four independently-shocked variants:
/// rehab +10% / +20% and ARV -5% / -10%.
pub fn stress_test(deal: &Deal, summaries: &dyn SummarySource) -> AnalysisReport<StressTest> {
    let base = underwrite(deal, summaries);

    let run = |name: &str, patched: Deal| -> StressScenario {
        let analysis = underwrite(&patched, summaries);
        StressScenario {
            name: name.to_string(),
            roi_percent: analysis.sale_and_profit.roi_percent,
            gross_profit: analysis.sale_and_profit.gross_profit,
            verdict: analysis.verdict.rating,
        }
    };

    let rehab = deal.rehab_budget;
    let arv = deal.arv;

    let scenarios = vec![
        run("Rehab +10%", Deal { rehab_budget: rehab * dec!(1.10), ..deal.clone() }),
        run("Rehab +20%", Deal { rehab_budget: rehab * dec!(1.20), ..deal.clone() }),
        run("ARV -5%", Deal { arv: arv * dec!(0.95), ..deal.clone() }),
        run("ARV -10%", Deal { arv: arv * dec!(0.90), ..deal.clone() }),
    ];

    let monthly = pricing::monthly_interest(base.terms.loan_amount, base.terms.interest_rate);
    let extra_interest_2mo = (monthly * dec!(2)).round_dp(2);

    AnalysisReport::new(
        UiMode::CardStressTest,
        StressTest {
            base,
            extra_interest_2mo,
            scenarios,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExperienceLevel, LoanProgram, TransactionType};
    use crate::underwriting::verdict::FirstSummary;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn sample_deal() -> Deal {
        Deal {
            transaction_type: TransactionType::Purchase,
            program: LoanProgram::FixAndFlip,
            purchase_price: dec!(200000),
            arv: dec!(320000),
            rehab_budget: dec!(40000),
            existing_loan_balance: Decimal::ZERO,
            interest_reserves: None,
            experience: Some(ExperienceLevel::Intermediate),
            monthly_rent: None,
            city: None,
            state: None,
            address: None,
        }
    }

    #[test]
    fn test_four_scenarios_in_order() {
        let report = stress_test(&sample_deal(), &FirstSummary);
        let names: Vec<&str> = report.response.scenarios.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Rehab +10%", "Rehab +20%", "ARV -5%", "ARV -10%"]);
        assert_eq!(report.ui_mode, UiMode::CardStressTest);
    }

    #[test]
    fn test_rehab_shocks_never_increase_profit() {
        let report = stress_test(&sample_deal(), &FirstSummary);
        let base_profit = report.response.base.sale_and_profit.gross_profit;
        let rehab10 = &report.response.scenarios[0];
        let rehab20 = &report.response.scenarios[1];

        assert!(rehab10.gross_profit <= base_profit);
        assert!(rehab20.gross_profit <= rehab10.gross_profit);
    }

    #[test]
    fn test_arv_shocks_compress_profit() {
        let report = stress_test(&sample_deal(), &FirstSummary);
        let base_profit = report.response.base.sale_and_profit.gross_profit;
        let arv5 = &report.response.scenarios[2];
        let arv10 = &report.response.scenarios[3];

        assert!(arv5.gross_profit < base_profit);
        assert!(arv10.gross_profit < arv5.gross_profit);
    }

    #[test]
    fn test_extension_interest_uses_base_terms() {
        let report = stress_test(&sample_deal(), &FirstSummary);
        let base = &report.response.base.terms;
        let expected = (base.loan_amount * base.interest_rate / dec!(100) / dec!(12) * dec!(2)).round_dp(2);
        assert_eq!(report.response.extra_interest_2mo, expected);
    }

    #[test]
    fn test_base_deal_is_untouched_by_shocks() {
        let deal = sample_deal();
        let _ = stress_test(&deal, &FirstSummary);
        assert_eq!(deal.rehab_budget, dec!(40000));
        assert_eq!(deal.arv, dec!(320000));
    }
}
