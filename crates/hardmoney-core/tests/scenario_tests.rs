use hardmoney_core::scenarios::refi_dscr::RefiDscrOutcome;
use hardmoney_core::scenarios::{
    apr_and_default_risk, cash_to_close, hold_time_sensitivity, refi_dscr, stress_test, worst_case,
};
use hardmoney_core::types::{Deal, ExperienceLevel, LoanProgram, RawDeal, TransactionType, UiMode};
use hardmoney_core::underwriting::FirstSummary;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

fn flip_deal() -> Deal {
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
        city: Some("Austin".into()),
        state: Some("TX".into()),
        address: None,
    }
}

// ===========================================================================
// Cross-analyzer consistency
// ===========================================================================

#[test]
fn test_worst_case_is_at_least_as_bad_as_any_stress_scenario() {
    let deal = flip_deal();
    let stress = stress_test(&deal, &FirstSummary);
    let worst = worst_case(&deal, &FirstSummary);

    // Worst case stacks ARV -10%, rehab +15%, and a 6-month extension,
    // so it can never beat the single-variable ARV -10% shock.
    let arv10 = stress
        .response
        .scenarios
        .iter()
        .find(|s| s.name == "ARV -10%")
        .expect("ARV -10% scenario present");
    assert!(worst.response.worst_case.gross_profit <= arv10.gross_profit);

    // And never beat the base case either.
    assert!(worst.response.worst_case.gross_profit <= worst.response.base_case.gross_profit);
}

#[test]
fn test_hold_burn_matches_stress_extension_rate() {
    let deal = flip_deal();
    let stress = stress_test(&deal, &FirstSummary);
    let hold = hold_time_sensitivity(&deal, &FirstSummary);

    // Both analyzers carry the base loan at the same monthly rate.
    assert_eq!(
        stress.response.extra_interest_2mo,
        hold.response.monthly_burn * dec!(2)
    );
}

#[test]
fn test_apr_monthly_interest_matches_hold_burn() {
    let deal = flip_deal();
    let apr = apr_and_default_risk(&deal, &FirstSummary).unwrap();
    let hold = hold_time_sensitivity(&deal, &FirstSummary);

    assert_eq!(
        apr.response.extension_risk.monthly_interest,
        hold.response.monthly_burn
    );
    // A defaulted note always carries more than a performing one.
    assert!(
        apr.response.default_risk.monthly_interest_at_default
            > apr.response.extension_risk.monthly_interest
    );
}

#[test]
fn test_every_analyzer_tags_its_own_card() {
    let deal = flip_deal();
    assert_eq!(stress_test(&deal, &FirstSummary).ui_mode, UiMode::CardStressTest);
    assert_eq!(worst_case(&deal, &FirstSummary).ui_mode, UiMode::CardWorstCase);
    assert_eq!(
        hold_time_sensitivity(&deal, &FirstSummary).ui_mode,
        UiMode::CardHoldSensitivity
    );
    assert_eq!(
        apr_and_default_risk(&deal, &FirstSummary).unwrap().ui_mode,
        UiMode::CardAprRisk
    );
    assert_eq!(cash_to_close(&deal, &FirstSummary).ui_mode, UiMode::CardCashToClose);
}

// ===========================================================================
// Cash to close stays independent of financed costs
// ===========================================================================

#[test]
fn test_cash_to_close_ignores_points_and_prepaid() {
    // Same loan amount, very different points and prepaid interest:
    // out-of-pocket closing costs must not move.
    let flip = flip_deal();

    let mut ground_up = flip_deal();
    ground_up.program = LoanProgram::GroundUp;

    let a = cash_to_close(&flip, &FirstSummary);
    let b = cash_to_close(&ground_up, &FirstSummary);

    assert_eq!(a.response.loan_amount, b.response.loan_amount);
    assert_eq!(a.response.total_out_of_pocket, b.response.total_out_of_pocket);
}

#[test]
fn test_cash_to_close_worked_example() {
    // Loan 220k: fixed 2,150 + escrow (1,500 + 220) + title floor-to-cap
    // band 550 -> 750 + recording 500 = 5,120.
    let report = cash_to_close(&flip_deal(), &FirstSummary);
    let c = &report.response;

    assert_eq!(c.loan_amount, dec!(220000.00));
    assert_eq!(c.categories.fixed_admin.subtotal, dec!(2150));
    assert_eq!(c.categories.escrow_and_title_admin.subtotal, dec!(1720.00));
    assert!(!c.categories.escrow_and_title_admin.cap_applied);
    assert_eq!(c.categories.title_insurance.amount, dec!(750.00));
    assert_eq!(c.total_out_of_pocket, dec!(5120.00));
}

// ===========================================================================
// DSCR refinance conversation
// ===========================================================================

#[test]
fn test_dscr_conversation_reaches_analysis() {
    let mut raw: RawDeal = serde_json::from_value(json!({
        "loanProgram": "cash_out_refi",
        "arv": 400000,
        "existingLoanBalance": 100000
    }))
    .unwrap();

    // No rent yet: the analyzer asks instead of failing.
    match refi_dscr(&raw).unwrap() {
        RefiDscrOutcome::Prompt(p) => assert_eq!(p.pending_field, "monthlyRent"),
        other => panic!("expected rent prompt, got {other:?}"),
    }

    raw.monthly_rent = Some(json!(3000));
    match refi_dscr(&raw).unwrap() {
        RefiDscrOutcome::Prompt(p) => assert_eq!(p.pending_field, "city"),
        other => panic!("expected city prompt, got {other:?}"),
    }

    raw.city = Some("Memphis".into());
    match refi_dscr(&raw).unwrap() {
        RefiDscrOutcome::Analysis(report) => {
            assert_eq!(report.ui_mode, UiMode::ChatDscr);
            // Max loan 300k, 2% closing, 100k payoff: 194k out.
            assert_eq!(report.response.cash_out, dec!(194000.00));
        }
        other => panic!("expected analysis, got {other:?}"),
    }
}

// ===========================================================================
// Envelope serialization
// ===========================================================================

#[test]
fn test_reports_serialize_with_ui_mode_envelope() {
    let deal = flip_deal();
    let value = serde_json::to_value(stress_test(&deal, &FirstSummary)).unwrap();

    assert_eq!(value["uiMode"], json!("CARD_STRESS_TEST"));
    assert!(value["response"]["base"]["terms"]["loan_amount"].is_string());
    assert_eq!(value["response"]["scenarios"].as_array().unwrap().len(), 4);
}
