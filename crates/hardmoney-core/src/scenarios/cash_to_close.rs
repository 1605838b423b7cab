use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::types::{AnalysisReport, Deal, Money, UiMode};
use crate::underwriting::engine::underwrite;
use crate::underwriting::verdict::SummarySource;

const ESCROW_BASE_FEE: Decimal = dec!(1500);
const ESCROW_CAP: Decimal = dec!(3000);
/// Escrow scales at 0.10% of loan amount.
const ESCROW_SCALE: Decimal = dec!(0.001);
/// Loan title policy at 0.25% of loan amount.
const TITLE_RATE: Decimal = dec!(0.0025);
const TITLE_FLOOR: Decimal = dec!(750);
const TITLE_CEILING: Decimal = dec!(3500);
const RECORDING_FEES: Decimal = dec!(500);

/// The flat administrative line items every closing carries.
#[derive(Debug, Clone, Serialize)]
pub struct FixedAdminFees {
    pub docs_fee: Money,
    pub notary: Money,
    pub courier: Money,
    pub recording_service: Money,
    pub wire_fee: Money,
    pub endorsements: Money,
    pub sb2_recording: Money,
    pub sub_escrow: Money,
    pub subtotal: Money,
}

impl FixedAdminFees {
    fn standard() -> Self {
        let fees = FixedAdminFees {
            docs_fee: dec!(600),
            notary: dec!(250),
            courier: dec!(250),
            recording_service: dec!(100),
            wire_fee: dec!(75),
            endorsements: dec!(300),
            sb2_recording: dec!(450),
            sub_escrow: dec!(125),
            subtotal: Decimal::ZERO,
        };
        FixedAdminFees {
            subtotal: fees.docs_fee
                + fees.notary
                + fees.courier
                + fees.recording_service
                + fees.wire_fee
                + fees.endorsements
                + fees.sb2_recording
                + fees.sub_escrow,
            ..fees
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EscrowAdmin {
    pub base_fee: Money,
    pub scaled_fee: Money,
    pub cap_applied: bool,
    pub subtotal: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct TitleInsurance {
    pub rate_basis: &'static str,
    pub amount: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordingFees {
    pub estimated: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct CostCategories {
    pub fixed_admin: FixedAdminFees,
    pub escrow_and_title_admin: EscrowAdmin,
    pub title_insurance: TitleInsurance,
    pub recording_fees: RecordingFees,
}

#[derive(Debug, Clone, Serialize)]
pub struct CashToClose {
    pub loan_amount: Money,
    pub categories: CostCategories,
    pub total_out_of_pocket: Money,
    pub excludes: Vec<&'static str>,
}

/// Itemized out-of-pocket closing costs. Deliberately excludes
/// origination points, prepaid interest, loan payoff, and tax/insurance
/// escrows; those are accounted for in the main underwriting.
pub fn cash_to_close(deal: &Deal, summaries: &dyn SummarySource) -> AnalysisReport<CashToClose> {
    let base = underwrite(deal, summaries);
    let loan_amount = base.terms.loan_amount;

    let fixed_admin = FixedAdminFees::standard();

    let escrow_scaled = loan_amount * ESCROW_SCALE;
    let escrow_total = (ESCROW_BASE_FEE + escrow_scaled).min(ESCROW_CAP);
    let escrow_admin = EscrowAdmin {
        base_fee: ESCROW_BASE_FEE,
        scaled_fee: escrow_scaled.round_dp(2),
        cap_applied: escrow_total >= ESCROW_CAP,
        subtotal: escrow_total.round_dp(2),
    };

    let title_insurance = (loan_amount * TITLE_RATE).clamp(TITLE_FLOOR, TITLE_CEILING);

    let total_out_of_pocket =
        fixed_admin.subtotal + escrow_total + title_insurance + RECORDING_FEES;

    AnalysisReport::new(
        UiMode::CardCashToClose,
        CashToClose {
            loan_amount: loan_amount.round_dp(2),
            categories: CostCategories {
                fixed_admin,
                escrow_and_title_admin: escrow_admin,
                title_insurance: TitleInsurance {
                    rate_basis: "0.25% of loan amount",
                    amount: title_insurance.round_dp(2),
                },
                recording_fees: RecordingFees {
                    estimated: RECORDING_FEES,
                },
            },
            total_out_of_pocket: total_out_of_pocket.round_dp(2),
            excludes: vec![
                "Loan origination / points",
                "Prepaid interest",
                "Loan payoff",
                "Taxes and insurance escrows",
            ],
        },
    )
}
