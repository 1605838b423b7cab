//! Program pricing policy: rate sheet, points tiers, term-length rules,
//! and the prepaid-interest reserve policy. Everything here is a finite
//! enum-keyed table; the variation between programs is purely in
//! coefficients, so there is no per-program polymorphism.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{ExperienceLevel, LoanProgram, Money, Rate};

/// Base note rate by program.
pub fn rate_from_program(program: LoanProgram) -> Rate {
    match program {
        LoanProgram::FixAndFlip => dec!(11.0),
        LoanProgram::CashOutRefi => dec!(10.5),
        LoanProgram::GroundUp => dec!(12.0),
    }
}

/// Percentage-point discount for borrower track record, subtracted from
/// the base rate (the engine clamps the result at zero).
pub fn rate_discount_from_experience(experience: Option<ExperienceLevel>) -> Rate {
    match experience {
        Some(ExperienceLevel::Intermediate) => dec!(0.5),
        Some(ExperienceLevel::Pro) => dec!(1.0),
        Some(ExperienceLevel::Beginner) | None => Decimal::ZERO,
    }
}

/// Origination points by loan size.
///
/// Under $150k the points rate is whatever implies a $5,000 minimum fee,
/// floored at 3.0. The boundary at exactly $150,000 belongs to the flat
/// 4.0 tier.
pub fn points_from_loan_amount(loan_amount: Money) -> Decimal {
    // Degenerate loan: the implied-minimum division below needs a
    // positive amount, so fall back to the floor.
    if loan_amount <= Decimal::ZERO {
        return dec!(3.0);
    }
    if loan_amount >= dec!(350000) {
        return dec!(2.0);
    }
    if loan_amount < dec!(150000) {
        let implied = (dec!(5000) / loan_amount * dec!(100)).round_dp(2);
        return implied.max(dec!(3.0));
    }
    if loan_amount < dec!(250000) {
        dec!(4.0)
    } else {
        dec!(3.0)
    }
}

/// Loan term from leverage, with program guardrails.
///
/// Base rule: LTV > 60% -> 12 months, 50-60% -> 18, < 50% -> 24.
/// Fix & flip and ground-up cap at 18 months; cash-out refi keeps the
/// full 24.
pub fn term_months_from_ltv(loan_amount: Money, arv: Money, program: LoanProgram) -> u32 {
    if arv <= Decimal::ZERO {
        return 12;
    }

    let ltv = loan_amount / arv;

    let term = if ltv > dec!(0.60) {
        12
    } else if ltv >= dec!(0.50) {
        18
    } else {
        24
    };

    match program {
        LoanProgram::FixAndFlip | LoanProgram::GroundUp => term.min(18),
        LoanProgram::CashOutRefi => term,
    }
}

/// Fallback prepaid-interest months when the borrower's reserves are
/// unknown. Ground-up construction prepays 6 months at closing.
pub fn prepaid_months_from_program(program: LoanProgram) -> u32 {
    match program {
        LoanProgram::GroundUp => 6,
        LoanProgram::FixAndFlip => 1,
        LoanProgram::CashOutRefi => 0,
    }
}

/// One month of interest-only carry.
pub fn monthly_interest(loan_amount: Money, rate: Rate) -> Money {
    loan_amount * (rate / dec!(100)) / dec!(12)
}

/// Prepaid interest collected at closing, sized off the borrower's cash
/// reserves: 12 months of coverage waives prepay, 6 months halves it to
/// 3, anything less prepays 6. Without a stated reserve figure the
/// program default applies.
pub fn prepaid_interest_from_reserves(
    loan_amount: Money,
    rate: Rate,
    reserves: Option<Money>,
    program: LoanProgram,
) -> Money {
    let monthly = monthly_interest(loan_amount, rate);

    let reserves = match reserves {
        None => {
            let months = prepaid_months_from_program(program);
            return monthly * Decimal::from(months);
        }
        Some(r) => r,
    };

    if monthly <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let prepaid_months = if reserves >= monthly * dec!(12) {
        Decimal::ZERO
    } else if reserves >= monthly * dec!(6) {
        dec!(3)
    } else {
        dec!(6)
    };

    monthly * prepaid_months
}
