use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::HardMoneyError;
use crate::normalize::{to_number, to_trimmed};
use crate::HardMoneyResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as percentages (11.0 = 11%), matching lender sheets.
pub type Rate = Decimal;

/// The three short-term loan programs underwritten by this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanProgram {
    FixAndFlip,
    GroundUp,
    CashOutRefi,
}

impl LoanProgram {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanProgram::FixAndFlip => "fix_and_flip",
            LoanProgram::GroundUp => "ground_up",
            LoanProgram::CashOutRefi => "cash_out_refi",
        }
    }

    /// Human-readable form used in templated copy ("fix and flip deals").
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl FromStr for LoanProgram {
    type Err = HardMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fix_and_flip" => Ok(LoanProgram::FixAndFlip),
            "ground_up" => Ok(LoanProgram::GroundUp),
            "cash_out_refi" => Ok(LoanProgram::CashOutRefi),
            other => Err(HardMoneyError::InvalidInput {
                field: "loanProgram".into(),
                reason: format!("Unknown loan program '{other}'"),
            }),
        }
    }
}

impl fmt::Display for LoanProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Purchase vs refinance. A `cash_out_refi` transaction string is a
/// refinance; anything unrecognized defaults to purchase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    #[default]
    Purchase,
    Refinance,
}

impl TransactionType {
    pub fn from_wire(s: Option<&str>) -> Self {
        match s.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("refinance") | Some("cash_out_refi") => TransactionType::Refinance,
            _ => TransactionType::Purchase,
        }
    }

    pub fn is_refinance(&self) -> bool {
        matches!(self, TransactionType::Refinance)
    }
}

/// Borrower track record, which prices into the rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Pro,
}

impl ExperienceLevel {
    /// Accepts either a tier name or a free-text flip count
    /// ("7" normalizes to intermediate; 0-2 beginner, 3-10 intermediate,
    /// 11+ pro).
    pub fn from_wire(value: Option<&Value>) -> Option<Self> {
        match value? {
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                if let Ok(flips) = trimmed.parse::<u32>() {
                    return Some(Self::from_flip_count(flips));
                }
                match trimmed.to_ascii_lowercase().as_str() {
                    "beginner" => Some(ExperienceLevel::Beginner),
                    "intermediate" => Some(ExperienceLevel::Intermediate),
                    "pro" => Some(ExperienceLevel::Pro),
                    _ => None,
                }
            }
            Value::Number(n) => n.as_u64().map(|f| Self::from_flip_count(f as u32)),
            _ => None,
        }
    }

    pub fn from_flip_count(flips: u32) -> Self {
        if flips <= 2 {
            ExperienceLevel::Beginner
        } else if flips <= 10 {
            ExperienceLevel::Intermediate
        } else {
            ExperienceLevel::Pro
        }
    }
}

/// Prior loan terms carried on a deal that already went through a full
/// analysis. DSCR refinance prefers this bridge-loan amount over a
/// user-entered payoff balance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriorTerms {
    #[serde(default)]
    pub loan_amount: Option<Value>,
}

/// The loose input record as it arrives off the wire: monetary fields may
/// be JSON numbers or formatted strings, and almost everything is
/// optional. `Deal::from_raw` is the only path into the strict form the
/// engine accepts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDeal {
    pub transaction_type: Option<String>,
    pub loan_program: Option<String>,
    pub purchase_price: Option<Value>,
    pub arv: Option<Value>,
    pub rehab_budget: Option<Value>,
    pub existing_loan_balance: Option<Value>,
    pub interest_reserves: Option<Value>,
    pub monthly_rent: Option<Value>,
    pub credit_score: Option<Value>,
    pub experience_level: Option<Value>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub user_id: Option<String>,
    /// Terms from a previous bridge-loan analysis, if the caller threaded
    /// one through (nested object; only `loan_amount` is read).
    pub terms: Option<PriorTerms>,
}

/// Strictly-typed deal the underwriting engine computes over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub transaction_type: TransactionType,
    pub program: LoanProgram,
    pub purchase_price: Money,
    pub arv: Money,
    pub rehab_budget: Money,
    pub existing_loan_balance: Money,
    pub interest_reserves: Option<Money>,
    pub experience: Option<ExperienceLevel>,
    pub monthly_rent: Option<Money>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
}

impl Deal {
    /// Normalize a wire-shaped deal into the strict form, failing with
    /// `MissingField` when the program or either required valuation
    /// number is absent or unparseable, and `InvalidInput` when a
    /// valuation is zero or negative. Loan sizing and the points
    /// schedule require positive valuations, so nothing non-positive
    /// may pass this boundary.
    pub fn from_raw(raw: &RawDeal) -> HardMoneyResult<Deal> {
        let program_str =
            to_trimmed(raw.loan_program.as_ref()).ok_or_else(|| HardMoneyError::missing("loanProgram"))?;
        let program: LoanProgram = program_str
            .parse()
            .map_err(|_| HardMoneyError::missing("loanProgram"))?;

        let purchase_price = to_number(raw.purchase_price.as_ref())
            .ok_or_else(|| HardMoneyError::missing("purchasePrice"))?;
        let arv = to_number(raw.arv.as_ref()).ok_or_else(|| HardMoneyError::missing("arv"))?;

        if purchase_price <= Decimal::ZERO {
            return Err(HardMoneyError::invalid("purchasePrice", "must be a positive amount"));
        }
        if arv <= Decimal::ZERO {
            return Err(HardMoneyError::invalid("arv", "must be a positive amount"));
        }

        Ok(Deal {
            transaction_type: TransactionType::from_wire(raw.transaction_type.as_deref()),
            program,
            purchase_price,
            arv,
            rehab_budget: to_number(raw.rehab_budget.as_ref()).unwrap_or(Decimal::ZERO),
            existing_loan_balance: to_number(raw.existing_loan_balance.as_ref())
                .unwrap_or(Decimal::ZERO),
            interest_reserves: to_number(raw.interest_reserves.as_ref()),
            experience: ExperienceLevel::from_wire(raw.experience_level.as_ref()),
            monthly_rent: to_number(raw.monthly_rent.as_ref()),
            city: to_trimmed(raw.city.as_ref()),
            state: to_trimmed(raw.state.as_ref()),
            address: to_trimmed(raw.address.as_ref()),
        })
    }
}

/// Presentation tag the surrounding service uses to pick a card renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiMode {
    #[serde(rename = "CARD_DEAL")]
    CardDeal,
    #[serde(rename = "CARD_STRESS_TEST")]
    CardStressTest,
    #[serde(rename = "CARD_WORST_CASE")]
    CardWorstCase,
    #[serde(rename = "CARD_HOLD_SENSITIVITY")]
    CardHoldSensitivity,
    #[serde(rename = "CARD_APR_RISK")]
    CardAprRisk,
    #[serde(rename = "CARD_CASH_TO_CLOSE")]
    CardCashToClose,
    #[serde(rename = "CHAT_DSCR")]
    ChatDscr,
    #[serde(rename = "CARD_CITY_OPPORTUNITY")]
    CardCityOpportunity,
    #[serde(rename = "CHAT_LENDER_RESULTS")]
    ChatLenderResults,
    #[serde(rename = "CARD_LENDER_COMPARE")]
    CardLenderCompare,
    #[serde(rename = "CHAT")]
    Chat,
}

/// Envelope wrapping every analyzer output with its UI-mode tag.
/// Ephemeral, computed per request; persistence belongs to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport<T: Serialize> {
    #[serde(rename = "uiMode")]
    pub ui_mode: UiMode,
    pub response: T,
}

impl<T: Serialize> AnalysisReport<T> {
    pub fn new(ui_mode: UiMode, response: T) -> Self {
        AnalysisReport { ui_mode, response }
    }
}

/// Conversational fallback when an analyzer still needs an input from
/// the user (DSCR refinance asks for rent and city rather than failing).
#[derive(Debug, Clone, Serialize)]
pub struct ChatPrompt {
    #[serde(rename = "uiMode")]
    pub ui_mode: UiMode,
    #[serde(rename = "pendingField")]
    pub pending_field: String,
    pub response: String,
}

impl ChatPrompt {
    pub fn new(pending_field: &str, question: &str) -> Self {
        ChatPrompt {
            ui_mode: UiMode::Chat,
            pending_field: pending_field.to_string(),
            response: question.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn sample_raw() -> RawDeal {
        RawDeal {
            transaction_type: Some("purchase".into()),
            loan_program: Some("fix_and_flip".into()),
            purchase_price: Some(json!("$200,000")),
            arv: Some(json!(320000)),
            rehab_budget: Some(json!(40000)),
            experience_level: Some(json!("beginner")),
            city: Some("Austin".into()),
            state: Some("TX".into()),
            ..RawDeal::default()
        }
    }

    #[test]
    fn test_from_raw_normalizes_monetary_strings() {
        let deal = Deal::from_raw(&sample_raw()).unwrap();
        assert_eq!(deal.purchase_price, dec!(200000));
        assert_eq!(deal.arv, dec!(320000));
        assert_eq!(deal.rehab_budget, dec!(40000));
        assert_eq!(deal.existing_loan_balance, dec!(0));
        assert_eq!(deal.program, LoanProgram::FixAndFlip);
        assert_eq!(deal.experience, Some(ExperienceLevel::Beginner));
    }

    #[test]
    fn test_from_raw_requires_program_and_valuations() {
        let mut raw = sample_raw();
        raw.loan_program = None;
        assert!(matches!(
            Deal::from_raw(&raw),
            Err(HardMoneyError::MissingField { ref field }) if field == "loanProgram"
        ));

        let mut raw = sample_raw();
        raw.purchase_price = Some(json!("tbd"));
        assert!(matches!(
            Deal::from_raw(&raw),
            Err(HardMoneyError::MissingField { ref field }) if field == "purchasePrice"
        ));

        let mut raw = sample_raw();
        raw.arv = None;
        assert!(matches!(
            Deal::from_raw(&raw),
            Err(HardMoneyError::MissingField { ref field }) if field == "arv"
        ));
    }

    #[test]
    fn test_from_raw_rejects_non_positive_valuations() {
        let mut raw = sample_raw();
        raw.arv = Some(json!(0));
        assert!(matches!(
            Deal::from_raw(&raw),
            Err(HardMoneyError::InvalidInput { ref field, .. }) if field == "arv"
        ));

        let mut raw = sample_raw();
        raw.purchase_price = Some(json!(-50000));
        assert!(matches!(
            Deal::from_raw(&raw),
            Err(HardMoneyError::InvalidInput { ref field, .. }) if field == "purchasePrice"
        ));
    }

    #[test]
    fn test_transaction_type_normalization() {
        assert_eq!(
            TransactionType::from_wire(Some("cash_out_refi")),
            TransactionType::Refinance
        );
        assert_eq!(
            TransactionType::from_wire(Some("REFINANCE ")),
            TransactionType::Refinance
        );
        assert_eq!(TransactionType::from_wire(Some("purchase")), TransactionType::Purchase);
        assert_eq!(TransactionType::from_wire(Some("wholesale")), TransactionType::Purchase);
        assert_eq!(TransactionType::from_wire(None), TransactionType::Purchase);
    }

    #[test]
    fn test_experience_from_flip_count() {
        assert_eq!(
            ExperienceLevel::from_wire(Some(&json!("0"))),
            Some(ExperienceLevel::Beginner)
        );
        assert_eq!(
            ExperienceLevel::from_wire(Some(&json!("7"))),
            Some(ExperienceLevel::Intermediate)
        );
        assert_eq!(
            ExperienceLevel::from_wire(Some(&json!(12))),
            Some(ExperienceLevel::Pro)
        );
        assert_eq!(
            ExperienceLevel::from_wire(Some(&json!("pro"))),
            Some(ExperienceLevel::Pro)
        );
        assert_eq!(ExperienceLevel::from_wire(Some(&json!("unknown"))), None);
        assert_eq!(ExperienceLevel::from_wire(None), None);
    }

    #[test]
    fn test_raw_deal_deserializes_camel_case() {
        let raw: RawDeal = serde_json::from_value(json!({
            "transactionType": "refinance",
            "loanProgram": "cash_out_refi",
            "purchasePrice": 150000,
            "arv": "400000",
            "existingLoanBalance": "$120,000",
            "terms": { "loan_amount": 210000, "interest_rate": 11.0 }
        }))
        .unwrap();

        assert_eq!(raw.transaction_type.as_deref(), Some("refinance"));
        let deal = Deal::from_raw(&raw).unwrap();
        assert_eq!(deal.existing_loan_balance, dec!(120000));
        assert!(deal.transaction_type.is_refinance());
    }
}
