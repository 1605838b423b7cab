//! Contracts the core expects from its external collaborators. The
//! collaborators themselves (billing, AI completion, persistence) live in
//! the surrounding service; the core only defines the trait boundary and
//! the failure semantics it relies on.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::HardMoneyError;
use crate::HardMoneyResult;

/// Fixed reply a `TextCompletion` implementation must return when the
/// provider call fails. Callers treat it as degraded output, not an error.
pub const COMPLETION_FAILURE_MESSAGE: &str = "Sorry — the AI failed to generate a response.";

/// Bound on any single completion call. Implementations must not hang
/// past this; on timeout they return `COMPLETION_FAILURE_MESSAGE`.
pub const COMPLETION_TIMEOUT_SECS: u64 = 30;

/// Black-box text completion: prompt in, text out. Infallible by design;
/// transport failures degrade to the fixed apology string. Callers
/// needing structured output validate the response themselves.
pub trait TextCompletion {
    fn complete(&self, prompt: &str) -> String;
}

/// Outcome of a credit/entitlement charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeOutcome {
    Granted,
    InsufficientCredits,
    Unauthorized,
}

/// Credit/entitlement gate consulted strictly before any billable
/// computation runs.
pub trait EntitlementGate {
    fn charge(&self, user_id: &str, action_type: &str, reference_id: Option<&str>) -> ChargeOutcome;
}

/// Charge one credit for a billable action, mapping denial to a domain
/// error so no computation runs on an unpaid request.
pub fn require_credit(
    gate: &dyn EntitlementGate,
    user_id: Option<&str>,
    action: AnalysisAction,
    reference_id: Option<&str>,
) -> HardMoneyResult<()> {
    let user_id = user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| HardMoneyError::EntitlementDenied("Unauthorized".into()))?;

    match gate.charge(user_id, &action.action_type(), reference_id) {
        ChargeOutcome::Granted => Ok(()),
        ChargeOutcome::InsufficientCredits => Err(HardMoneyError::EntitlementDenied(
            "Out of credits. Upgrade to Pro or Premium to continue.".into(),
        )),
        ChargeOutcome::Unauthorized => Err(HardMoneyError::EntitlementDenied("Unauthorized".into())),
    }
}

/// Who authored a persisted session message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSender {
    User,
    Assistant,
}

impl MessageSender {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageSender::User => "user",
            MessageSender::Assistant => "assistant",
        }
    }
}

/// Session/message persistence. The core produces fully-serializable
/// payloads; the storage schema is the caller's concern.
pub trait SessionStore {
    fn create_session(&self, user_id: &str, title: &str) -> HardMoneyResult<String>;
    fn append_message(
        &self,
        session_id: &str,
        sender: MessageSender,
        payload: &Value,
    ) -> HardMoneyResult<()>;
}

/// The billable analyses this engine offers. Every one costs a credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisAction {
    DealAnalysis,
    StressTest,
    WorstCase,
    HoldSensitivity,
    AprRisk,
    CashToClose,
    RefiDscr,
    CityOpportunity,
    FindLenders,
    CompareLenders,
}

impl AnalysisAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisAction::DealAnalysis => "deal_analysis",
            AnalysisAction::StressTest => "stress_test",
            AnalysisAction::WorstCase => "worst_case",
            AnalysisAction::HoldSensitivity => "hold_sensitivity",
            AnalysisAction::AprRisk => "apr_risk",
            AnalysisAction::CashToClose => "cash_to_close",
            AnalysisAction::RefiDscr => "refi_dscr",
            AnalysisAction::CityOpportunity => "city_opportunity",
            AnalysisAction::FindLenders => "find_lenders",
            AnalysisAction::CompareLenders => "compare_lenders",
        }
    }

    /// Usage-log action type. Full deal analysis bills under its own
    /// name; everything else is logged as an action.
    pub fn action_type(&self) -> String {
        match self {
            AnalysisAction::DealAnalysis => "deal_analysis".to_string(),
            other => format!("action:{}", other.as_str()),
        }
    }
}

impl FromStr for AnalysisAction {
    type Err = HardMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deal_analysis" => Ok(AnalysisAction::DealAnalysis),
            "stress_test" => Ok(AnalysisAction::StressTest),
            "worst_case" => Ok(AnalysisAction::WorstCase),
            "hold_sensitivity" => Ok(AnalysisAction::HoldSensitivity),
            "apr_risk" => Ok(AnalysisAction::AprRisk),
            "cash_to_close" => Ok(AnalysisAction::CashToClose),
            "refi_dscr" => Ok(AnalysisAction::RefiDscr),
            "city_opportunity" => Ok(AnalysisAction::CityOpportunity),
            "find_lenders" => Ok(AnalysisAction::FindLenders),
            "compare_lenders" => Ok(AnalysisAction::CompareLenders),
            other => Err(HardMoneyError::InvalidInput {
                field: "action".into(),
                reason: format!("Unsupported action '{other}'"),
            }),
        }
    }
}

impl fmt::Display for AnalysisAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
