//! Conversational intake: the ordered question list a caller walks a
//! borrower through before a full analysis can run. The engine never sees
//! a deal until every row here has an answer.

use serde::Serialize;
use serde_json::Value;

use crate::types::RawDeal;

/// One intake step: which deal field it fills and how to ask for it.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeQuestion {
    pub field: &'static str,
    pub question: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<&'static [&'static str]>,
}

pub const INTAKE_QUESTIONS: [IntakeQuestion; 11] = [
    IntakeQuestion {
        field: "loanProgram",
        question: "Which loan program are you using? (Fix & Flip, New Construction, or Cash-Out Refinance)",
        options: Some(&["fix_and_flip", "ground_up", "cash_out_refi"]),
    },
    IntakeQuestion {
        field: "transactionType",
        question: "Is this a purchase or a refinance?",
        options: Some(&["purchase", "refinance"]),
    },
    IntakeQuestion {
        field: "purchasePrice",
        question: "What is the purchase price (or original purchase price if refinance)?",
        options: None,
    },
    IntakeQuestion {
        field: "existingLoanBalance",
        question: "How much is currently owed on the property?",
        options: None,
    },
    IntakeQuestion {
        field: "address",
        question: "What is the property address?",
        options: None,
    },
    IntakeQuestion {
        field: "city",
        question: "What city is the property located in?",
        options: None,
    },
    IntakeQuestion {
        field: "arv",
        question: "What is the after-repair value (ARV)?",
        options: None,
    },
    IntakeQuestion {
        field: "rehabBudget",
        question: "What is the rehab budget?",
        options: None,
    },
    IntakeQuestion {
        field: "interestReserves",
        question: "How much cash do you have available to cover monthly interest payments during the project?",
        options: None,
    },
    IntakeQuestion {
        field: "creditScore",
        question: "What is the estimated credit score?",
        options: None,
    },
    IntakeQuestion {
        field: "experienceLevel",
        question: "How many flips have you completed? (0–2, 3–10, 10+)",
        options: Some(&["beginner", "intermediate", "pro"]),
    },
];

/// First unanswered intake question, or `None` when the deal is complete
/// and ready to underwrite. Empty and whitespace-only strings count as
/// unanswered.
pub fn next_question(raw: &RawDeal) -> Option<&'static IntakeQuestion> {
    INTAKE_QUESTIONS.iter().find(|q| !field_is_set(raw, q.field))
}

fn field_is_set(raw: &RawDeal, field: &str) -> bool {
    match field {
        "loanProgram" => string_set(&raw.loan_program),
        "transactionType" => string_set(&raw.transaction_type),
        "purchasePrice" => value_set(&raw.purchase_price),
        "existingLoanBalance" => value_set(&raw.existing_loan_balance),
        "address" => string_set(&raw.address),
        "city" => string_set(&raw.city),
        "arv" => value_set(&raw.arv),
        "rehabBudget" => value_set(&raw.rehab_budget),
        "interestReserves" => value_set(&raw.interest_reserves),
        "creditScore" => value_set(&raw.credit_score),
        "experienceLevel" => value_set(&raw.experience_level),
        _ => true,
    }
}

fn string_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

fn value_set(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}
