//! Deal-session helpers: the human-friendly session title and the
//! serializable payload snapshots handed to a `SessionStore`. The storage
//! schema itself is the caller's concern.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::normalize::{to_number, to_trimmed};
use crate::types::{RawDeal, TransactionType};
use crate::underwriting::engine::DealAnalysis;
use crate::HardMoneyResult;

/// Build the sidebar title for a new deal session, e.g.
/// "Austin · Purchase · $200,000". Empty parts are skipped; a deal with
/// nothing usable titles as "New Deal".
pub fn session_title(raw: &RawDeal) -> String {
    let transaction = TransactionType::from_wire(raw.transaction_type.as_deref());
    let label = match transaction {
        TransactionType::Refinance => "Refi",
        TransactionType::Purchase => "Purchase",
    };

    // Refis headline the payoff balance; purchases the price. Either way
    // fall back to the purchase price if the preferred field is unset.
    let amount = match transaction {
        TransactionType::Purchase => to_number(raw.purchase_price.as_ref()),
        TransactionType::Refinance => to_number(raw.existing_loan_balance.as_ref())
            .filter(|a| !a.is_zero())
            .or_else(|| to_number(raw.purchase_price.as_ref())),
    };

    let mut parts: Vec<String> = Vec::new();

    if let Some(city) = to_trimmed(raw.city.as_ref()) {
        parts.push(city);
    }

    parts.push(label.to_string());

    if let Some(amount) = amount.filter(|a| !a.is_zero()) {
        parts.push(format!("${}", format_thousands(amount)));
    }

    let title = parts.join(" · ");
    if title.is_empty() {
        "New Deal".to_string()
    } else {
        title
    }
}

/// Snapshot of the user's submitted deal, as stored on the session.
pub fn deal_payload(raw: &RawDeal) -> HardMoneyResult<Value> {
    Ok(serde_json::to_value(raw)?)
}

/// Snapshot of a completed analysis, as stored on the session.
pub fn analysis_payload(analysis: &DealAnalysis) -> HardMoneyResult<Value> {
    Ok(serde_json::to_value(analysis)?)
}

/// Whole-dollar rendering with thousands separators (truncates cents).
fn format_thousands(amount: Decimal) -> String {
    let whole = amount.trunc().to_string();
    let (sign, digits) = match whole.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", whole.as_str()),
    };

    let mut grouped = String::new();
    let bytes = digits.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*b as char);
    }

    format!("{sign}{grouped}")
}
