use serde_json::{json, Value};

use hardmoney_core::underwriting::intake::next_question;
use hardmoney_core::underwriting::session::session_title;

use super::underwrite::DealArgs;

/// Show the next unanswered intake question, or report the deal complete.
pub fn run_intake(args: DealArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = args.resolve()?;
    match next_question(&raw) {
        Some(q) => Ok(serde_json::to_value(q)?),
        None => Ok(json!({ "complete": true })),
    }
}

pub fn run_session_title(args: DealArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = args.resolve()?;
    Ok(json!({ "title": session_title(&raw) }))
}
