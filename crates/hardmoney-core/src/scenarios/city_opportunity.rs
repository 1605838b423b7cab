use serde::{Deserialize, Serialize};

use crate::collaborators::TextCompletion;
use crate::error::HardMoneyError;
use crate::normalize::to_trimmed;
use crate::types::{AnalysisReport, RawDeal, UiMode};
use crate::HardMoneyResult;

/// Qualitative market read for a city. Produced by the completion
/// collaborator, validated here before it reaches any caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketAssessment {
    pub overall_rating: String,
    pub strategy_fit: StrategyFit,
    pub market_characteristics: Vec<String>,
    pub key_risks: Vec<String>,
    pub what_works_here: Vec<String>,
    pub what_to_avoid: Vec<String>,
    pub bottom_line: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyFit {
    pub fix_and_flip: String,
    pub buy_and_hold: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CityOpportunity {
    pub city: String,
    pub state: String,
    #[serde(flatten)]
    pub assessment: MarketAssessment,
}

/// Qualitative city-level opportunity read. The completion collaborator
/// is asked for JSON in a fixed shape; anything that fails to parse as
/// that shape is a schema failure, never a partial result.
pub fn city_opportunity(
    raw: &RawDeal,
    completion: &dyn TextCompletion,
) -> HardMoneyResult<AnalysisReport<CityOpportunity>> {
    let city = to_trimmed(raw.city.as_ref()).ok_or_else(|| HardMoneyError::missing("city"))?;
    let state = to_trimmed(raw.state.as_ref()).unwrap_or_default();

    let prompt = build_prompt(&city, &state);
    let reply = completion.complete(&prompt);

    let assessment: MarketAssessment =
        serde_json::from_str(strip_code_fence(&reply)).map_err(|e| {
            HardMoneyError::SchemaParseFailure {
                context: "city opportunity".into(),
                reason: e.to_string(),
            }
        })?;

    Ok(AnalysisReport::new(
        UiMode::CardCityOpportunity,
        CityOpportunity {
            city,
            state,
            assessment,
        },
    ))
}

fn build_prompt(city: &str, state: &str) -> String {
    format!(
        "\
You are a senior real estate investment analyst specializing in fix & flip
and rental underwriting.

Analyze the real estate investing opportunity in:

City: {city}
State: {state}

Focus on:
- Fix & flip viability
- Rehab risk
- Buyer demand
- Liquidity & resale velocity
- Rent strength (for exit flexibility)
- Market volatility risk

Rules:
- Do NOT fabricate statistics or cite exact numbers.
- Speak in ranges and qualitative terms.
- Be conservative and investor-focused.
- Assume a typical 3-6 month flip horizon.

Return JSON ONLY in this format:

{{
  \"overall_rating\": \"Strong | Neutral | Weak\",
  \"strategy_fit\": {{
    \"fix_and_flip\": \"Strong | Moderate | Weak\",
    \"buy_and_hold\": \"Strong | Moderate | Weak\"
  }},
  \"market_characteristics\": [
    \"bullet point\",
    \"bullet point\"
  ],
  \"key_risks\": [
    \"bullet point\",
    \"bullet point\"
  ],
  \"what_works_here\": [
    \"bullet point\",
    \"bullet point\"
  ],
  \"what_to_avoid\": [
    \"bullet point\",
    \"bullet point\"
  ],
  \"bottom_line\": \"1-2 sentence investor conclusion\"
}}"
    )
}

/// Providers asked for "JSON ONLY" still wrap replies in markdown fences
/// often enough that we strip one outer fence before parsing.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct CannedCompletion(&'static str);

    impl TextCompletion for CannedCompletion {
        fn complete(&self, _prompt: &str) -> String {
            self.0.to_string()
        }
    }

    struct PromptCapture(std::cell::RefCell<String>);

    impl TextCompletion for PromptCapture {
        fn complete(&self, prompt: &str) -> String {
            *self.0.borrow_mut() = prompt.to_string();
            VALID_REPLY.to_string()
        }
    }

    const VALID_REPLY: &str = r#"{
        "overall_rating": "Neutral",
        "strategy_fit": {"fix_and_flip": "Moderate", "buy_and_hold": "Strong"},
        "market_characteristics": ["Steady absorption", "Aging housing stock"],
        "key_risks": ["Thin buyer pool above median"],
        "what_works_here": ["Cosmetic rehabs near downtown"],
        "what_to_avoid": ["Heavy structural projects"],
        "bottom_line": "Workable market for disciplined operators."
    }"#;

    fn raw_with_city() -> RawDeal {
        RawDeal {
            city: Some("Tulsa".into()),
            state: Some("OK".into()),
            ..RawDeal::default()
        }
    }

    #[test]
    fn test_missing_city_is_an_error() {
        let raw = RawDeal::default();
        let err = city_opportunity(&raw, &CannedCompletion(VALID_REPLY)).unwrap_err();
        assert!(matches!(
            err,
            HardMoneyError::MissingField { ref field } if field == "city"
        ));

        // Whitespace-only city counts as missing.
        let raw = RawDeal {
            city: Some("   ".into()),
            ..RawDeal::default()
        };
        assert!(city_opportunity(&raw, &CannedCompletion(VALID_REPLY)).is_err());
    }

    #[test]
    fn test_valid_reply_produces_card() {
        let report = city_opportunity(&raw_with_city(), &CannedCompletion(VALID_REPLY)).unwrap();
        assert_eq!(report.ui_mode, UiMode::CardCityOpportunity);
        assert_eq!(report.response.city, "Tulsa");
        assert_eq!(report.response.state, "OK");
        assert_eq!(report.response.assessment.overall_rating, "Neutral");
        assert_eq!(report.response.assessment.strategy_fit.buy_and_hold, "Strong");
    }

    #[test]
    fn test_city_and_state_flatten_alongside_assessment() {
        let report = city_opportunity(&raw_with_city(), &CannedCompletion(VALID_REPLY)).unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["uiMode"], json!("CARD_CITY_OPPORTUNITY"));
        assert_eq!(value["response"]["city"], json!("Tulsa"));
        assert_eq!(value["response"]["overall_rating"], json!("Neutral"));
        assert!(value["response"].get("assessment").is_none());
    }

    #[test]
    fn test_fenced_reply_still_parses() {
        let fenced = format!("```json\n{VALID_REPLY}\n```");
        let leaked: &'static str = Box::leak(fenced.into_boxed_str());
        let report = city_opportunity(&raw_with_city(), &CannedCompletion(leaked)).unwrap();
        assert_eq!(report.response.assessment.overall_rating, "Neutral");
    }

    #[test]
    fn test_unparseable_reply_is_a_schema_failure() {
        let apology = crate::collaborators::COMPLETION_FAILURE_MESSAGE;
        let leaked: &'static str = Box::leak(apology.to_string().into_boxed_str());
        let err = city_opportunity(&raw_with_city(), &CannedCompletion(leaked)).unwrap_err();
        match err {
            HardMoneyError::SchemaParseFailure { context, .. } => {
                assert_eq!(context, "city opportunity")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_prompt_names_the_city_and_state() {
        let capture = PromptCapture(std::cell::RefCell::new(String::new()));
        city_opportunity(&raw_with_city(), &capture).unwrap();
        let prompt = capture.0.borrow();
        assert!(prompt.contains("City: Tulsa"));
        assert!(prompt.contains("State: OK"));
        assert!(prompt.contains("Return JSON ONLY"));
    }
}
