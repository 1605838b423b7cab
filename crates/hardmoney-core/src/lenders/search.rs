use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::HardMoneyError;
use crate::lenders::ranking::{
    enrich_lenders, normalize_lenders, reputation_score, EnrichedLender, LenderRecord,
};
use crate::normalize::to_trimmed;
use crate::types::{AnalysisReport, LoanProgram, RawDeal, UiMode};
use crate::HardMoneyResult;

/// How many raw results to pull before dedupe trims them down.
const SEARCH_POOL: usize = 20;
/// Lenders shown in discovery results.
const DISCOVERY_LIMIT: usize = 10;
/// Lenders shown in the ranked comparison.
const COMPARE_LIMIT: usize = 8;

const COMPARE_NOTE: &str =
    "Rank uses rating + review volume. Always confirm actual terms, licensing, and program fit.";

/// Local-business directory lookup. Implementations talk to whatever
/// directory backs them; failures surface as `UpstreamUnavailable`.
pub trait LenderSearch {
    fn search(&self, city: &str, state: &str, limit: usize) -> HardMoneyResult<Vec<LenderRecord>>;
}

#[derive(Debug, Clone, Serialize)]
pub struct LenderResults {
    pub city: String,
    pub state: String,
    pub lenders: Vec<EnrichedLender>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredLender {
    #[serde(flatten)]
    pub record: LenderRecord,
    pub score: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct LenderComparison {
    pub city: String,
    pub state: String,
    pub program: String,
    pub query: String,
    pub lenders: Vec<ScoredLender>,
    pub note: &'static str,
}

fn city_and_program(raw: &RawDeal) -> HardMoneyResult<(String, String, LoanProgram)> {
    let city = to_trimmed(raw.city.as_ref()).ok_or_else(|| HardMoneyError::missing("city"))?;
    let state = to_trimmed(raw.state.as_ref()).unwrap_or_default();
    let program = raw
        .loan_program
        .as_deref()
        .and_then(|p| p.parse::<LoanProgram>().ok())
        .unwrap_or(LoanProgram::FixAndFlip);
    Ok((city, state, program))
}

/// Discover local lenders: over-fetch, dedupe, keep the first ten, and
/// attach grades and estimated terms.
pub fn find_lenders(
    raw: &RawDeal,
    directory: &dyn LenderSearch,
) -> HardMoneyResult<AnalysisReport<LenderResults>> {
    let (city, state, program) = city_and_program(raw)?;

    let mut cleaned = normalize_lenders(directory.search(&city, &state, SEARCH_POOL)?);
    cleaned.truncate(DISCOVERY_LIMIT);
    let lenders = enrich_lenders(cleaned, program);

    Ok(AnalysisReport::new(
        UiMode::ChatLenderResults,
        LenderResults { city, state, lenders },
    ))
}

/// Rank local lenders by reputation score, best first, top eight.
pub fn compare_lenders(
    raw: &RawDeal,
    directory: &dyn LenderSearch,
) -> HardMoneyResult<AnalysisReport<LenderComparison>> {
    let (city, state, program) = city_and_program(raw)?;

    let location = if state.is_empty() {
        city.clone()
    } else {
        format!("{city}, {state}")
    };
    let query = format!("hard money lender {location}");

    let mut scored: Vec<ScoredLender> = directory
        .search(&city, &state, DISCOVERY_LIMIT)?
        .into_iter()
        .map(|record| ScoredLender {
            score: reputation_score(record.rating, record.reviews),
            record,
        })
        .collect();

    // Stable sort keeps directory order among equal scores.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(COMPARE_LIMIT);

    Ok(AnalysisReport::new(
        UiMode::CardLenderCompare,
        LenderComparison {
            city,
            state,
            program: program.as_str().to_string(),
            query,
            lenders: scored,
            note: COMPARE_NOTE,
        },
    ))
}
