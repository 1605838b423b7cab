//! Verdict rating plus the narrative summary pools. The rating is a
//! computed field; the summary line is cosmetic flavor text picked from a
//! fixed pool per rating. Selection goes through `SummarySource` so
//! production can randomize while tests stay deterministic.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Qualitative deal classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictRating {
    #[serde(rename = "Strong Deal")]
    Strong,
    #[serde(rename = "Borderline Deal")]
    Borderline,
    #[serde(rename = "Weak Deal")]
    Weak,
}

impl VerdictRating {
    pub fn label(&self) -> &'static str {
        match self {
            VerdictRating::Strong => "Strong Deal",
            VerdictRating::Borderline => "Borderline Deal",
            VerdictRating::Weak => "Weak Deal",
        }
    }
}

pub const STRONG_SUMMARIES: [&str; 4] = [
    "🔥 Strong deal with healthy margins and lender-friendly leverage.",
    "💪 Strong deal — pricing reflects experience and solid execution upside.",
    "🚀 Strong opportunity with room for market or rehab variance.",
    "🔥💰 Attractive risk-adjusted return based on current assumptions.",
];

pub const BORDERLINE_SUMMARIES: [&str; 4] = [
    "⚠️ Borderline deal — margins tighten quickly if costs increase.",
    "🟡 Deal pencils, but execution discipline matters.",
    "📉 Acceptable return, though sensitive to rehab or timeline overruns.",
    "⚠️ Works on paper, but limited buffer for surprises.",
];

pub const WEAK_SUMMARIES: [&str; 4] = [
    "❌ Weak deal — return does not justify the risk profile.",
    "🚫 Capital may be better deployed into a higher-margin opportunity.",
    "⚠️ Thin margins with little room for error.",
    "📉 Risk outweighs projected reward under current assumptions.",
];

/// Fixed summary for an overleveraged refinance; bypasses the pools.
pub const OVERLEVERAGED_SUMMARY: &str = "❌ Refinance does not cover existing lien payoff + costs. \
     Borrower is short to close and property is overleveraged.";

pub fn summary_pool(rating: VerdictRating) -> &'static [&'static str] {
    match rating {
        VerdictRating::Strong => &STRONG_SUMMARIES,
        VerdictRating::Borderline => &BORDERLINE_SUMMARIES,
        VerdictRating::Weak => &WEAK_SUMMARIES,
    }
}

/// Strategy for choosing a verdict summary line. Must not influence any
/// numeric field of the analysis.
pub trait SummarySource {
    fn pick(&self, rating: VerdictRating, pool: &[&'static str]) -> String;
}

/// Production source: uniform random choice from the pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSummaries;

impl SummarySource for RandomSummaries {
    fn pick(&self, _rating: VerdictRating, pool: &[&'static str]) -> String {
        pool.choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or("Deal analysis complete.")
            .to_string()
    }
}

/// Deterministic source for tests: always the first pool entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstSummary;

impl SummarySource for FirstSummary {
    fn pick(&self, _rating: VerdictRating, pool: &[&'static str]) -> String {
        pool.first().copied().unwrap_or("Deal analysis complete.").to_string()
    }
}
