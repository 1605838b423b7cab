use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::LoanProgram;

/// Review counts above this add nothing to the score, so a national
/// chain with thousands of reviews cannot bury a well-rated local shop.
const REVIEW_CAP: u32 = 200;

/// A lender as it comes back from the local-business directory. Ratings
/// and review counts are frequently absent for small shops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LenderRecord {
    pub name: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub rating: Option<Decimal>,
    #[serde(default)]
    pub reviews: Option<u32>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub source: String,
}

/// Estimated pricing band inferred from the lender's market segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EstimatedTerms {
    pub rate: &'static str,
    pub points: &'static str,
    pub ltv: &'static str,
    pub speed: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichedLender {
    #[serde(flatten)]
    pub record: LenderRecord,
    pub grade: &'static str,
    #[serde(rename = "gradeEmoji")]
    pub grade_emoji: &'static str,
    pub score: Decimal,
    #[serde(rename = "estimatedTerms")]
    pub estimated_terms: EstimatedTerms,
    pub summary: String,
}

/// Drop duplicate directory entries, keyed by website, else phone, else
/// lowercased name. Entries with no usable key are dropped; the first
/// occurrence of a key wins.
pub fn normalize_lenders(lenders: Vec<LenderRecord>) -> Vec<LenderRecord> {
    let mut seen = std::collections::HashSet::new();
    lenders
        .into_iter()
        .filter(|lender| {
            let key = if !lender.website.is_empty() {
                lender.website.clone()
            } else if let Some(phone) = lender.phone.as_ref().filter(|p| !p.is_empty()) {
                phone.clone()
            } else {
                lender.name.to_lowercase()
            };
            !key.is_empty() && seen.insert(key)
        })
        .collect()
}

/// Reputation score: rating dominates, review volume breaks ties.
pub fn reputation_score(rating: Option<Decimal>, reviews: Option<u32>) -> Decimal {
    let rating = rating.unwrap_or(Decimal::ZERO);
    let reviews = Decimal::from(reviews.unwrap_or(0).min(REVIEW_CAP));
    (rating * dec!(10) + reviews * dec!(0.05)).round_dp(2)
}

/// Attach grade, score, and estimated terms. The grade is a name-based
/// segment heuristic: "capital"/"private" shops price tightest,
/// "mortgage"/"lending" outfits sit mid-band, everything else is assumed
/// slow and expensive until proven otherwise.
pub fn enrich_lenders(lenders: Vec<LenderRecord>, program: LoanProgram) -> Vec<EnrichedLender> {
    lenders
        .into_iter()
        .map(|record| {
            let name = record.name.to_lowercase();
            let (grade, grade_emoji, speed, rate, points) =
                if name.contains("capital") || name.contains("private") {
                    ("A", "🟢⭐", "Fast", "10.5–11.5%", "2–3")
                } else if name.contains("mortgage") || name.contains("lending") {
                    ("B", "🟡👍", "Moderate", "11.5–12.5%", "3–4")
                } else {
                    ("C", "🔴⚠️", "Slow", "12–14%", "4–5")
                };

            let score = reputation_score(record.rating, record.reviews);
            let summary = format!(
                "Investor-friendly lender with experience in {} deals.",
                program.label()
            );

            EnrichedLender {
                record,
                grade,
                grade_emoji,
                score,
                estimated_terms: EstimatedTerms {
                    rate,
                    points,
                    ltv: "65–70% ARV",
                    speed,
                },
                summary,
            }
        })
        .collect()
}
