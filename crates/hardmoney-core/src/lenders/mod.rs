//! Local lender discovery: dedupe raw directory results, score them by
//! reputation, and attach estimated program terms.

pub mod ranking;
pub mod search;

pub use ranking::{enrich_lenders, normalize_lenders, reputation_score, EnrichedLender, LenderRecord};
pub use search::{compare_lenders, find_lenders, LenderComparison, LenderResults, LenderSearch, ScoredLender};
