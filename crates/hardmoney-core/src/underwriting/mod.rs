pub mod engine;
pub mod intake;
pub mod pricing;
pub mod session;
pub mod verdict;

pub use engine::{underwrite, underwrite_raw, DealAnalysis};
pub use verdict::{FirstSummary, RandomSummaries, SummarySource, VerdictRating};
