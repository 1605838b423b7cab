//! What-if analyzers layered on the underwriting engine. Each one clones
//! the deal, re-runs the engine with perturbed inputs, and post-processes
//! the deltas into a specialized report. None of them hold state.

pub mod apr_risk;
pub mod cash_to_close;
pub mod city_opportunity;
pub mod hold_sensitivity;
pub mod refi_dscr;
pub mod stress_test;
pub mod worst_case;

pub use apr_risk::apr_and_default_risk;
pub use cash_to_close::cash_to_close;
pub use city_opportunity::city_opportunity;
pub use hold_sensitivity::hold_time_sensitivity;
pub use refi_dscr::refi_dscr;
pub use stress_test::stress_test;
pub use worst_case::worst_case;
