pub mod collaborators;
pub mod error;
pub mod normalize;
pub mod types;

#[cfg(feature = "underwriting")]
pub mod underwriting;

#[cfg(feature = "scenarios")]
pub mod scenarios;

#[cfg(feature = "lenders")]
pub mod lenders;

pub use error::HardMoneyError;
pub use types::*;

/// Standard result type for all underwriting operations
pub type HardMoneyResult<T> = Result<T, HardMoneyError>;
