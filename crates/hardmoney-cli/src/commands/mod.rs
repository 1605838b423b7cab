pub mod intake;
pub mod lenders;
pub mod scenarios;
pub mod underwrite;
