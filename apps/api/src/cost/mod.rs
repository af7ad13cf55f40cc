// Cost accounting: per-tier token pricing and the persisted running total.

pub mod ledger;
pub mod pricing;

pub use ledger::{CostLedger, LedgerError};
pub use pricing::ModelTier;
