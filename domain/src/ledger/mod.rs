//! Ledger domain

pub mod popularity;

pub use popularity::{LedgerEntry, LedgerRecord, LedgerRecordEntry, PopularityLedger};
