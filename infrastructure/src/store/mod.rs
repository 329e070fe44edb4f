//! Actor persistence adapters

mod json_store;

pub use json_store::{JsonActorStore, LEDGER_FILE, default_cache_dir};
