//! Actor persistence port
//!
//! Stores one record per actor keyed by `real_name`, plus the popularity
//! ledger. Loads are best-effort: anything unreadable is reported as
//! [`StoreError::NotFound`] or a typed error the caller may ignore.

use legion_domain::{ActorSnapshot, LedgerRecord};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No stored record for '{0}'")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

pub trait ActorStore: Send + Sync {
    fn load_actor(&self, real_name: &str) -> Result<ActorSnapshot, StoreError>;

    fn save_actor(&self, snapshot: &ActorSnapshot) -> Result<(), StoreError>;

    fn load_ledger(&self) -> Result<LedgerRecord, StoreError>;

    fn save_ledger(&self, record: &LedgerRecord) -> Result<(), StoreError>;
}

/// Store that remembers nothing, for one-off sessions
pub struct NoStore;

impl ActorStore for NoStore {
    fn load_actor(&self, real_name: &str) -> Result<ActorSnapshot, StoreError> {
        Err(StoreError::NotFound(real_name.to_string()))
    }

    fn save_actor(&self, _snapshot: &ActorSnapshot) -> Result<(), StoreError> {
        Ok(())
    }

    fn load_ledger(&self) -> Result<LedgerRecord, StoreError> {
        Err(StoreError::NotFound("ledger".to_string()))
    }

    fn save_ledger(&self, _record: &LedgerRecord) -> Result<(), StoreError> {
        Ok(())
    }
}
