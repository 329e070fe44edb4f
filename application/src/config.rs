//! Application-level configuration.
//!
//! [`SessionConfig`] controls how a session behaves: pool bounds, persistence
//! cadence, popular-recall sizes, backend timeouts and the verbose / speech
//! toggles the REPL flips at runtime.

use legion_domain::DEFAULT_POOL_LIMIT;
use std::time::Duration;

/// Default time allowed for a single backend call
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Upper bound on active pool members
    pub pool_limit: usize,
    /// Persist the ledger every N rounds
    pub save_every: u32,
    /// How many popular actors a recall invites
    pub recall_size: usize,
    /// How many top ledger entries a recall draws from
    pub recall_pool: usize,
    /// Default-roster actors seeded at session start
    pub initial_pool_size: usize,
    /// Maximum time to wait for a backend reply. `None` waits forever.
    pub timeout: Option<Duration>,
    /// Report behavior rolls, votes and consolidation details
    pub verbose: bool,
    /// Read generated turns aloud
    pub speech: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pool_limit: DEFAULT_POOL_LIMIT,
            save_every: 5,
            recall_size: 2,
            recall_pool: 5,
            initial_pool_size: 1,
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            verbose: false,
            speech: false,
        }
    }
}

impl SessionConfig {
    pub fn with_pool_limit(mut self, limit: usize) -> Self {
        self.pool_limit = limit.max(1);
        self
    }

    pub fn with_save_every(mut self, rounds: u32) -> Self {
        self.save_every = rounds;
        self
    }

    pub fn with_recall(mut self, size: usize, pool: usize) -> Self {
        self.recall_size = size;
        self.recall_pool = pool;
        self
    }

    pub fn with_initial_pool_size(mut self, size: usize) -> Self {
        self.initial_pool_size = size;
        self
    }

    /// Timeout in seconds; zero disables it
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout = (seconds > 0).then(|| Duration::from_secs(seconds));
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_speech(mut self, speech: bool) -> Self {
        self.speech = speech;
        self
    }

    /// Whether the ledger is due for saving after `round` completed rounds
    pub fn ledger_due(&self, round: u64) -> bool {
        self.save_every > 0 && round > 0 && round % u64::from(self.save_every) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.pool_limit, 5);
        assert_eq!(config.save_every, 5);
        assert_eq!((config.recall_size, config.recall_pool), (2, 5));
        assert_eq!(config.timeout, Some(Duration::from_secs(120)));
        assert!(!config.verbose && !config.speech);
    }

    #[test]
    fn test_zero_timeout_disables() {
        assert_eq!(SessionConfig::default().with_timeout_seconds(0).timeout, None);
    }

    #[test]
    fn test_ledger_due() {
        let config = SessionConfig::default();
        assert!(!config.ledger_due(0));
        assert!(!config.ledger_due(4));
        assert!(config.ledger_due(5));
        assert!(config.ledger_due(10));
        assert!(!SessionConfig::default().with_save_every(0).ledger_due(5));
    }
}
