//! Session configuration from TOML (`[session]` section)

use legion_application::SessionConfig;
use legion_domain::DEFAULT_POOL_LIMIT;
use serde::{Deserialize, Serialize};

/// Raw session configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    pub pool_limit: usize,
    /// Persist the ledger every N rounds; 0 saves only at exit
    pub save_every: u32,
    pub recall_size: usize,
    pub recall_pool: usize,
    pub initial_pool_size: usize,
    pub verbose: bool,
    pub speech: bool,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        let defaults = SessionConfig::default();
        Self {
            pool_limit: DEFAULT_POOL_LIMIT,
            save_every: defaults.save_every,
            recall_size: defaults.recall_size,
            recall_pool: defaults.recall_pool,
            initial_pool_size: defaults.initial_pool_size,
            verbose: defaults.verbose,
            speech: defaults.speech,
        }
    }
}

impl FileSessionConfig {
    /// Build the application config, taking the timeout from `[backend]`
    pub fn to_session_config(&self, timeout_secs: u64) -> SessionConfig {
        SessionConfig::default()
            .with_pool_limit(self.pool_limit)
            .with_save_every(self.save_every)
            .with_recall(self.recall_size, self.recall_pool)
            .with_initial_pool_size(self.initial_pool_size)
            .with_timeout_seconds(timeout_secs)
            .with_verbose(self.verbose)
            .with_speech(self.speech)
    }
}
