//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types.

mod backend;
mod output;
mod session;
mod storage;

pub use backend::FileBackendConfig;
pub use output::FileOutputConfig;
pub use session::FileSessionConfig;
pub use storage::{FileStorageConfig, expand_home};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Generation backend
    pub backend: FileBackendConfig,
    /// Pool and persistence cadence
    pub session: FileSessionConfig,
    /// Where actors and the ledger live
    pub storage: FileStorageConfig,
    /// Terminal and transcript output
    pub output: FileOutputConfig,
}

/// A suspicious but usable configuration value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ConfigIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl FileConfig {
    /// Check the configuration, returning every warning found.
    ///
    /// Nothing here is fatal: each flagged value has a fallback.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.backend.model.trim().is_empty() {
            issues.push(ConfigIssue::new(
                "backend.model",
                "empty model name, using the default",
            ));
        }
        if !self.backend.base_url.starts_with("http://")
            && !self.backend.base_url.starts_with("https://")
        {
            issues.push(ConfigIssue::new(
                "backend.base_url",
                format!("'{}' is not an http(s) URL", self.backend.base_url),
            ));
        }
        if self.backend.timeout_secs == 0 {
            issues.push(ConfigIssue::new(
                "backend.timeout_secs",
                "0 disables the timeout; a stalled backend will hang the session",
            ));
        }
        if self.session.pool_limit == 0 {
            issues.push(ConfigIssue::new(
                "session.pool_limit",
                "must be at least 1, using 1",
            ));
        }
        if self.session.save_every == 0 {
            issues.push(ConfigIssue::new(
                "session.save_every",
                "0 saves the ledger only at exit",
            ));
        }
        if self.session.recall_size > self.session.pool_limit.max(1) {
            issues.push(ConfigIssue::new(
                "session.recall_size",
                format!(
                    "{} exceeds pool_limit {}, recall will be truncated",
                    self.session.recall_size, self.session.pool_limit
                ),
            ));
        }
        if self.session.recall_pool < self.session.recall_size {
            issues.push(ConfigIssue::new(
                "session.recall_pool",
                "smaller than recall_size, recall pads from the default roster",
            ));
        }

        issues
    }
}
