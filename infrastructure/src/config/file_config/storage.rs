//! Storage configuration from TOML (`[storage]` section)

use crate::store::default_cache_dir;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw storage configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Directory holding actor records and the ledger
    pub cache_dir: Option<String>,
    /// REPL history file
    pub history_file: Option<String>,
}

impl FileStorageConfig {
    pub fn resolve_cache_dir(&self) -> PathBuf {
        self.cache_dir
            .as_deref()
            .map(expand_home)
            .unwrap_or_else(default_cache_dir)
    }

    pub fn resolve_history_file(&self) -> Option<PathBuf> {
        self.history_file.as_deref().map(expand_home)
    }
}

/// Expand a leading `~/` to the home directory
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_cache_dir_wins() {
        let config = FileStorageConfig {
            cache_dir: Some("/var/lib/legion".to_string()),
            history_file: None,
        };
        assert_eq!(config.resolve_cache_dir(), PathBuf::from("/var/lib/legion"));
        assert_eq!(config.resolve_history_file(), None);
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/legion"), home.join("legion"));
        }
    }
}
