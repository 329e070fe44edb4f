//! Backend configuration from TOML (`[backend]` section)

use crate::ollama::gateway::DEFAULT_BASE_URL;
use legion_application::config::DEFAULT_TIMEOUT_SECS;
use legion_domain::Model;
use serde::{Deserialize, Serialize};

/// Raw generation backend configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// Ollama server URL
    pub base_url: String,
    /// Model tag, e.g. "llama3.1"
    pub model: String,
    /// Per-call timeout; 0 disables it
    pub timeout_secs: u64,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: Model::default().to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl FileBackendConfig {
    /// The configured model, or the default when the name is blank
    pub fn parse_model(&self) -> Model {
        let name = self.model.trim();
        if name.is_empty() {
            Model::default()
        } else {
            name.parse().unwrap_or_default()
        }
    }
}
