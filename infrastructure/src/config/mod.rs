//! Configuration file loading for legion
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `LEGION_<SECTION>__<KEY>` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./legion.toml` or `./.legion.toml`
//! 4. Global: `$XDG_CONFIG_HOME/legion/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, FileBackendConfig, FileConfig, FileOutputConfig, FileSessionConfig,
    FileStorageConfig, expand_home,
};
pub use loader::ConfigLoader;
