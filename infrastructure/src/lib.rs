//! Infrastructure layer for legion
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod ollama;
pub mod random;
pub mod speech;
pub mod store;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, FileBackendConfig, FileConfig, FileOutputConfig,
    FileSessionConfig, FileStorageConfig,
};
pub use logging::JsonlConversationLogger;
pub use ollama::{
    error::OllamaError,
    gateway::{DEFAULT_BASE_URL, OllamaGateway},
};
pub use random::StdRandom;
pub use speech::{CommandSpeech, SpeechProgram};
pub use store::{JsonActorStore, default_cache_dir};
