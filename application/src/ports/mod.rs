//! Port definitions (interfaces for external adapters)

pub mod actor_store;
pub mod conversation_logger;
pub mod llm_gateway;
pub mod progress;
pub mod random;
pub mod speech;
