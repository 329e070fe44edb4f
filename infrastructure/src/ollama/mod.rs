//! Ollama adapter
//!
//! Implements LlmGateway over the Ollama HTTP chat API.

pub mod error;
pub mod gateway;
pub mod protocol;
