//! Generation backend port
//!
//! Every actor, judge and summary call goes through [`LlmGateway`]. Callers
//! degrade on [`GatewayError`] instead of failing the round.

use async_trait::async_trait;
use legion_domain::{Message, Model};
use thiserror::Error;

/// Why a backend call produced no text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Not permitted: {0}")]
    NotPermitted(String),

    #[error("Backend did not answer in time")]
    Timeout,
}

/// One stateless call per decision point: the full role-tagged message
/// sequence goes in, generated text comes out.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Generate a reply to `messages`
    async fn complete(&self, messages: &[Message]) -> Result<String, GatewayError>;

    /// Model this gateway generates with
    fn model(&self) -> &Model;
}
