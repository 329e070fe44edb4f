//! Shared utilities for use cases.

use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use legion_domain::Message;
use std::time::Duration;

/// Call the backend, giving up after `timeout` when one is set.
pub(crate) async fn complete_with_timeout<G: LlmGateway + ?Sized>(
    gateway: &G,
    messages: &[Message],
    timeout: Option<Duration>,
) -> Result<String, GatewayError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, gateway.complete(messages))
            .await
            .map_err(|_| GatewayError::Timeout)?,
        None => gateway.complete(messages).await,
    }
}
