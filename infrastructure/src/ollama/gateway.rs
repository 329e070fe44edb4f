//! Ollama LLM Gateway implementation

use crate::ollama::error::{OllamaError, Result};
use crate::ollama::protocol::{ChatRequest, ChatResponse, ErrorBody};
use async_trait::async_trait;
use legion_application::ports::llm_gateway::{GatewayError, LlmGateway};
use legion_domain::{Message, Model};
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default Ollama endpoint
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Time allowed to establish a connection
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// LLM Gateway implementation for a local or remote Ollama server
pub struct OllamaGateway {
    base_url: String,
    model: Model,
    client: Client,
}

impl OllamaGateway {
    /// Create a gateway for `model` at `base_url`
    pub fn new(base_url: impl Into<String>, model: Model) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| OllamaError::ClientBuild(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("OllamaGateway initialized ({} at {})", model, base_url);

        Ok(Self {
            base_url,
            model,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    /// Send one non-streaming chat request
    pub async fn chat(&self, messages: &[Message]) -> Result<String> {
        let request = ChatRequest::new(self.model.as_str(), messages);
        debug!(
            "Ollama request: model={}, messages={}, total_chars={}",
            self.model,
            request.messages.len(),
            request.messages.iter().map(|m| m.content.len()).sum::<usize>()
        );

        let start = Instant::now();
        let response = self
            .client
            .post(self.chat_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OllamaError::Timeout
                } else if e.is_connect() {
                    OllamaError::Unreachable(self.base_url.clone())
                } else {
                    OllamaError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(if status == StatusCode::NOT_FOUND {
                OllamaError::ModelNotFound(format!("{}: {}", self.model, detail))
            } else {
                OllamaError::Api {
                    status: status.as_u16(),
                    body: detail,
                }
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| OllamaError::ParseError(e.to_string()))?;

        debug!(
            "Ollama response received in {:.1}s",
            start.elapsed().as_secs_f64()
        );
        Ok(parsed.message.content)
    }
}

#[async_trait]
impl LlmGateway for OllamaGateway {
    async fn complete(&self, messages: &[Message]) -> std::result::Result<String, GatewayError> {
        self.chat(messages).await.map_err(GatewayError::from)
    }

    fn model(&self) -> &Model {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_properties() {
        let gateway = OllamaGateway::new("http://localhost:11434/", Model::Llama31).unwrap();
        assert_eq!(gateway.base_url(), "http://localhost:11434");
        assert_eq!(gateway.chat_url(), "http://localhost:11434/api/chat");
        assert_eq!(gateway.model(), &Model::Llama31);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connection_error() {
        // Port 9 (discard) is closed on any sane test host
        let gateway = OllamaGateway::new("http://127.0.0.1:9", Model::Llama31).unwrap();
        let err = gateway.complete(&[Message::user("hi")]).await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::ConnectionError(_) | GatewayError::RequestFailed(_) | GatewayError::Timeout
        ));
    }
}
