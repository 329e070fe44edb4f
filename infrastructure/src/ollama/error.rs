//! Error types for the Ollama adapter

use legion_application::ports::llm_gateway::GatewayError;
use thiserror::Error;

/// Result type alias for Ollama operations
pub type Result<T> = std::result::Result<T, OllamaError>;

/// Errors that can occur when talking to an Ollama server
#[derive(Error, Debug)]
pub enum OllamaError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Cannot connect to Ollama at {0}. Is Ollama running?")]
    Unreachable(String),

    #[error("Request timeout")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Ollama API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),
}

impl From<OllamaError> for GatewayError {
    fn from(error: OllamaError) -> Self {
        match error {
            OllamaError::Unreachable(_) | OllamaError::ClientBuild(_) => {
                GatewayError::ConnectionError(error.to_string())
            }
            OllamaError::Timeout => GatewayError::Timeout,
            OllamaError::ModelNotFound(model) => GatewayError::ModelNotAvailable(model),
            OllamaError::ParseError(message) => GatewayError::InvalidResponse(message),
            OllamaError::Http(_) | OllamaError::Api { .. } => {
                GatewayError::RequestFailed(error.to_string())
            }
        }
    }
}
