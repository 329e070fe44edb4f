//! Model value object representing a generation backend model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Language models the generation backend can be asked to run (Value Object)
///
/// Known tags are listed explicitly; anything else is carried through
/// verbatim as [`Model::Custom`] so any locally pulled model can be used.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    // Meta
    Llama31,
    Llama32,
    Llama33,
    // Mistral
    Mistral,
    MistralNemo,
    // Qwen
    Qwen25,
    // Google
    Gemma2,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the tag the backend knows this model by
    pub fn as_str(&self) -> &str {
        match self {
            Model::Llama31 => "llama3.1",
            Model::Llama32 => "llama3.2",
            Model::Llama33 => "llama3.3",
            Model::Mistral => "mistral",
            Model::MistralNemo => "mistral-nemo",
            Model::Qwen25 => "qwen2.5",
            Model::Gemma2 => "gemma2",
            Model::Custom(s) => s,
        }
    }
}

impl Default for Model {
    /// Returns the default model (llama3.1)
    fn default() -> Self {
        Model::Llama31
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "llama3.1" => Model::Llama31,
            "llama3.2" => Model::Llama32,
            "llama3.3" => Model::Llama33,
            "mistral" => Model::Mistral,
            "mistral-nemo" => Model::MistralNemo,
            "qwen2.5" => Model::Qwen25,
            "gemma2" => Model::Gemma2,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(model) = s.parse::<Model>();
        Ok(model)
    }
}
