//! Static metadata for the models served through Ollama.

use std::fmt;
use std::str::FromStr;

use super::Provider;
use crate::core::LlmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelId {
    Llama3,
    CodeLlama,
    Mistral,
    /// A model pulled by the user; its backend name comes from configuration.
    Custom,
}

impl ModelId {
    pub const ALL: [ModelId; 4] = [
        ModelId::Llama3,
        ModelId::CodeLlama,
        ModelId::Mistral,
        ModelId::Custom,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ModelId::Llama3 => "ollama.llama3",
            ModelId::CodeLlama => "ollama.codellama",
            ModelId::Mistral => "ollama.mistral",
            ModelId::Custom => "ollama.custom",
        }
    }

    pub fn model(&self) -> &'static Model {
        match self {
            ModelId::Llama3 => &LLAMA3,
            ModelId::CodeLlama => &CODE_LLAMA,
            ModelId::Mistral => &MISTRAL,
            ModelId::Custom => &CUSTOM,
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| LlmError::UnknownModel(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub id: ModelId,
    pub name: &'static str,
    pub provider: Provider,
    /// Name the backend knows the model by. Empty for [`ModelId::Custom`].
    pub api_model: &'static str,
    pub cost_per_1m_in: f64,
    pub cost_per_1m_out: f64,
    pub cost_per_1m_in_cached: f64,
    pub cost_per_1m_out_cached: f64,
    pub context_window: u32,
    pub default_max_tokens: u32,
    pub can_reason: bool,
}

impl Model {
    /// Backend model name, with `model_override` taking precedence.
    pub fn resolve_api_model(&self, model_override: Option<&str>) -> Result<String, LlmError> {
        match model_override.filter(|m| !m.is_empty()) {
            Some(model) => Ok(model.to_string()),
            None if self.api_model.is_empty() => Err(LlmError::ProviderConfiguration(format!(
                "{} requires a model name to be configured",
                self.id
            ))),
            None => Ok(self.api_model.to_string()),
        }
    }
}

const fn local_model(id: ModelId, name: &'static str, api_model: &'static str) -> Model {
    Model {
        id,
        name,
        provider: Provider::Ollama,
        api_model,
        cost_per_1m_in: 0.0,
        cost_per_1m_out: 0.0,
        cost_per_1m_in_cached: 0.0,
        cost_per_1m_out_cached: 0.0,
        context_window: 8192,
        default_max_tokens: 4096,
        can_reason: false,
    }
}

static LLAMA3: Model = local_model(ModelId::Llama3, "Ollama: Llama 3", "llama3");
static CODE_LLAMA: Model = local_model(ModelId::CodeLlama, "Ollama: CodeLlama", "codellama");
static MISTRAL: Model = local_model(ModelId::Mistral, "Ollama: Mistral", "mistral");
static CUSTOM: Model = local_model(ModelId::Custom, "Ollama: Custom Model", "");
