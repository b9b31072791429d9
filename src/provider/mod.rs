mod constants;
pub mod models;
pub(crate) mod ollama;

pub use models::{Model, ModelId};
pub use ollama::{OllamaClient, OllamaConfig, OllamaOverrides};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Ollama,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Ollama => write!(f, "Ollama"),
        }
    }
}
