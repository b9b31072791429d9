pub mod ollama {
    pub const API_BASE: &str = "http://localhost:11434";
    pub const CHAT_ENDPOINT: &str = "/api/chat";
    pub const BASE_URL_ENV_VAR: &str = "OLLAMA_BASE_URL";
    pub const MODEL_ENV_VAR: &str = "OLLAMA_MODEL";
}
