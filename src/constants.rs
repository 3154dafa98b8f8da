//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change a backend endpoint or model, only edit this file.

/// Default OpenAI-compatible base URL (network analysis + intel correlation)
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

/// Default OpenAI model
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4-turbo-preview";

/// Default Ollama host (endpoint analysis)
pub const DEFAULT_OLLAMA_HOST: &str = "http://ollama:11434";

/// Default Ollama model
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3:8b-instruct-q4_0";

/// Default Anthropic base URL (rogue AP analysis)
pub const DEFAULT_ANTHROPIC_URL: &str = "https://api.anthropic.com";

/// Anthropic model used for rogue AP analysis
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-sonnet-20240229";

/// Network analysis backend timeout (seconds)
pub const NETWORK_TIMEOUT_SECS: u64 = 15;

/// Endpoint analysis backend timeout (seconds)
pub const ENDPOINT_TIMEOUT_SECS: u64 = 30;

/// App analysis backend timeout (seconds)
pub const APP_TIMEOUT_SECS: u64 = 30;

/// Threat intel correlation timeout (seconds)
pub const INTEL_TIMEOUT_SECS: u64 = 25;

/// Threat feed fetch timeout (seconds)
pub const FEED_TIMEOUT_SECS: u64 = 30;

/// Default result cache TTL (seconds)
pub const DEFAULT_CACHE_TTL_SECS: i64 = 3600;

/// App name
pub const APP_NAME: &str = "SOC-AI";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get OpenAI base URL from environment or use default
pub fn get_openai_url() -> String {
    std::env::var("OPENAI_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_OPENAI_URL.to_string())
}

/// Get OpenAI model from environment or use default
pub fn get_openai_model() -> String {
    std::env::var("OPENAI_MODEL")
        .unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string())
}

/// Get OpenAI API key (empty when not configured)
pub fn get_openai_api_key() -> String {
    std::env::var("OPENAI_API_KEY").unwrap_or_default()
}

/// Get Ollama host from environment or use default
pub fn get_ollama_host() -> String {
    std::env::var("OLLAMA_HOST")
        .unwrap_or_else(|_| DEFAULT_OLLAMA_HOST.to_string())
}

/// Get Ollama model from environment or use default
pub fn get_ollama_model() -> String {
    std::env::var("OLLAMA_MODEL")
        .unwrap_or_else(|_| DEFAULT_OLLAMA_MODEL.to_string())
}

/// Get Anthropic base URL from environment or use default
pub fn get_anthropic_url() -> String {
    std::env::var("ANTHROPIC_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_ANTHROPIC_URL.to_string())
}

/// Get Anthropic API key (empty when not configured)
pub fn get_anthropic_api_key() -> String {
    std::env::var("ANTHROPIC_API_KEY").unwrap_or_default()
}

/// Get intel correlation base URL (defaults to the OpenAI base URL)
pub fn get_intel_url() -> String {
    std::env::var("SOC_INTEL_URL").unwrap_or_else(|_| get_openai_url())
}

/// Get alert store path override, if any
pub fn get_store_path() -> Option<String> {
    std::env::var("SOC_STORE_PATH").ok()
}

/// Get result cache TTL from environment or use default
pub fn get_cache_ttl() -> i64 {
    std::env::var("SOC_CACHE_TTL")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_CACHE_TTL_SECS)
}

/// Check if the result cache is enabled
pub fn is_cache_enabled() -> bool {
    std::env::var("SOC_CACHE_ENABLED")
        .map(|s| s.to_lowercase() != "false" && s != "0")
        .unwrap_or(true)
}

/// Get threat feed URL, if configured
pub fn get_threat_feed_url() -> Option<String> {
    std::env::var("SOC_THREAT_FEED_URL").ok()
}

/// Get threat feed indicator kind ("ip", "domain" or "hash")
pub fn get_threat_feed_kind() -> String {
    std::env::var("SOC_THREAT_FEED_KIND")
        .unwrap_or_else(|_| "ip".to_string())
}
