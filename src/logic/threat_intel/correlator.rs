//! Remote Intel Correlator
//!
//! HTTP client for the threat-intel correlation backend. Failures here are
//! enrichment failures: the dispatcher always recovers them locally and
//! never lets them abort an alert.

use std::time::Duration;

use serde_json::{json, Value};

use crate::constants;
use super::types::IocSet;

// ============================================================================
// ERROR
// ============================================================================

/// Threat-intel correlation failure - always swallowed into the result
#[derive(Debug, Clone)]
pub struct EnrichmentError(pub String);

impl std::fmt::Display for EnrichmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Threat intel correlation failed: {}", self.0)
    }
}

impl std::error::Error for EnrichmentError {}

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone)]
pub struct CorrelatorConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for CorrelatorConfig {
    fn default() -> Self {
        Self {
            base_url: constants::get_intel_url(),
            api_key: constants::get_openai_api_key(),
            model: constants::get_openai_model(),
            timeout_secs: constants::INTEL_TIMEOUT_SECS,
        }
    }
}

// ============================================================================
// CORRELATOR
// ============================================================================

pub struct IntelCorrelator {
    config: CorrelatorConfig,
}

impl IntelCorrelator {
    pub fn new(config: CorrelatorConfig) -> Self {
        Self { config }
    }

    /// Remote correlation is attempted only when an API key is configured
    pub fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    /// Correlate extracted IOCs against the remote intel backend.
    pub async fn correlate(
        &self,
        client: &reqwest::Client,
        iocs: &IocSet,
    ) -> Result<Value, EnrichmentError> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);

        let body = json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "system",
                    "content": "Correlate IOCs with threat intel and return JSON: {verdict: string, matched_iocs: string[]}"
                },
                {
                    "role": "user",
                    "content": serde_json::to_string(iocs).unwrap_or_default()
                }
            ],
            "response_format": { "type": "json_object" }
        });

        let response = client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .json(&body)
            .send()
            .await
            .map_err(|e| EnrichmentError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(EnrichmentError(format!(
                "intel backend returned {}: {}",
                status, text
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| EnrichmentError(e.to_string()))?;

        // Chat-style backends wrap the verdict JSON inside a message envelope
        match payload
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
        {
            Some(content) => serde_json::from_str(content)
                .map_err(|e| EnrichmentError(format!("unparseable intel payload: {}", e))),
            None => Ok(payload),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_without_api_key() {
        let correlator = IntelCorrelator::new(CorrelatorConfig {
            base_url: "http://localhost".to_string(),
            api_key: String::new(),
            model: "test".to_string(),
            timeout_secs: 1,
        });
        assert!(!correlator.is_configured());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_enrichment_error() {
        let correlator = IntelCorrelator::new(CorrelatorConfig {
            // Reserved port, nothing listens here
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: "test-key".to_string(),
            model: "test".to_string(),
            timeout_secs: 1,
        });

        let client = reqwest::Client::new();
        let result = correlator.correlate(&client, &IocSet::default()).await;
        assert!(result.is_err());
    }
}
