//! Endpoint Analysis Backend
//!
//! Builds Ollama generate requests for endpoint and VPN events.

use std::time::Duration;

use serde_json::json;

use crate::constants;
use crate::logic::alert::Alert;
use crate::logic::dispatch::DispatchError;
use super::{Analyzer, BackendRequest};

pub struct EndpointAnalyzer {
    host: String,
    model: String,
}

impl EndpointAnalyzer {
    pub fn new(host: String, model: String) -> Self {
        Self { host, model }
    }

    fn analysis_prompt(alert: &Alert) -> String {
        if alert.field_str("subtype") == Some("vpn") {
            format!(
                "VPN {} event: {}. Remote IP: {}, Status: {}, Reason: {}",
                alert
                    .field_text("tunneltype")
                    .unwrap_or_else(|| "IPsec".to_string()),
                alert.field_text("action").unwrap_or_default(),
                alert.field_text("remip").unwrap_or_else(|| "?".to_string()),
                alert.field_text("status").unwrap_or_else(|| "?".to_string()),
                alert.field_text("reason").unwrap_or_else(|| "N/A".to_string()),
            )
        } else {
            serde_json::to_string(&alert.original).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

impl Default for EndpointAnalyzer {
    fn default() -> Self {
        Self::new(constants::get_ollama_host(), constants::get_ollama_model())
    }
}

impl Analyzer for EndpointAnalyzer {
    fn name(&self) -> &'static str {
        "endpoint"
    }

    fn validate(&self, alert: &Alert) -> Result<(), DispatchError> {
        // VPN events are useless to the model without the action field
        if alert.field_str("subtype") == Some("vpn") && alert.field("action").is_none() {
            return Err(DispatchError::Validation(
                "Missing required fields for VPN analysis (action)".to_string(),
            ));
        }
        Ok(())
    }

    fn build_request(&self, alert: &Alert) -> BackendRequest {
        let prompt = format!(
            "[INST] <<SYS>>Analyze security event and return JSON: {{\
\"severity\": \"critical|high|medium|low\", \
\"issues\": string[], \
\"action_required\": boolean}}<</SYS>>{}[/INST]",
            Self::analysis_prompt(alert)
        );

        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "format": "json",
            "options": { "temperature": 0.3 }
        });

        BackendRequest {
            url: format!("{}/api/generate", self.host),
            headers: vec![],
            body,
            timeout: Duration::from_secs(constants::ENDPOINT_TIMEOUT_SECS),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
