//! App Analysis Backend
//!
//! Builds Anthropic messages requests for rogue access-point events.

use std::time::Duration;

use serde_json::json;

use crate::constants;
use crate::logic::alert::Alert;
use crate::logic::dispatch::DispatchError;
use super::{Analyzer, BackendRequest};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1000;

pub struct AppAnalyzer {
    base_url: String,
    api_key: String,
    model: String,
}

impl AppAnalyzer {
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            base_url,
            api_key,
            model,
        }
    }

    fn analysis_prompt(alert: &Alert) -> String {
        format!(
            "Analyze rogue AP event:\n\
             - AP: {} ({})\n\
             - Signal: {}dBm\n\
             - Vendor: {}\n\
             - Detection: {}\n\
             \n\
             Provide JSON analysis:\n\
             {{\n\
               \"threat_level\": \"high|medium|low\",\n\
               \"ap_details\": {{ \"bssid\": string, \"ssid\": string, \"vendor\": string }},\n\
               \"recommended_actions\": string[],\n\
               \"nearby_devices_at_risk\": number\n\
             }}",
            alert.field_text("bssid").unwrap_or_default(),
            alert.field_text("ssid").unwrap_or_default(),
            alert.field_text("signal").unwrap_or_else(|| "?".to_string()),
            alert.field_text("manuf").unwrap_or_else(|| "unknown".to_string()),
            alert
                .field_text("sndetected")
                .unwrap_or_else(|| "unknown".to_string()),
        )
    }
}

impl Default for AppAnalyzer {
    fn default() -> Self {
        Self::new(
            constants::get_anthropic_url(),
            constants::get_anthropic_api_key(),
            constants::DEFAULT_ANTHROPIC_MODEL.to_string(),
        )
    }
}

impl Analyzer for AppAnalyzer {
    fn name(&self) -> &'static str {
        "app"
    }

    fn validate(&self, alert: &Alert) -> Result<(), DispatchError> {
        if alert.field("bssid").is_none() || alert.field("ssid").is_none() {
            return Err(DispatchError::Validation(
                "Missing required fields (bssid, ssid)".to_string(),
            ));
        }
        Ok(())
    }

    fn build_request(&self, alert: &Alert) -> BackendRequest {
        let body = json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": [
                { "role": "user", "content": Self::analysis_prompt(alert) }
            ],
            "temperature": 0.2
        });

        BackendRequest {
            url: format!("{}/v1/messages", self.base_url),
            headers: vec![
                ("x-api-key", self.api_key.clone()),
                ("anthropic-version", ANTHROPIC_VERSION.to_string()),
            ],
            body,
            timeout: Duration::from_secs(constants::APP_TIMEOUT_SECS),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
