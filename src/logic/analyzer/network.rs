//! Network Analysis Backend
//!
//! Builds OpenAI-style chat-completion requests for traffic and wireless
//! events.

use std::time::Duration;

use serde_json::json;

use crate::constants;
use crate::logic::alert::Alert;
use crate::logic::dispatch::DispatchError;
use super::{Analyzer, BackendRequest};

pub struct NetworkAnalyzer {
    base_url: String,
    api_key: String,
    model: String,
}

impl NetworkAnalyzer {
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            base_url,
            api_key,
            model,
        }
    }

    /// One-line analysis context from the raw log fields
    fn context_line(alert: &Alert) -> String {
        if alert.field_str("type") == Some("traffic") {
            format!(
                "Traffic between {}:{} -> {}:{}",
                alert.field_text("srcip").unwrap_or_else(|| "?".to_string()),
                alert.field_text("srcport").unwrap_or_else(|| "?".to_string()),
                alert.field_text("dstip").unwrap_or_else(|| "?".to_string()),
                alert.field_text("dstport").unwrap_or_else(|| "?".to_string()),
            )
        } else {
            format!(
                "Wireless event: {} ({})",
                alert.field_text("bssid").unwrap_or_else(|| "?".to_string()),
                alert.field_text("ssid").unwrap_or_else(|| "?".to_string()),
            )
        }
    }
}

impl Default for NetworkAnalyzer {
    fn default() -> Self {
        Self::new(
            constants::get_openai_url(),
            constants::get_openai_api_key(),
            constants::get_openai_model(),
        )
    }
}

impl Analyzer for NetworkAnalyzer {
    fn name(&self) -> &'static str {
        "network"
    }

    fn validate(&self, alert: &Alert) -> Result<(), DispatchError> {
        let is_traffic = alert.field_str("type") == Some("traffic");
        let is_wireless = alert.field_str("subtype") == Some("wireless");

        if !is_traffic && !is_wireless {
            return Err(DispatchError::Validation(
                "Invalid network alert type (expected traffic or wireless)".to_string(),
            ));
        }
        Ok(())
    }

    fn build_request(&self, alert: &Alert) -> BackendRequest {
        let body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": "Analyze network event and return JSON: {risk_score: number, threat_type: string, recommended_actions: string[]}"
                },
                {
                    "role": "user",
                    "content": Self::context_line(alert)
                }
            ],
            "response_format": { "type": "json_object" },
            "temperature": 0.2
        });

        BackendRequest {
            url: format!("{}/v1/chat/completions", self.base_url),
            headers: vec![("Authorization", format!("Bearer {}", self.api_key))],
            body,
            timeout: Duration::from_secs(constants::NETWORK_TIMEOUT_SECS),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::alert::classify;
    use serde_json::json;

    fn analyzer() -> NetworkAnalyzer {
        NetworkAnalyzer::new(
            "https://api.test".to_string(),
            "key".to_string(),
            "gpt-4-turbo-preview".to_string(),
        )
    }

    #[test]
    fn test_validate_accepts_traffic_and_wireless() {
        let analyzer = analyzer();
        assert!(analyzer
            .validate(&classify(&json!({ "type": "traffic" })))
            .is_ok());
        assert!(analyzer
            .validate(&classify(&json!({ "subtype": "wireless", "logid": "0001001" })))
            .is_ok());
    }

    #[test]
    fn test_validate_rejects_other_shapes() {
        let analyzer = analyzer();
        let alert = classify(&json!({ "logid": "0001000014", "logdesc": "forwarded" }));
        assert!(analyzer.validate(&alert).is_err());
    }

    #[test]
    fn test_traffic_request_shape() {
        let alert = classify(&json!({
            "type": "traffic",
            "srcip": "10.0.0.1", "srcport": 51220,
            "dstip": "8.8.8.8", "dstport": 53
        }));

        let request = analyzer().build_request(&alert);
        assert_eq!(request.url, "https://api.test/v1/chat/completions");
        assert_eq!(request.timeout, Duration::from_secs(15));
        assert_eq!(request.body["model"], "gpt-4-turbo-preview");

        let context = request.body["messages"][1]["content"].as_str().unwrap();
        assert_eq!(context, "Traffic between 10.0.0.1:51220 -> 8.8.8.8:53");
    }

    #[test]
    fn test_wireless_request_context() {
        let alert = classify(&json!({
            "subtype": "wireless",
            "bssid": "aa:bb:cc:dd:ee:ff",
            "ssid": "CorpNet"
        }));

        let request = analyzer().build_request(&alert);
        let context = request.body["messages"][1]["content"].as_str().unwrap();
        assert_eq!(context, "Wireless event: aa:bb:cc:dd:ee:ff (CorpNet)");
    }
}
