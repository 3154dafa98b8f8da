//! Alert Classifier
//!
//! CHỈ chứa logic classify - pure, total, no I/O, no error cases.
//! Input: raw log JSON. Output: Alert envelope with type + severity.

use serde_json::{Map, Value};

use super::types::{Alert, AlertStatus, AlertType};

const SEVERITY_CRITICAL: u8 = 5;
const SEVERITY_HIGH: u8 = 4;
const SEVERITY_NOTICE: u8 = 3;

/// Classify a raw security log into an alert envelope.
///
/// Always returns a best-effort classification; unrecognizable inputs
/// degrade to `Unknown` with severity 3.
pub fn classify(raw: &Value) -> Alert {
    // Re-submitted envelopes carry the raw log nested under `original`
    let log: Map<String, Value> = raw
        .get("original")
        .and_then(Value::as_object)
        .or_else(|| raw.as_object())
        .cloned()
        .unwrap_or_default();

    let alert_type = detect_type(&log);
    let severity = detect_severity(&log);
    let timestamp = derive_timestamp(&log);
    let device = str_field(&log, "devname").unwrap_or("unknown").to_string();

    Alert {
        id: None,
        original: log,
        alert_type,
        severity,
        timestamp,
        device,
        threat_intel: None,
        analysis: None,
        status: AlertStatus::Pending,
        error: None,
    }
}

fn str_field<'a>(log: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    log.get(key).and_then(Value::as_str)
}

/// Type decision - exact branch order, first match wins.
fn detect_type(log: &Map<String, Value>) -> AlertType {
    let logid = str_field(log, "logid").unwrap_or("");

    if str_field(log, "type") == Some("traffic") || logid.starts_with("0001") {
        AlertType::Network
    } else if str_field(log, "subtype") == Some("vpn") || logid.starts_with("010103") {
        AlertType::App
    } else if str_field(log, "subtype") == Some("wireless") || logid.starts_with("010404") {
        AlertType::Endpoint
    } else if str_field(log, "logdesc").map_or(false, |d| d.contains("DHCP"))
        || log.contains_key("dhcp_msg")
    {
        // DHCP fallback only applies when none of the branches above matched
        AlertType::Network
    } else {
        AlertType::Unknown
    }
}

/// Severity decision - priority chain, only the first matching rule fires.
fn detect_severity(log: &Map<String, Value>) -> u8 {
    if str_field(log, "level") == Some("error") {
        SEVERITY_CRITICAL
    } else if str_field(log, "level") == Some("alert") {
        SEVERITY_HIGH
    } else if str_field(log, "action") == Some("client-rst") {
        SEVERITY_HIGH
    } else if str_field(log, "logdesc").map_or(false, |d| d.contains("rogue")) {
        SEVERITY_CRITICAL
    } else {
        SEVERITY_NOTICE
    }
}

/// Prefer the explicit event-time field; else compose date + time.
fn derive_timestamp(log: &Map<String, Value>) -> String {
    if let Some(eventtime) = log.get("eventtime") {
        return match eventtime {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
    }

    match (str_field(log, "date"), str_field(log, "time")) {
        (Some(date), Some(time)) => format!("{} {}", date, time),
        (Some(date), None) => date.to_string(),
        (None, Some(time)) => time.to_string(),
        (None, None) => "unknown".to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_traffic_is_network() {
        let alert = classify(&json!({ "type": "traffic", "srcip": "10.1.1.1" }));
        assert_eq!(alert.alert_type, AlertType::Network);
    }

    #[test]
    fn test_logid_prefixes() {
        assert_eq!(classify(&json!({ "logid": "0001000014" })).alert_type, AlertType::Network);
        assert_eq!(classify(&json!({ "logid": "0101037124" })).alert_type, AlertType::App);
        assert_eq!(classify(&json!({ "logid": "0104043568" })).alert_type, AlertType::Endpoint);
    }

    #[test]
    fn test_vpn_is_app() {
        let alert = classify(&json!({ "subtype": "vpn", "action": "tunnel-down" }));
        assert_eq!(alert.alert_type, AlertType::App);
    }

    #[test]
    fn test_wireless_is_endpoint() {
        let alert = classify(&json!({ "subtype": "wireless", "bssid": "aa:bb:cc:dd:ee:ff" }));
        assert_eq!(alert.alert_type, AlertType::Endpoint);
    }

    #[test]
    fn test_dhcp_fallback_is_network() {
        let alert = classify(&json!({ "logdesc": "DHCP ack", "devname": "fw-01" }));
        assert_eq!(alert.alert_type, AlertType::Network);
        assert_eq!(alert.device, "fw-01");

        let alert = classify(&json!({ "dhcp_msg": "DHCPACK" }));
        assert_eq!(alert.alert_type, AlertType::Network);
    }

    #[test]
    fn test_dhcp_does_not_override_earlier_branches() {
        // A DHCP log also tagged vpn classifies as App - branch order wins
        let alert = classify(&json!({ "subtype": "vpn", "logdesc": "DHCP request relayed" }));
        assert_eq!(alert.alert_type, AlertType::App);
    }

    #[test]
    fn test_unrecognizable_degrades_to_unknown() {
        let alert = classify(&json!({ "foo": "bar" }));
        assert_eq!(alert.alert_type, AlertType::Unknown);
        assert_eq!(alert.severity, 3);
        assert_eq!(alert.status, AlertStatus::Pending);
    }

    #[test]
    fn test_error_level_is_critical() {
        // level=error wins regardless of other fields
        let alert = classify(&json!({
            "level": "error", "action": "client-rst", "logdesc": "rogue AP detected"
        }));
        assert_eq!(alert.severity, 5);
    }

    #[test]
    fn test_alert_level_beats_rogue_description() {
        let alert = classify(&json!({ "level": "alert", "logdesc": "rogue AP detected" }));
        assert_eq!(alert.severity, 4);
    }

    #[test]
    fn test_client_rst_is_high() {
        let alert = classify(&json!({ "level": "notice", "action": "client-rst" }));
        assert_eq!(alert.severity, 4);
    }

    #[test]
    fn test_rogue_description_is_critical() {
        let alert = classify(&json!({ "logdesc": "Wireless rogue AP on-wire" }));
        assert_eq!(alert.severity, 5);
    }

    #[test]
    fn test_timestamp_prefers_eventtime() {
        let alert = classify(&json!({ "eventtime": 1695200000, "date": "2023-09-20", "time": "10:00:00" }));
        assert_eq!(alert.timestamp, "1695200000");
    }

    #[test]
    fn test_timestamp_composes_date_and_time() {
        let alert = classify(&json!({ "date": "2023-09-20", "time": "10:00:00" }));
        assert_eq!(alert.timestamp, "2023-09-20 10:00:00");
    }

    #[test]
    fn test_nested_original_is_unwrapped() {
        let alert = classify(&json!({
            "original": { "type": "traffic", "level": "alert" },
            "type": "already-classified"
        }));
        assert_eq!(alert.alert_type, AlertType::Network);
        assert_eq!(alert.severity, 4);
    }
}
