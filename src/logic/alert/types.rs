//! Alert Types
//!
//! Core types cho alert triage. KHÔNG chứa logic - chỉ data structures.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Severity at or above which alerts get threat-intel enrichment
pub const HIGH_SEVERITY_THRESHOLD: u8 = 4;

// ============================================================================
// ALERT TYPE
// ============================================================================

/// Coarse alert category, decided once by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Network,
    Endpoint,
    App,
    Unknown,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Network => "network",
            AlertType::Endpoint => "endpoint",
            AlertType::App => "app",
            AlertType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ALERT STATUS
// ============================================================================

/// Lifecycle tag. Pending -> {Analyzed | Failed}, both terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Pending,
    Analyzed,
    Failed,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Pending => "pending",
            AlertStatus::Analyzed => "analyzed",
            AlertStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ALERT ENVELOPE
// ============================================================================

/// One security event at any pipeline stage.
///
/// `alert_type` and `severity` are computed once by the classifier and are
/// read-only facts downstream - dispatch and scoring never recompute them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Assigned at first persistence, stable thereafter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Opaque raw log fields (vendor-specific names)
    pub original: Map<String, Value>,

    #[serde(rename = "type")]
    pub alert_type: AlertType,

    /// 1-5, 5 highest
    pub severity: u8,

    /// Event time; store stamps wall-clock time when empty
    pub timestamp: String,

    /// Source device identifier
    pub device: String,

    /// Enrichment result, set only for severity >= 4
    pub threat_intel: Option<Value>,

    /// Raw backend response, present only on analyzed records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Value>,

    pub status: AlertStatus,

    /// Failure message on failed records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Alert {
    /// Raw log field lookup
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.original.get(key)
    }

    /// Raw log field as &str
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.original.get(key).and_then(Value::as_str)
    }

    /// Raw log field rendered as text (strings verbatim, numbers formatted)
    pub fn field_text(&self, key: &str) -> Option<String> {
        match self.original.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn is_high_severity(&self) -> bool {
        self.severity >= HIGH_SEVERITY_THRESHOLD
    }
}
