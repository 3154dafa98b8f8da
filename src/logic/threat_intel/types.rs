//! Threat Intel Types
//!
//! Data structures cho IOC extraction và correlation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// VERDICT
// ============================================================================

/// Categorical outcome of threat correlation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Malicious,
    Suspicious,
    SuspiciousLowConfidence,
    Benign,
    Unknown,
    Inconclusive,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Malicious => "malicious",
            Verdict::Suspicious => "suspicious",
            Verdict::SuspiciousLowConfidence => "suspicious_low_confidence",
            Verdict::Benign => "benign",
            Verdict::Unknown => "unknown",
            Verdict::Inconclusive => "inconclusive",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// INDICATOR KIND
// ============================================================================

/// Indicator kind tracked by the known-bad database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    Ip,
    Domain,
    Hash,
}

impl IndicatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorKind::Ip => "ip",
            IndicatorKind::Domain => "domain",
            IndicatorKind::Hash => "hash",
        }
    }

    /// Parse a feed-kind name ("ip", "domain", "hash")
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ip" => Some(IndicatorKind::Ip),
            "domain" => Some(IndicatorKind::Domain),
            "hash" => Some(IndicatorKind::Hash),
            _ => None,
        }
    }
}

// ============================================================================
// IOC SET
// ============================================================================

/// Five disjoint indicator collections extracted from one alert.
///
/// Values are lowercased, deduplicated, and kept in first-occurrence order.
/// Built fresh per analysis call; never persisted on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IocSet {
    pub ips: Vec<String>,
    pub domains: Vec<String>,
    pub hashes: Vec<String>,
    pub users: Vec<String>,
    pub processes: Vec<String>,
}

impl IocSet {
    pub fn is_empty(&self) -> bool {
        self.ips.is_empty()
            && self.domains.is_empty()
            && self.hashes.is_empty()
            && self.users.is_empty()
            && self.processes.is_empty()
    }

    /// Total indicators across all five collections
    pub fn total(&self) -> usize {
        self.ips.len()
            + self.domains.len()
            + self.hashes.len()
            + self.users.len()
            + self.processes.len()
    }

    /// Insert preserving dedup + first-occurrence order
    pub(crate) fn push_dedup(list: &mut Vec<String>, value: String) {
        if !list.contains(&value) {
            list.push(value);
        }
    }
}

// ============================================================================
// THREAT BATCH
// ============================================================================

/// A batch of known-bad indicators to merge into the database (additive)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreatBatch {
    pub ips: Vec<String>,
    pub domains: Vec<String>,
    pub hashes: Vec<String>,
}

impl ThreatBatch {
    pub fn total(&self) -> usize {
        self.ips.len() + self.domains.len() + self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

// ============================================================================
// INTEL REPORT
// ============================================================================

/// Result of threat correlation for one alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntelReport {
    pub verdict: Verdict,

    /// 0.0 - 1.0, sum of match weights clamped
    pub confidence: f64,

    /// Tagged matches, e.g. "malicious_ip:10.0.0.666"
    pub matched_iocs: Vec<String>,

    pub extracted_iocs: IocSet,

    /// Count of extracted ip/domain/hash indicators (users and processes
    /// are extracted but not correlated)
    pub total_iocs_checked: usize,

    /// Remote correlation payload, when the remote backend answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<Value>,

    /// Degradation note when the remote correlation failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
