//! Threat Database
//!
//! Known-bad indicator database. Seeded at startup, grows only through
//! additive merge - never shrinks at runtime, so readers only ever see a
//! superset of what they saw before.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use super::types::{IndicatorKind, ThreatBatch};

// ============================================================================
// DEFAULT SEED
// ============================================================================

/// Known-bad indicators bundled with the agent
static DEFAULT_THREATS: Lazy<ThreatBatch> = Lazy::new(|| ThreatBatch {
    ips: vec![
        "10.0.0.666".to_string(), // sentinel used by the SOC playbooks
        "185.220.101.34".to_string(),
        "45.155.205.233".to_string(),
        "91.240.118.172".to_string(),
    ],
    domains: vec![
        "malware-delivery.ru".to_string(),
        "c2.darkpool.io".to_string(),
        "phish-login.net".to_string(),
    ],
    hashes: vec![
        // EICAR test file, md5 + sha256
        "44d88612fea8a8f36de82e1278abb02f".to_string(),
        "275a021bbfb6489e54d471899f7db9d1663fc695ec2fe2a2c4538aabf651fd0f".to_string(),
    ],
});

// ============================================================================
// THREAT DATABASE
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ThreatDatabase {
    ips: HashSet<String>,
    domains: HashSet<String>,
    hashes: HashSet<String>,
}

impl ThreatDatabase {
    /// Empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Database pre-loaded with the bundled known-bad set
    pub fn seeded() -> Self {
        let mut db = Self::new();
        db.add_threats(DEFAULT_THREATS.clone());
        db
    }

    /// Additive merge: set union per kind. Never removes entries and is
    /// idempotent under repeated identical input.
    pub fn add_threats(&mut self, batch: ThreatBatch) {
        self.ips.extend(batch.ips.into_iter().map(|v| v.to_lowercase()));
        self.domains
            .extend(batch.domains.into_iter().map(|v| v.to_lowercase()));
        self.hashes
            .extend(batch.hashes.into_iter().map(|v| v.to_lowercase()));
    }

    /// Case-insensitive membership check
    pub fn contains(&self, kind: IndicatorKind, value: &str) -> bool {
        self.set(kind).contains(&value.to_lowercase())
    }

    pub fn len(&self, kind: IndicatorKind) -> usize {
        self.set(kind).len()
    }

    /// Total indicators across all kinds
    pub fn total(&self) -> usize {
        self.ips.len() + self.domains.len() + self.hashes.len()
    }

    fn set(&self, kind: IndicatorKind) -> &HashSet<String> {
        match kind {
            IndicatorKind::Ip => &self.ips,
            IndicatorKind::Domain => &self.domains,
            IndicatorKind::Hash => &self.hashes,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
