//! Threat Feed Loader
//!
//! Mục đích: nạp known-bad indicators từ plaintext feeds vào database.
//!
//! Feed format: one indicator per line, `#` and `//` comments skipped.
//! Fetch failures are never fatal - the caller continues with whatever
//! the database already holds.

use std::time::Duration;

use crate::constants;
use super::types::{IndicatorKind, ThreatBatch};

// ============================================================================
// ERROR
// ============================================================================

#[derive(Debug)]
pub struct FeedError(pub String);

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Feed error: {}", self.0)
    }
}

impl std::error::Error for FeedError {}

// ============================================================================
// PARSING
// ============================================================================

/// Parse plaintext feed content into a batch for one indicator kind.
///
/// IP feeds are taken verbatim (vendor logs carry IP-like strings as-is);
/// domain lines must contain a dot; hash lines must be valid hex of
/// md5/sha1/sha256 length.
pub fn parse_feed(content: &str, kind: IndicatorKind) -> ThreatBatch {
    let mut batch = ThreatBatch::default();

    for line in content.lines() {
        let line = line.trim();

        // Skip comments and empty lines
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }

        let value = line.to_lowercase();
        match kind {
            IndicatorKind::Ip => batch.ips.push(value),
            IndicatorKind::Domain => {
                if value.contains('.') {
                    batch.domains.push(value);
                }
            }
            IndicatorKind::Hash => {
                if is_valid_hash(&value) {
                    batch.hashes.push(value);
                }
            }
        }
    }

    batch
}

/// Fetch a feed over HTTP (blocking) and parse it.
pub fn fetch_feed(url: &str, kind: IndicatorKind) -> Result<ThreatBatch, FeedError> {
    let response = ureq::get(url)
        .timeout(Duration::from_secs(constants::FEED_TIMEOUT_SECS))
        .call()
        .map_err(|e| FeedError(e.to_string()))?;

    let content = response.into_string().map_err(|e| FeedError(e.to_string()))?;

    Ok(parse_feed(&content, kind))
}

/// MD5 = 32, SHA1 = 40, SHA256 = 64
fn is_valid_hash(s: &str) -> bool {
    let len = s.len();
    if len != 32 && len != 40 && len != 64 {
        return false;
    }
    s.chars().all(|c| c.is_ascii_hexdigit())
}

// ============================================================================
// TESTS
// ============================================================================
