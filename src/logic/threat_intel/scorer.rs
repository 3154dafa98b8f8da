//! Local Threat Scorer
//!
//! Scores extracted IOCs against the known-bad database. Pure given a
//! snapshot of the database.

use super::database::ThreatDatabase;
use super::types::{IndicatorKind, IntelReport, IocSet, Verdict};

// Match weights per indicator kind. Weights are summed and clamped, not
// averaged - multiple matches saturate quickly and order does not matter.
pub const IP_WEIGHT: f64 = 0.3;
pub const DOMAIN_WEIGHT: f64 = 0.4;
pub const HASH_WEIGHT: f64 = 0.8;

// Verdict thresholds. Strict inequalities: exactly 0.3 is not Suspicious.
const MALICIOUS_MIN: f64 = 0.7;
const SUSPICIOUS_MIN: f64 = 0.3;

/// Score one alert's extracted indicators against the database.
pub fn score(iocs: &IocSet, db: &ThreatDatabase) -> IntelReport {
    let mut matched = Vec::new();
    let mut confidence = 0.0f64;

    for ip in &iocs.ips {
        if db.contains(IndicatorKind::Ip, ip) {
            matched.push(format!("malicious_ip:{}", ip));
            confidence += IP_WEIGHT;
        }
    }

    for domain in &iocs.domains {
        if db.contains(IndicatorKind::Domain, domain) {
            matched.push(format!("malicious_domain:{}", domain));
            confidence += DOMAIN_WEIGHT;
        }
    }

    for hash in &iocs.hashes {
        if db.contains(IndicatorKind::Hash, hash) {
            matched.push(format!("malicious_hash:{}", hash));
            confidence += HASH_WEIGHT;
        }
    }

    // Weights are decimal tenths; round away binary-float drift before
    // clamping so the strict threshold comparisons stay exact
    let confidence = ((confidence * 10.0).round() / 10.0).min(1.0);

    let verdict = if confidence > MALICIOUS_MIN {
        Verdict::Malicious
    } else if confidence > SUSPICIOUS_MIN {
        Verdict::Suspicious
    } else if !matched.is_empty() {
        Verdict::SuspiciousLowConfidence
    } else {
        Verdict::Benign
    };

    // Users and processes are extracted for context but not correlated
    let total_iocs_checked = iocs.ips.len() + iocs.domains.len() + iocs.hashes.len();

    IntelReport {
        verdict,
        confidence,
        matched_iocs: matched,
        extracted_iocs: iocs.clone(),
        total_iocs_checked,
        remote: None,
        error: None,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::threat_intel::types::ThreatBatch;

    fn db_with(ips: &[&str], domains: &[&str], hashes: &[&str]) -> ThreatDatabase {
        let mut db = ThreatDatabase::new();
        db.add_threats(ThreatBatch {
            ips: ips.iter().map(|s| s.to_string()).collect(),
            domains: domains.iter().map(|s| s.to_string()).collect(),
            hashes: hashes.iter().map(|s| s.to_string()).collect(),
        });
        db
    }

    fn iocs_with(ips: &[&str], domains: &[&str], hashes: &[&str]) -> IocSet {
        IocSet {
            ips: ips.iter().map(|s| s.to_string()).collect(),
            domains: domains.iter().map(|s| s.to_string()).collect(),
            hashes: hashes.iter().map(|s| s.to_string()).collect(),
            users: vec![],
            processes: vec![],
        }
    }

    #[test]
    fn test_no_match_is_benign() {
        let db = ThreatDatabase::seeded();
        let report = score(&iocs_with(&["192.168.1.1"], &[], &[]), &db);

        assert_eq!(report.verdict, Verdict::Benign);
        assert_eq!(report.confidence, 0.0);
        assert!(report.matched_iocs.is_empty());
        assert_eq!(report.total_iocs_checked, 1);
    }

    #[test]
    fn test_single_ip_match_is_low_confidence() {
        // 0.3 is not > 0.3, so a lone IP match stays low confidence
        let db = ThreatDatabase::seeded();
        let report = score(&iocs_with(&["10.0.0.666", "8.8.8.8"], &[], &[]), &db);

        assert_eq!(report.matched_iocs, vec!["malicious_ip:10.0.0.666"]);
        assert!((report.confidence - 0.3).abs() < 1e-9);
        assert_eq!(report.verdict, Verdict::SuspiciousLowConfidence);
        assert_eq!(report.total_iocs_checked, 2);
    }

    #[test]
    fn test_ip_plus_domain_is_suspicious() {
        let db = db_with(&["1.2.3.4"], &["evil.com"], &[]);
        let report = score(&iocs_with(&["1.2.3.4"], &["evil.com"], &[]), &db);

        // 0.3 + 0.4 = 0.7, not > 0.7
        assert!((report.confidence - 0.7).abs() < 1e-9);
        assert_eq!(report.verdict, Verdict::Suspicious);
    }

    #[test]
    fn test_hash_match_is_malicious_with_ip() {
        let db = db_with(&["1.2.3.4"], &[], &["deadbeef"]);
        let report = score(&iocs_with(&["1.2.3.4"], &[], &["deadbeef"]), &db);

        // 0.3 + 0.8 = 1.1, clamped to 1.0
        assert!((report.confidence - 1.0).abs() < 1e-9);
        assert_eq!(report.verdict, Verdict::Malicious);
        assert_eq!(report.matched_iocs.len(), 2);
    }

    #[test]
    fn test_confidence_is_monotonic_and_clamped() {
        let db = db_with(&["1.1.1.1", "2.2.2.2", "3.3.3.3", "4.4.4.4"], &[], &[]);

        let mut previous = 0.0;
        for n in 1..=4 {
            let ips: Vec<&str> = ["1.1.1.1", "2.2.2.2", "3.3.3.3", "4.4.4.4"][..n].to_vec();
            let report = score(&iocs_with(&ips, &[], &[]), &db);
            assert!(report.confidence >= previous);
            assert!(report.confidence <= 1.0);
            previous = report.confidence;
        }

        // 4 * 0.3 = 1.2, clamped
        assert!((previous - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_users_and_processes_excluded_from_checked_count() {
        let db = ThreatDatabase::seeded();
        let mut iocs = iocs_with(&["8.8.8.8"], &["ok.example.com"], &[]);
        iocs.users = vec!["admin".to_string()];
        iocs.processes = vec!["svchost.exe".to_string()];

        let report = score(&iocs, &db);
        assert_eq!(report.total_iocs_checked, 2);
    }
}
