//! IOC Extractor
//!
//! Pure extraction of indicators from the raw alert fields.
//!
//! Vendor logs carry no stable schema, so routing is an explicit keyword
//! policy: a key matching any keyword as a substring (case-insensitive)
//! sends its string value into the corresponding collection.

use serde_json::{Map, Value};

use crate::logic::alert::Alert;
use super::types::IocSet;

// Keyword lists, tested as substrings of the lowercased key
const IP_KEYS: &[&str] = &[
    "srcip", "dstip", "remip", "locip", "ip", "source_ip", "destination_ip",
];
const DOMAIN_KEYS: &[&str] = &["domain", "hostname", "url", "fqdn"];
const HASH_KEYS: &[&str] = &[
    "hash", "file_hash", "process_hash", "md5", "sha1", "sha256",
];
const USER_KEYS: &[&str] = &["user", "username", "account"];
const PROCESS_KEYS: &[&str] = &["process", "process_name", "image_path"];

/// Extract indicator sets from a classified alert. Idempotent.
pub fn extract_iocs(alert: &Alert) -> IocSet {
    let mut iocs = IocSet::default();

    let mut fields: Vec<(String, String)> = Vec::new();
    flatten_into("", &alert.original, &mut fields);

    for (key, value) in fields {
        route_field(&mut iocs, &key, value);
    }

    iocs
}

/// Flatten nested objects into dot-joined key paths.
/// Arrays and other non-string leaves are dropped silently.
fn flatten_into(prefix: &str, map: &Map<String, Value>, out: &mut Vec<(String, String)>) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.to_lowercase()
        } else {
            format!("{}.{}", prefix, key.to_lowercase())
        };

        match value {
            Value::String(s) => out.push((path, s.to_lowercase())),
            Value::Object(nested) => flatten_into(&path, nested, out),
            _ => {}
        }
    }
}

/// First matching category wins; one category per key.
/// Checked in the fixed order ip, domain, hash, user, process.
fn route_field(iocs: &mut IocSet, key: &str, value: String) {
    if matches_any(key, IP_KEYS) {
        IocSet::push_dedup(&mut iocs.ips, value);
    } else if matches_any(key, DOMAIN_KEYS) {
        IocSet::push_dedup(&mut iocs.domains, value);
    } else if matches_any(key, HASH_KEYS) {
        IocSet::push_dedup(&mut iocs.hashes, value);
    } else if matches_any(key, USER_KEYS) {
        IocSet::push_dedup(&mut iocs.users, value);
    } else if matches_any(key, PROCESS_KEYS) {
        IocSet::push_dedup(&mut iocs.processes, value);
    }
}

fn matches_any(key: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| key.contains(kw))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::alert::classify;
    use serde_json::json;

    fn alert_from(raw: serde_json::Value) -> Alert {
        classify(&raw)
    }

    #[test]
    fn test_ip_fields_are_routed() {
        let alert = alert_from(json!({
            "type": "traffic",
            "srcip": "10.0.0.666",
            "dstip": "8.8.8.8"
        }));

        let iocs = extract_iocs(&alert);
        assert_eq!(iocs.ips, vec!["10.0.0.666", "8.8.8.8"]);
        assert!(iocs.domains.is_empty());
    }

    #[test]
    fn test_values_are_lowercased() {
        let alert = alert_from(json!({
            "hostname": "EVIL.Example.COM",
            "User": "Administrator"
        }));

        let iocs = extract_iocs(&alert);
        assert_eq!(iocs.domains, vec!["evil.example.com"]);
        assert_eq!(iocs.users, vec!["administrator"]);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let alert = alert_from(json!({
            "srcip": "10.0.0.1",
            "remip": "10.0.0.1",
            "dstip": "10.0.0.2"
        }));

        let iocs = extract_iocs(&alert);
        assert_eq!(iocs.ips, vec!["10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn test_non_string_values_dropped() {
        let alert = alert_from(json!({
            "srcport": 443,
            "dstip": "1.2.3.4",
            "tags": ["a", "b"]
        }));

        let iocs = extract_iocs(&alert);
        assert_eq!(iocs.ips, vec!["1.2.3.4"]);
        assert_eq!(iocs.total(), 1);
    }

    #[test]
    fn test_nested_objects_are_flattened() {
        let alert = alert_from(json!({
            "details": { "process_hash": "ABCDEF0123", "username": "svc-backup" }
        }));

        let iocs = extract_iocs(&alert);
        assert_eq!(iocs.hashes, vec!["abcdef0123"]);
        assert_eq!(iocs.users, vec!["svc-backup"]);
    }

    #[test]
    fn test_first_category_wins() {
        // "source_ip_username" matches both the ip and user lists;
        // ip is checked first and claims the key
        let alert = alert_from(json!({ "source_ip_username": "value" }));

        let iocs = extract_iocs(&alert);
        assert_eq!(iocs.ips, vec!["value"]);
        assert!(iocs.users.is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let alert = alert_from(json!({
            "srcip": "10.0.0.1",
            "hostname": "bad.site",
            "process_name": "dropper.exe"
        }));

        let first = extract_iocs(&alert);
        let second = extract_iocs(&alert);
        assert_eq!(first, second);
    }

    #[test]
    fn test_unrelated_keys_ignored() {
        let alert = alert_from(json!({ "logdesc": "DHCP ack", "action": "accept" }));
        assert!(extract_iocs(&alert).is_empty());
    }
}
