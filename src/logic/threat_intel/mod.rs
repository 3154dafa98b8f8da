//! Threat Intelligence Engine
//!
//! IOC extraction, known-bad database, local scoring, feed ingestion and
//! remote correlation.

pub mod correlator;
pub mod database;
pub mod extractor;
pub mod feed;
pub mod scorer;
pub mod types;

pub use correlator::{CorrelatorConfig, EnrichmentError, IntelCorrelator};
pub use database::ThreatDatabase;
pub use extractor::extract_iocs;
pub use scorer::score;
pub use types::{IndicatorKind, IntelReport, IocSet, ThreatBatch, Verdict};
