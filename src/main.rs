//! SOC AI Agent - Alert Triage Core Entry Point
//!
//! Batch driver: reads a JSON array of raw security logs and runs each one
//! through the triage pipeline sequentially. Per-alert failures are recorded
//! and logged; only unreadable input aborts the run.

mod constants;
mod logic;

use std::process;
use std::sync::Arc;

use parking_lot::RwLock;

use logic::analyzer::AnalyzerRegistry;
use logic::cache::ResultCache;
use logic::dispatch::AnalysisDispatcher;
use logic::store::AlertStore;
use logic::threat_intel::{feed, CorrelatorConfig, IndicatorKind, IntelCorrelator, ThreatDatabase};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!(
        "Starting {} v{} (alert triage core)...",
        constants::APP_NAME,
        constants::APP_VERSION
    );

    let logs_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "test-data/logs.json".to_string());

    let logs = match load_logs(&logs_path) {
        Ok(logs) => logs,
        Err(e) => {
            log::error!("Fatal: cannot read input logs from {}: {}", logs_path, e);
            process::exit(1);
        }
    };

    log::info!("Processing {} alerts from {}...", logs.len(), logs_path);

    let mut db = ThreatDatabase::seeded();
    log::info!("Threat database seeded with {} indicators", db.total());

    // Optional feed sync - degraded, never fatal
    if let Some(url) = constants::get_threat_feed_url() {
        let kind = IndicatorKind::parse(&constants::get_threat_feed_kind())
            .unwrap_or(IndicatorKind::Ip);
        match feed::fetch_feed(&url, kind) {
            Ok(batch) => {
                let merged = batch.total();
                db.add_threats(batch);
                log::info!("Merged {} {} indicators from threat feed", merged, kind.as_str());
            }
            Err(e) => log::warn!("Threat feed sync failed, continuing with seed: {}", e),
        }
    }

    let store = match AlertStore::open_default() {
        Ok(store) => store,
        Err(e) => {
            log::error!("Fatal: cannot open alert store: {}", e);
            process::exit(1);
        }
    };

    let cache = if constants::is_cache_enabled() {
        Some(ResultCache::with_default_ttl())
    } else {
        None
    };

    let dispatcher = AnalysisDispatcher::new(
        store,
        AnalyzerRegistry::with_defaults(),
        Arc::new(RwLock::new(db)),
        cache,
        IntelCorrelator::new(CorrelatorConfig::default()),
    );

    match dispatcher.process_batch(&logs).await {
        Ok(summary) => {
            log::info!(
                "Analysis complete: {} processed, {} analyzed, {} failed",
                summary.processed,
                summary.analyzed,
                summary.failed
            );
        }
        Err(e) => {
            log::error!("Fatal: alert store failure mid-batch: {}", e);
            process::exit(1);
        }
    }
}

fn load_logs(path: &str) -> Result<Vec<serde_json::Value>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let logs = serde_json::from_str(&content)?;
    Ok(logs)
}
