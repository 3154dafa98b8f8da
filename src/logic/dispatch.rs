//! Analysis Dispatcher
//!
//! Bridges Classifier -> Backend -> Threat Intel -> Store.
//! Per-alert failures become `failed` records on the store; they never
//! abort the batch. Only store I/O failures propagate.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde_json::{json, Value};

use crate::logic::alert::{classify, Alert, AlertStatus};
use crate::logic::analyzer::{AnalyzerRegistry, BackendRequest};
use crate::logic::cache::ResultCache;
use crate::logic::store::{AlertStore, StoreError};
use crate::logic::threat_intel::{extract_iocs, score, IntelCorrelator, ThreatDatabase};

// ============================================================================
// ERRORS
// ============================================================================

/// Why a single alert's dispatch was aborted
#[derive(Debug, Clone)]
pub enum DispatchError {
    /// Required fields absent for the resolved backend
    Validation(String),
    /// No backend registered for the classified type
    UnknownAnalyzer(String),
    /// Network/timeout/non-2xx from the primary analysis call
    Backend {
        status: Option<u16>,
        message: String,
    },
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::Validation(m) => write!(f, "Validation failed: {}", m),
            DispatchError::UnknownAnalyzer(t) => {
                write!(f, "No analyzer registered for type: {}", t)
            }
            DispatchError::Backend {
                status: Some(code),
                message,
            } => write!(f, "Backend error ({}): {}", code, message),
            DispatchError::Backend {
                status: None,
                message,
            } => write!(f, "Backend error: {}", message),
        }
    }
}

impl std::error::Error for DispatchError {}

// ============================================================================
// BATCH SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub analyzed: usize,
    pub failed: usize,
}

// ============================================================================
// DISPATCHER
// ============================================================================

/// Owns the injected pipeline context: store, registry, threat database,
/// optional result cache and the shared HTTP client.
pub struct AnalysisDispatcher {
    store: AlertStore,
    registry: AnalyzerRegistry,
    threat_db: Arc<RwLock<ThreatDatabase>>,
    cache: Option<ResultCache>,
    correlator: IntelCorrelator,
    http: reqwest::Client,
}

impl AnalysisDispatcher {
    pub fn new(
        store: AlertStore,
        registry: AnalyzerRegistry,
        threat_db: Arc<RwLock<ThreatDatabase>>,
        cache: Option<ResultCache>,
        correlator: IntelCorrelator,
    ) -> Self {
        Self {
            store,
            registry,
            threat_db,
            cache,
            correlator,
            http: reqwest::Client::new(),
        }
    }

    pub fn store(&self) -> &AlertStore {
        &self.store
    }

    pub fn threat_db(&self) -> Arc<RwLock<ThreatDatabase>> {
        self.threat_db.clone()
    }

    /// Single entry point: raw log in, terminal record out.
    ///
    /// Every per-alert failure is captured on the record itself
    /// (`status = failed` + error message); only store I/O failures
    /// propagate to the caller.
    pub async fn process_alert(&self, raw: &Value) -> Result<Alert, StoreError> {
        let mut alert = classify(raw);

        // Persist the raw classification first - the record exists even if
        // every later stage fails
        self.store.save(&mut alert)?;

        match self.analyze(&alert).await {
            Ok((analysis, threat_intel)) => {
                let mut finished = alert;
                finished.analysis = Some(analysis);
                finished.threat_intel = threat_intel;
                finished.status = AlertStatus::Analyzed;
                finished.timestamp = Utc::now().to_rfc3339();
                self.store.save(&mut finished)?;
                Ok(finished)
            }
            Err(e) => {
                log::error!(
                    "Alert {} dispatch failed: {}",
                    alert.id.as_deref().unwrap_or("-"),
                    e
                );
                let mut failed = alert;
                failed.status = AlertStatus::Failed;
                failed.error = Some(e.to_string());
                failed.analysis = None;
                failed.timestamp = Utc::now().to_rfc3339();
                self.store.save(&mut failed)?;
                Ok(failed)
            }
        }
    }

    /// Strictly sequential batch - one alert start-to-finish at a time,
    /// bounding load on the inference backends.
    pub async fn process_batch(&self, logs: &[Value]) -> Result<BatchSummary, StoreError> {
        let total = logs.len();
        let mut summary = BatchSummary::default();

        for (index, raw) in logs.iter().enumerate() {
            let record = self.process_alert(raw).await?;
            summary.processed += 1;

            match record.status {
                AlertStatus::Analyzed => {
                    summary.analyzed += 1;
                    log::info!(
                        "[{}/{}] {} alert processed (id: {}, severity: {})",
                        index + 1,
                        total,
                        record.alert_type.as_str().to_uppercase(),
                        record.id.as_deref().unwrap_or("-"),
                        record.severity
                    );
                }
                _ => {
                    summary.failed += 1;
                    log::warn!(
                        "[{}/{}] alert failed: {}",
                        index + 1,
                        total,
                        record.error.as_deref().unwrap_or("unknown error")
                    );
                }
            }
        }

        Ok(summary)
    }

    /// Primary analysis + conditional enrichment.
    async fn analyze(&self, alert: &Alert) -> Result<(Value, Option<Value>), DispatchError> {
        let analyzer = self
            .registry
            .get(alert.alert_type)
            .ok_or_else(|| DispatchError::UnknownAnalyzer(alert.alert_type.to_string()))?;

        analyzer.validate(alert)?;

        let analysis = match self.cached_analysis(alert) {
            Some(hit) => hit,
            None => {
                let request = analyzer.build_request(alert);
                let response = self.execute(request).await?;
                self.cache_analysis(alert, &response);
                response
            }
        };

        // High-severity alerts additionally get threat-intel correlation.
        // Enrichment degrades on failure - it never fails the dispatch.
        let threat_intel = if alert.is_high_severity() {
            Some(self.enrich(alert).await)
        } else {
            None
        };

        Ok((analysis, threat_intel))
    }

    fn cached_analysis(&self, alert: &Alert) -> Option<Value> {
        let cache = self.cache.as_ref()?;
        let id = alert.id.as_deref()?;
        let hit = cache.get(id);
        if hit.is_some() {
            log::debug!("Analysis cache hit for alert {}", id);
        }
        hit
    }

    fn cache_analysis(&self, alert: &Alert, analysis: &Value) {
        if let (Some(cache), Some(id)) = (self.cache.as_ref(), alert.id.as_deref()) {
            cache.set(id, analysis.clone());
        }
    }

    /// Execute a built backend request. Non-2xx carries the backend-provided
    /// message when one is available.
    async fn execute(&self, request: BackendRequest) -> Result<Value, DispatchError> {
        let mut builder = self
            .http
            .post(&request.url)
            .timeout(request.timeout)
            .json(&request.body);

        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }

        let response = builder.send().await.map_err(|e| DispatchError::Backend {
            status: None,
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .and_then(|t| extract_backend_message(&t))
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(DispatchError::Backend {
                status: Some(status.as_u16()),
                message,
            });
        }

        response.json().await.map_err(|e| DispatchError::Backend {
            status: None,
            message: format!("unparseable backend response: {}", e),
        })
    }

    /// Local scoring always runs and is the enrichment baseline; the remote
    /// correlator is merged on top when configured. Failure degrades to an
    /// inconclusive placeholder, never an error.
    async fn enrich(&self, alert: &Alert) -> Value {
        let iocs = extract_iocs(alert);

        let mut report = {
            let db = self.threat_db.read();
            score(&iocs, &db)
        };

        if self.correlator.is_configured() {
            match self.correlator.correlate(&self.http, &iocs).await {
                Ok(remote) => report.remote = Some(remote),
                Err(e) => {
                    log::warn!("{}", e);
                    report.error = Some(format!("Threat intel lookup failed: {}", e.0));
                }
            }
        }

        serde_json::to_value(&report)
            .unwrap_or_else(|e| json!({ "verdict": "inconclusive", "error": e.to_string() }))
    }
}

/// Pull a human-readable message out of a backend error body
fn extract_backend_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .or_else(|| value.get("error"))
        .or_else(|| value.get("message"))
        .and_then(Value::as_str)
        .map(|s| s.to_string())
}

// ============================================================================
// TESTS
// ============================================================================
