//! Analysis Backends
//!
//! Explicit registry mapping alert type -> backend request builder,
//! populated at startup. `Unknown` deliberately has no entry: resolution
//! misses surface as a typed dispatch error, not a runtime lookup failure.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;

use crate::logic::alert::{Alert, AlertType};
use crate::logic::dispatch::DispatchError;

pub mod app;
pub mod endpoint;
pub mod network;

pub use app::AppAnalyzer;
pub use endpoint::EndpointAnalyzer;
pub use network::NetworkAnalyzer;

// ============================================================================
// BACKEND REQUEST
// ============================================================================

/// A fully-built backend HTTP request, executed by the dispatcher
#[derive(Debug, Clone)]
pub struct BackendRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Value,
    pub timeout: Duration,
}

// ============================================================================
// ANALYZER TRAIT
// ============================================================================

/// One analysis backend. Request construction is pure; execution and error
/// mapping live in the dispatcher.
pub trait Analyzer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Reject alerts missing the fields this backend requires
    fn validate(&self, alert: &Alert) -> Result<(), DispatchError>;

    /// Build the backend-specific request from the classified alert
    fn build_request(&self, alert: &Alert) -> BackendRequest;
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Alert type -> backend handler, populated at startup
pub struct AnalyzerRegistry {
    backends: HashMap<AlertType, Box<dyn Analyzer>>,
}

impl AnalyzerRegistry {
    pub fn new() -> Self {
        Self {
            backends: HashMap::new(),
        }
    }

    /// Default wiring: network, endpoint, app. Unknown stays unmapped.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(AlertType::Network, Box::new(NetworkAnalyzer::default()));
        registry.register(AlertType::Endpoint, Box::new(EndpointAnalyzer::default()));
        registry.register(AlertType::App, Box::new(AppAnalyzer::default()));
        registry
    }

    pub fn register(&mut self, alert_type: AlertType, analyzer: Box<dyn Analyzer>) {
        self.backends.insert(alert_type, analyzer);
    }

    pub fn get(&self, alert_type: AlertType) -> Option<&dyn Analyzer> {
        self.backends.get(&alert_type).map(|b| b.as_ref())
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

impl Default for AnalyzerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// TESTS
// ============================================================================
