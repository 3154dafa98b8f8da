//! Alert Envelope & Classification

pub mod classifier;
pub mod types;

pub use classifier::classify;
pub use types::{Alert, AlertStatus, AlertType, HIGH_SEVERITY_THRESHOLD};
