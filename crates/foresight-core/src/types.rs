//! Domain types shared across the Foresight crates.
//!
//! These are the values that flow between the observation store, the
//! forecast pipeline, and the control loop. Timestamps are unix epoch
//! seconds throughout; the external scheduler supplies `now` so the loop
//! itself never reads the wall clock.

use serde::{Deserialize, Serialize};

/// A single recorded metric sample. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    /// Metric name, e.g. "error_rate_percent".
    pub metric: String,
    /// Sampled value.
    pub value: f64,
    /// Unix timestamp (seconds) when the sample was taken.
    pub timestamp: u64,
}

/// Linear trend fitted over a metric's recent window.
///
/// Derived on each evaluation pass and never persisted. `slope_per_minute`
/// is the fitted rate of change; `intercept` is the fitted value at the
/// window's first sample.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trend {
    pub metric: String,
    pub slope_per_minute: f64,
    pub intercept: f64,
    /// When the fitted line is forecast to cross the metric's threshold,
    /// if that crossing falls within the evaluation horizon.
    pub predicted_cross_ts: Option<u64>,
}

/// Severity attached to emitted audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSeverity {
    Info,
    Warning,
    Critical,
}

/// Advisory remediation label attached to an incident.
///
/// This is human-facing text, not an executable command; wiring an action
/// to an actual actuator is the host's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseAction {
    /// Evict stale cache entries to relieve memory pressure.
    EvictCache,
    /// Add worker capacity to absorb rising latency.
    ScaleOutWorkers,
    /// Recycle request workers after an error-rate breach.
    RestartWorkers,
    /// No mapped remediation; a human should look.
    Investigate,
}

impl ResponseAction {
    /// Fixed mapping from metric name to a remediation label.
    ///
    /// Unmapped metrics fall back to `Investigate`.
    pub fn for_metric(metric: &str) -> Self {
        if metric.starts_with("memory") {
            ResponseAction::EvictCache
        } else if metric.starts_with("latency") {
            ResponseAction::ScaleOutWorkers
        } else if metric.starts_with("error_rate") {
            ResponseAction::RestartWorkers
        } else {
            ResponseAction::Investigate
        }
    }

    /// Stable wire label for the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseAction::EvictCache => "evict_cache",
            ResponseAction::ScaleOutWorkers => "scale_out_workers",
            ResponseAction::RestartWorkers => "restart_workers",
            ResponseAction::Investigate => "investigate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_action_mapping() {
        assert_eq!(
            ResponseAction::for_metric("memory_used_mb"),
            ResponseAction::EvictCache
        );
        assert_eq!(
            ResponseAction::for_metric("latency_p99_ms"),
            ResponseAction::ScaleOutWorkers
        );
        assert_eq!(
            ResponseAction::for_metric("error_rate_percent"),
            ResponseAction::RestartWorkers
        );
        assert_eq!(
            ResponseAction::for_metric("queue_depth"),
            ResponseAction::Investigate
        );
    }

    #[test]
    fn trend_serializes_optional_crossing() {
        let trend = Trend {
            metric: "error_rate_percent".to_string(),
            slope_per_minute: 0.5,
            intercept: 1.0,
            predicted_cross_ts: None,
        };
        let json = serde_json::to_string(&trend).unwrap();
        assert!(json.contains("\"predicted_cross_ts\":null"));
    }
}
