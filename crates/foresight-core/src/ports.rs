//! Ports — the narrow interfaces a host process implements.
//!
//! The control loop treats its surroundings (threshold configuration, the
//! monitoring system, the audit log) as injected trait objects, constructed
//! once and passed in. Gauge and event emission are best-effort: the loop
//! never propagates a sink failure.

use std::collections::HashMap;

use tracing::warn;

use crate::types::EventSeverity;

/// Source of the current alert thresholds, queried fresh on each
/// evaluation pass. Metrics absent from the map are skipped.
pub trait ThresholdSource: Send + Sync {
    fn thresholds(&self) -> HashMap<String, f64>;
}

/// Export of named gauge values to an external monitoring system.
///
/// Implementations must swallow their own failures; callers treat every
/// `set_gauges` call as fire-and-forget.
pub trait GaugeSink: Send + Sync {
    fn set_gauges(&self, values: &[(String, f64)]);
}

/// Structured audit events for incidents, preemptions, and failures.
///
/// Best-effort: implementations must not block or panic on delivery
/// problems.
pub trait EventEmitter: Send + Sync {
    fn emit(&self, event: &str, severity: EventSeverity, fields: &serde_json::Value);
}

/// Fixed in-memory threshold map, for tests and static deployments.
#[derive(Debug, Clone, Default)]
pub struct StaticThresholds {
    thresholds: HashMap<String, f64>,
}

impl StaticThresholds {
    pub fn new(thresholds: HashMap<String, f64>) -> Self {
        Self { thresholds }
    }
}

impl ThresholdSource for StaticThresholds {
    fn thresholds(&self) -> HashMap<String, f64> {
        self.thresholds.clone()
    }
}

/// Gauge sink that discards everything. For hosts without a metrics system.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGauge;

impl GaugeSink for NullGauge {
    fn set_gauges(&self, _values: &[(String, f64)]) {}
}

/// Event emitter that writes events to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEmitter;

impl EventEmitter for LogEmitter {
    fn emit(&self, event: &str, severity: EventSeverity, fields: &serde_json::Value) {
        match severity {
            EventSeverity::Info => tracing::info!(%event, %fields, "audit event"),
            EventSeverity::Warning => warn!(%event, %fields, "audit event"),
            EventSeverity::Critical => tracing::error!(%event, %fields, "audit event"),
        }
    }
}
