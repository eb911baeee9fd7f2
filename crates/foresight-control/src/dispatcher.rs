//! Preemptive action dispatcher — throttled mitigation on forecast breaches.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use foresight_core::ports::{EventEmitter, ThresholdSource};
use foresight_core::types::{EventSeverity, Trend};
use foresight_observe::ObservationStore;

/// Boxed future returned by mitigation callbacks.
pub type BoxFuture = std::pin::Pin<Box<dyn std::future::Future<Output = anyhow::Result<()>> + Send>>;

/// Callback type for mitigation actions.
///
/// The dispatcher calls this with the metric name when a breach is forecast
/// for it. Return values and errors are opaque to the loop: failures are
/// logged and never propagate.
pub type MitigationFn = Arc<dyn Fn(&str) -> BoxFuture + Send + Sync>;

/// Evaluates all metrics and triggers mitigation for forecast breaches,
/// at most once per cooldown period per metric.
pub struct PreemptDispatcher {
    observations: Arc<ObservationStore>,
    thresholds: Arc<dyn ThresholdSource>,
    events: Arc<dyn EventEmitter>,
    /// Registered mitigation callbacks: metric → callback.
    mitigations: HashMap<String, MitigationFn>,
    /// Unix timestamp of the last mitigation attempt per metric. The
    /// cooldown clock is anchored here, not to the first attempt.
    last_attempt: Mutex<HashMap<String, u64>>,
    cooldown_secs: u64,
    horizon_secs: u64,
}

impl PreemptDispatcher {
    pub fn new(
        observations: Arc<ObservationStore>,
        thresholds: Arc<dyn ThresholdSource>,
        events: Arc<dyn EventEmitter>,
        cooldown_secs: u64,
        horizon_secs: u64,
    ) -> Self {
        Self {
            observations,
            thresholds,
            events,
            mitigations: HashMap::new(),
            last_attempt: Mutex::new(HashMap::new()),
            cooldown_secs,
            horizon_secs,
        }
    }

    /// Register a mitigation callback for a metric.
    pub fn with_mitigation(mut self, metric: &str, f: MitigationFn) -> Self {
        self.mitigations.insert(metric.to_string(), f);
        self
    }

    /// Re-evaluate every metric and trigger throttled mitigation.
    ///
    /// Reads the threshold source fresh, forecasts each metric, and for any
    /// metric with a predicted crossing whose cooldown has elapsed, records
    /// the attempt timestamp and fires the registered callback in a spawned
    /// task. A slow or failing callback never delays the evaluation of
    /// remaining metrics.
    ///
    /// Returns the trends computed this pass (crossing or not).
    pub async fn maybe_preempt(&self, now: u64) -> Vec<Trend> {
        let thresholds = self.thresholds.thresholds();
        let trends =
            foresight_forecast::evaluate_all(&self.observations, &thresholds, now, self.horizon_secs);

        for trend in &trends {
            let Some(cross_ts) = trend.predicted_cross_ts else {
                continue;
            };

            if !self.try_claim_cooldown(&trend.metric, now) {
                debug!(metric = %trend.metric, "mitigation suppressed by cooldown");
                continue;
            }

            self.events.emit(
                "preemptive_mitigation",
                EventSeverity::Warning,
                &serde_json::json!({
                    "metric": trend.metric,
                    "slope_per_minute": trend.slope_per_minute,
                    "predicted_cross_ts": cross_ts,
                }),
            );

            match self.mitigations.get(&trend.metric) {
                Some(callback) => self.fire(&trend.metric, callback.clone()),
                None => debug!(metric = %trend.metric, "no mitigation registered"),
            }
        }

        trends
    }

    /// Atomically check the cooldown and stamp the attempt time.
    fn try_claim_cooldown(&self, metric: &str, now: u64) -> bool {
        let mut last = self.last_attempt.lock().expect("cooldown lock poisoned");
        if let Some(&stamped) = last.get(metric)
            && now.saturating_sub(stamped) < self.cooldown_secs
        {
            return false;
        }
        last.insert(metric.to_string(), now);
        true
    }

    /// Run a mitigation callback without blocking the evaluation pass.
    fn fire(&self, metric: &str, callback: MitigationFn) {
        let metric = metric.to_string();
        let events = Arc::clone(&self.events);
        let fut = callback(&metric);
        tokio::spawn(async move {
            if let Err(e) = fut.await {
                warn!(%metric, error = %e, "mitigation callback failed");
                events.emit(
                    "mitigation_failed",
                    EventSeverity::Warning,
                    &serde_json::json!({ "metric": metric, "error": e.to_string() }),
                );
            } else {
                debug!(%metric, "mitigation callback completed");
            }
        });
    }
}
