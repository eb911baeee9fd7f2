//! Process-wide control-loop context.
//!
//! One `ControlLoop` per process replaces any global registry: it owns the
//! observation store, dispatcher, and incident handler, and is handed to
//! the external scheduler that drives `record` / `maybe_preempt` /
//! `handle_breach`.

use std::sync::Arc;

use foresight_core::config::ForesightConfig;
use foresight_core::ports::{EventEmitter, GaugeSink, ThresholdSource};
use foresight_core::types::Trend;
use foresight_observe::ObservationStore;

use crate::dispatcher::{MitigationFn, PreemptDispatcher};
use crate::incident::{Incident, IncidentHandler, ThresholdState};

/// The assembled control loop.
///
/// Construction wires the injected ports once; afterwards the loop holds no
/// hidden shared state. All timestamps are supplied by the caller, so the
/// loop never reads the wall clock and tests run on synthetic time.
///
/// Metrics where *falling* is the danger direction must be recorded negated
/// (and their thresholds negated in the threshold source): the forecast
/// side only implements the rising-toward-threshold case.
pub struct ControlLoop {
    observations: Arc<ObservationStore>,
    dispatcher: PreemptDispatcher,
    incidents: IncidentHandler,
    thresholds: Arc<dyn ThresholdSource>,
    horizon_secs: u64,
}

impl ControlLoop {
    /// Build a control loop from configuration and injected ports.
    pub fn new(
        config: &ForesightConfig,
        thresholds: Arc<dyn ThresholdSource>,
        gauges: Arc<dyn GaugeSink>,
        events: Arc<dyn EventEmitter>,
    ) -> Self {
        let observations = Arc::new(ObservationStore::new(&config.observation));
        let dispatcher = PreemptDispatcher::new(
            Arc::clone(&observations),
            Arc::clone(&thresholds),
            Arc::clone(&events),
            config.preempt.cooldown_secs,
            config.forecast.horizon_secs,
        );
        let incidents = IncidentHandler::new(&config.incident, gauges, events);

        Self {
            observations,
            dispatcher,
            incidents,
            thresholds,
            horizon_secs: config.forecast.horizon_secs,
        }
    }

    /// Register a mitigation callback for a metric.
    pub fn with_mitigation(mut self, metric: &str, f: MitigationFn) -> Self {
        self.dispatcher = self.dispatcher.with_mitigation(metric, f);
        self
    }

    /// Record a metric sample. Never fails; safe to call from any thread
    /// concurrently with evaluation.
    pub fn record(&self, metric: &str, value: f64, timestamp: u64) {
        self.observations.record(metric, value, timestamp);
    }

    /// Forecast every metric against a fresh threshold snapshot, without
    /// side effects.
    pub fn evaluate(&self, now: u64) -> Vec<Trend> {
        let thresholds = self.thresholds.thresholds();
        foresight_forecast::evaluate_all(&self.observations, &thresholds, now, self.horizon_secs)
    }

    /// Forecast every metric and trigger throttled mitigation for
    /// predicted breaches.
    pub async fn maybe_preempt(&self, now: u64) -> Vec<Trend> {
        self.dispatcher.maybe_preempt(now).await
    }

    /// Report a confirmed breach.
    pub fn handle_breach(
        &self,
        name: &str,
        metric: &str,
        observed_value: f64,
        threshold: f64,
        context: serde_json::Value,
        now: u64,
    ) -> Incident {
        self.incidents
            .handle_breach(name, metric, observed_value, threshold, context, now)
    }

    /// The most recent incidents, most-recent-first.
    pub fn incidents(&self, limit: usize) -> Vec<Incident> {
        self.incidents.incidents(limit)
    }

    /// Adaptive threshold snapshot across all breached metrics.
    pub fn threshold_states(&self) -> Vec<ThresholdState> {
        self.incidents.threshold_states()
    }

    /// The underlying observation store, for hosts that feed samples from
    /// their own collection pipeline.
    pub fn observations(&self) -> Arc<ObservationStore> {
        Arc::clone(&self.observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};

    use foresight_core::ports::{LogEmitter, NullGauge, StaticThresholds};

    fn control_loop(thresholds: HashMap<String, f64>) -> ControlLoop {
        ControlLoop::new(
            &ForesightConfig::default(),
            Arc::new(StaticThresholds::new(thresholds)),
            Arc::new(NullGauge),
            Arc::new(LogEmitter),
        )
    }

    #[tokio::test]
    async fn end_to_end_forecast_preempt_and_breach() {
        let mitigations = Arc::new(AtomicU32::new(0));
        let mitigations_in_cb = Arc::clone(&mitigations);

        let control = control_loop(HashMap::from([(
            "error_rate_percent".to_string(),
            10.0,
        )]))
        .with_mitigation(
            "error_rate_percent",
            Arc::new(move |_| {
                let calls = Arc::clone(&mitigations_in_cb);
                Box::pin(async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
            }),
        );

        // Ramp toward the threshold: 0.6/min from 1.0.
        for i in 0..9u64 {
            control.record("error_rate_percent", 1.0 + 0.6 * i as f64, i * 60);
        }

        // Forecast only: no side effects.
        let trends = control.evaluate(480);
        assert_eq!(trends.len(), 1);
        assert!(trends[0].predicted_cross_ts.is_some());

        // Preempt: mitigation fires once.
        control.maybe_preempt(480).await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(mitigations.load(Ordering::SeqCst), 1);

        // The breach happens anyway; reactive path records it.
        let incident = control.handle_breach(
            "High error rate",
            "error_rate_percent",
            10.4,
            10.0,
            serde_json::json!({}),
            900,
        );
        assert_eq!(incident.metric, "error_rate_percent");
        assert_eq!(control.incidents(10).len(), 1);
        assert_eq!(control.threshold_states().len(), 1);
    }

    #[tokio::test]
    async fn evaluate_skips_metrics_without_thresholds() {
        let control = control_loop(HashMap::new());
        control.record("error_rate_percent", 1.0, 0);
        control.record("error_rate_percent", 2.0, 60);

        assert!(control.evaluate(120).is_empty());
    }

    #[test]
    fn incidents_empty_before_any_breach() {
        let control = control_loop(HashMap::new());
        assert!(control.incidents(10).is_empty());
        assert!(control.threshold_states().is_empty());
    }
}
