//! Incident handler — reactive breach logging and adaptive thresholds.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use foresight_core::config::IncidentConfig;
use foresight_core::ports::{EventEmitter, GaugeSink};
use foresight_core::types::{EventSeverity, ResponseAction};

/// A confirmed threshold breach. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Incident {
    pub incident_id: String,
    pub name: String,
    pub metric: String,
    pub observed_value: f64,
    pub threshold_at_time: f64,
    /// Free-form context captured at breach time.
    pub context: serde_json::Value,
    pub response_action: ResponseAction,
    pub created_at: u64,
}

/// Adaptive threshold state for one metric.
///
/// Owned by the `IncidentHandler` and mutated only by breach processing;
/// the prediction side reads thresholds from the external source, so this
/// state is what the handler *reports back* to that source via gauges.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThresholdState {
    pub metric: String,
    pub current_threshold: f64,
    pub last_incident_ts: Option<u64>,
    pub recurrence_count: u32,
}

struct HandlerState {
    thresholds: HashMap<String, ThresholdState>,
    /// Append-at-back incident log; oldest evicted beyond the cap.
    incidents: VecDeque<Incident>,
}

/// Records incidents and raises thresholds for metrics that keep breaching.
///
/// All mutation goes through `handle_breach` behind one mutex, so incident
/// and threshold updates for a metric are applied in call order.
pub struct IncidentHandler {
    state: Mutex<HandlerState>,
    gauges: Arc<dyn GaugeSink>,
    events: Arc<dyn EventEmitter>,
    recurrence_window_secs: u64,
    bump_factor: f64,
    max_incidents: usize,
}

impl IncidentHandler {
    pub fn new(
        config: &IncidentConfig,
        gauges: Arc<dyn GaugeSink>,
        events: Arc<dyn EventEmitter>,
    ) -> Self {
        Self {
            state: Mutex::new(HandlerState {
                thresholds: HashMap::new(),
                incidents: VecDeque::new(),
            }),
            gauges,
            events,
            recurrence_window_secs: config.recurrence_window_secs,
            bump_factor: config.bump_factor,
            max_incidents: config.max_incidents.max(1),
        }
    }

    /// Process a confirmed breach reported by the caller.
    ///
    /// Appends an incident, determines the advisory response action, applies
    /// the recurrence rule, exports the (possibly bumped) threshold through
    /// the gauge sink, and stamps `last_incident_ts`.
    ///
    /// Recurrence rule: a breach of the same metric within the recurrence
    /// window multiplies the stored threshold by the bump factor; otherwise
    /// the caller's threshold is adopted unchanged and the recurrence count
    /// resets to 1.
    pub fn handle_breach(
        &self,
        name: &str,
        metric: &str,
        observed_value: f64,
        threshold: f64,
        context: serde_json::Value,
        now: u64,
    ) -> Incident {
        let mut state = self.state.lock().expect("incident lock poisoned");

        let entry = state
            .thresholds
            .entry(metric.to_string())
            .or_insert_with(|| ThresholdState {
                metric: metric.to_string(),
                current_threshold: threshold,
                last_incident_ts: None,
                recurrence_count: 0,
            });

        let recurring = entry
            .last_incident_ts
            .is_some_and(|last| now.saturating_sub(last) <= self.recurrence_window_secs);

        if recurring {
            entry.recurrence_count += 1;
            entry.current_threshold *= self.bump_factor;
            warn!(
                %metric,
                recurrence_count = entry.recurrence_count,
                new_threshold = entry.current_threshold,
                "recurring breach, threshold bumped"
            );
            self.events.emit(
                "threshold_bumped",
                EventSeverity::Warning,
                &serde_json::json!({
                    "metric": metric,
                    "threshold": entry.current_threshold,
                    "recurrence_count": entry.recurrence_count,
                }),
            );
        } else {
            entry.recurrence_count = 1;
            entry.current_threshold = threshold;
        }
        entry.last_incident_ts = Some(now);

        let adaptive_threshold = entry.current_threshold;

        let incident = Incident {
            incident_id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            metric: metric.to_string(),
            observed_value,
            threshold_at_time: threshold,
            context,
            response_action: ResponseAction::for_metric(metric),
            created_at: now,
        };

        state.incidents.push_back(incident.clone());
        while state.incidents.len() > self.max_incidents {
            state.incidents.pop_front();
        }
        drop(state);

        info!(
            %metric,
            incident_id = %incident.incident_id,
            observed_value,
            threshold,
            action = incident.response_action.as_str(),
            "incident recorded"
        );
        self.events.emit(
            "incident_recorded",
            EventSeverity::Critical,
            &serde_json::json!({
                "incident_id": incident.incident_id,
                "name": name,
                "metric": metric,
                "observed_value": observed_value,
                "response_action": incident.response_action.as_str(),
            }),
        );
        // Best-effort: downstream alerting follows the adaptive threshold.
        self.gauges.set_gauges(&[(
            format!("adaptive_threshold_{metric}"),
            adaptive_threshold,
        )]);

        incident
    }

    /// The most recent incidents, most-recent-first, never more than
    /// `limit`.
    pub fn incidents(&self, limit: usize) -> Vec<Incident> {
        let state = self.state.lock().expect("incident lock poisoned");
        state.incidents.iter().rev().take(limit).cloned().collect()
    }

    /// Adaptive threshold state for one metric, if it has ever breached.
    pub fn threshold_state(&self, metric: &str) -> Option<ThresholdState> {
        let state = self.state.lock().expect("incident lock poisoned");
        state.thresholds.get(metric).cloned()
    }

    /// Snapshot of all adaptive threshold states, for gauge re-export or
    /// external persistence.
    pub fn threshold_states(&self) -> Vec<ThresholdState> {
        let state = self.state.lock().expect("incident lock poisoned");
        state.thresholds.values().cloned().collect()
    }
}
