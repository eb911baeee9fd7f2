//! Prediction evaluator — turns a fitted trend into a crossing forecast.

use std::collections::HashMap;

use tracing::debug;

use foresight_core::types::{Observation, Trend};
use foresight_observe::ObservationStore;

use crate::estimator;

/// Slopes flatter than this (per minute) are treated as no trend.
const MIN_SLOPE_PER_MINUTE: f64 = 1e-9;

/// Evaluate one metric window against its threshold.
///
/// Fits the trend and solves for the time at which the fitted line reaches
/// `threshold`. The crossing is only reported when the slope rises toward
/// the threshold, the projected value at `now` is still below it, and the
/// crossing lands within `[now, now + horizon_secs]`.
///
/// Only the rising-toward-threshold case is implemented. Metrics where
/// *falling* is the danger direction must be fed negated values and a
/// negated threshold by the caller; that mirroring is a call-site
/// responsibility and must be documented there.
///
/// Returns `None` for windows with insufficient data (fewer than two points
/// or a zero time span) — expected, not an error.
pub fn evaluate(
    metric: &str,
    window: &[Observation],
    threshold: f64,
    now: u64,
    horizon_secs: u64,
) -> Option<Trend> {
    let fit = estimator::fit(window)?;

    let mut trend = Trend {
        metric: metric.to_string(),
        slope_per_minute: fit.slope_per_minute,
        intercept: fit.intercept,
        predicted_cross_ts: None,
    };

    if fit.slope_per_minute.abs() < MIN_SLOPE_PER_MINUTE || fit.slope_per_minute < 0.0 {
        return Some(trend);
    }

    // Already at or past the threshold: that is the reactive path's job.
    if fit.value_at(now) >= threshold {
        return Some(trend);
    }

    let cross_minutes = (threshold - fit.intercept) / fit.slope_per_minute;
    let cross_ts = fit.base_ts as f64 + cross_minutes * 60.0;

    if cross_ts >= now as f64 && cross_ts <= (now + horizon_secs) as f64 {
        let cross_ts = cross_ts.round() as u64;
        debug!(
            %metric,
            slope_per_minute = fit.slope_per_minute,
            threshold,
            cross_ts,
            "breach forecast within horizon"
        );
        trend.predicted_cross_ts = Some(cross_ts);
    }

    Some(trend)
}

/// Evaluate every metric in the store against a threshold snapshot.
///
/// Metrics with insufficient data, and metrics absent from `thresholds`,
/// are omitted from the result rather than errored.
pub fn evaluate_all(
    store: &ObservationStore,
    thresholds: &HashMap<String, f64>,
    now: u64,
    horizon_secs: u64,
) -> Vec<Trend> {
    let mut trends = Vec::new();
    for metric in store.metrics() {
        let Some(&threshold) = thresholds.get(&metric) else {
            continue;
        };
        let window = store.window(&metric);
        if let Some(trend) = evaluate(&metric, &window, threshold, now, horizon_secs) {
            trends.push(trend);
        }
    }
    trends
}
