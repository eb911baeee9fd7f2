//! Prometheus text exposition for adaptive-threshold state.
//!
//! Renders threshold states and the latest forecast pass into the
//! Prometheus text format for a host's `/metrics` endpoint. Foresight does
//! not own an HTTP surface; this is a rendering helper only.

use foresight_core::types::Trend;

use crate::incident::ThresholdState;

/// Render threshold states and trends into Prometheus text format.
pub fn render_prometheus(states: &[ThresholdState], trends: &[Trend]) -> String {
    let mut out = String::new();

    out.push_str("# HELP foresight_adaptive_threshold Current adaptive alert threshold.\n");
    out.push_str("# TYPE foresight_adaptive_threshold gauge\n");
    for s in states {
        out.push_str(&format!(
            "foresight_adaptive_threshold{{metric=\"{}\"}} {:.4}\n",
            s.metric, s.current_threshold
        ));
    }

    out.push_str("# HELP foresight_recurrence_count Breaches within the current recurrence streak.\n");
    out.push_str("# TYPE foresight_recurrence_count gauge\n");
    for s in states {
        out.push_str(&format!(
            "foresight_recurrence_count{{metric=\"{}\"}} {}\n",
            s.metric, s.recurrence_count
        ));
    }

    out.push_str("# HELP foresight_trend_slope_per_minute Fitted slope of the metric window.\n");
    out.push_str("# TYPE foresight_trend_slope_per_minute gauge\n");
    for t in trends {
        out.push_str(&format!(
            "foresight_trend_slope_per_minute{{metric=\"{}\"}} {:.6}\n",
            t.metric, t.slope_per_minute
        ));
    }

    out.push_str("# HELP foresight_predicted_breach_ts Forecast breach time (unix seconds).\n");
    out.push_str("# TYPE foresight_predicted_breach_ts gauge\n");
    for t in trends {
        if let Some(cross_ts) = t.predicted_cross_ts {
            out.push_str(&format!(
                "foresight_predicted_breach_ts{{metric=\"{}\"}} {}\n",
                t.metric, cross_ts
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(metric: &str, threshold: f64, count: u32) -> ThresholdState {
        ThresholdState {
            metric: metric.to_string(),
            current_threshold: threshold,
            last_incident_ts: Some(1000),
            recurrence_count: count,
        }
    }

    #[test]
    fn render_empty() {
        let output = render_prometheus(&[], &[]);
        assert!(output.contains("# HELP foresight_adaptive_threshold"));
        assert!(output.contains("# TYPE foresight_adaptive_threshold gauge"));
    }

    #[test]
    fn render_states_and_trends() {
        let states = vec![state("error_rate_percent", 6.0, 2)];
        let trends = vec![Trend {
            metric: "error_rate_percent".to_string(),
            slope_per_minute: 0.6,
            intercept: 1.0,
            predicted_cross_ts: Some(900),
        }];

        let output = render_prometheus(&states, &trends);
        assert!(output.contains(
            "foresight_adaptive_threshold{metric=\"error_rate_percent\"} 6.0000"
        ));
        assert!(output.contains("foresight_recurrence_count{metric=\"error_rate_percent\"} 2"));
        assert!(output
            .contains("foresight_trend_slope_per_minute{metric=\"error_rate_percent\"} 0.600000"));
        assert!(output.contains("foresight_predicted_breach_ts{metric=\"error_rate_percent\"} 900"));
    }

    #[test]
    fn no_crossing_omits_breach_line() {
        let trends = vec![Trend {
            metric: "latency_p99_ms".to_string(),
            slope_per_minute: -0.1,
            intercept: 100.0,
            predicted_cross_ts: None,
        }];

        let output = render_prometheus(&[], &trends);
        assert!(!output.contains("foresight_predicted_breach_ts{metric="));
    }
}
