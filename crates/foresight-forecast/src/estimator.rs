//! Ordinary least-squares trend fitting over a metric window.

use foresight_core::types::Observation;

/// A fitted line over one metric window.
///
/// `slope_per_minute` and `intercept` describe `value = slope·x + intercept`
/// where `x` is minutes elapsed since `base_ts` (the window's first sample).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope_per_minute: f64,
    pub intercept: f64,
    /// Timestamp of the first sample; the fit's x-axis origin.
    pub base_ts: u64,
}

impl LineFit {
    /// Projected value at the given timestamp.
    pub fn value_at(&self, ts: u64) -> f64 {
        let minutes = (ts as f64 - self.base_ts as f64) / 60.0;
        self.slope_per_minute * minutes + self.intercept
    }
}

/// Fit a least-squares line over (elapsed-minutes, value) pairs.
///
/// Returns `None` for fewer than two points or a window whose time span
/// collapses to zero (duplicate timestamps). Insufficient data is expected,
/// not an error.
pub fn fit(window: &[Observation]) -> Option<LineFit> {
    if window.len() < 2 {
        return None;
    }

    let base_ts = window[0].timestamp;
    let n = window.len() as f64;

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;

    for obs in window {
        let x = (obs.timestamp as f64 - base_ts as f64) / 60.0;
        let y = obs.value;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    // A zero denominator means every sample shares one timestamp.
    let denom = n * sum_x2 - sum_x * sum_x;
    if denom.abs() < f64::EPSILON {
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n;

    Some(LineFit {
        slope_per_minute: slope,
        intercept,
        base_ts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(ts: u64, value: f64) -> Observation {
        Observation {
            metric: "error_rate_percent".to_string(),
            value,
            timestamp: ts,
        }
    }

    #[test]
    fn fits_exact_line() {
        // 0.6 per minute starting at 1.0.
        let window: Vec<_> = (0..10).map(|i| obs(i * 60, 1.0 + 0.6 * i as f64)).collect();
        let fit = fit(&window).unwrap();

        assert!((fit.slope_per_minute - 0.6).abs() < 1e-9);
        assert!((fit.intercept - 1.0).abs() < 1e-9);
        assert_eq!(fit.base_ts, 0);
    }

    #[test]
    fn fits_noisy_decreasing_series() {
        let values = [10.0, 9.2, 8.1, 7.3, 6.0];
        let window: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(i, v)| obs(i as u64 * 60, *v))
            .collect();
        let fit = fit(&window).unwrap();
        assert!(fit.slope_per_minute < 0.0);
    }

    #[test]
    fn single_point_is_insufficient() {
        assert!(fit(&[obs(0, 1.0)]).is_none());
    }

    #[test]
    fn empty_window_is_insufficient() {
        assert!(fit(&[]).is_none());
    }

    #[test]
    fn duplicate_timestamps_are_insufficient() {
        assert!(fit(&[obs(100, 1.0), obs(100, 2.0)]).is_none());
    }

    #[test]
    fn value_at_projects_forward() {
        let window: Vec<_> = (0..5).map(|i| obs(i * 60, i as f64)).collect();
        let fit = fit(&window).unwrap();
        // slope 1.0/min from 0.0; ten minutes out the line reads 10.0.
        assert!((fit.value_at(600) - 10.0).abs() < 1e-9);
    }
}
