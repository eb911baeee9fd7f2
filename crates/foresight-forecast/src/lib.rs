//! foresight-forecast — linear trend fitting and breach prediction.
//!
//! Splits the numerical work in two: the estimator fits an ordinary
//! least-squares line over a metric window and knows nothing about
//! thresholds; the evaluator turns a fit plus the current threshold into a
//! crossing forecast. Keeping the fit polarity-agnostic lets the same
//! estimator serve rising-bad and falling-bad metrics.
//!
//! # Prediction Algorithm
//!
//! ```text
//! x = minutes since first sample, y = value
//! slope, intercept = least-squares fit over (x, y)
//!
//! if slope ≈ 0 or slope < 0:        no crossing
//! if projected value ≥ threshold:   no crossing (already there; reactive path)
//! cross = time at which slope·x + intercept = threshold
//! if cross ∈ [now, now + horizon]:  predicted_cross_ts = cross
//! ```

pub mod estimator;
pub mod evaluator;

pub use estimator::{LineFit, fit};
pub use evaluator::{evaluate, evaluate_all};
