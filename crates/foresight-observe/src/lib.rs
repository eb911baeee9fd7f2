//! foresight-observe — bounded per-metric sample windows.
//!
//! The observation store owns a sliding window of timestamped samples per
//! metric, bounded by both a maximum count and a maximum age. Producers call
//! `record` from any thread while an evaluation pass reads windows
//! concurrently; a `RwLock` over the metric map keeps both sides safe.
//!
//! # Architecture
//!
//! ```text
//! ObservationStore
//!   ├── record() ← called per metric sample, never fails
//!   ├── window() → oldest-first snapshot for one metric
//!   └── metrics() → metric names with retained samples
//! ```

pub mod window;

pub use window::ObservationStore;
