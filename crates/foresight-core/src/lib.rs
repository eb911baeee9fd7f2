//! foresight-core — shared types, configuration, and ports for Foresight.
//!
//! Foresight is a predictive observability control loop: it watches streamed
//! operational metrics, forecasts threshold breaches before they happen, and
//! adapts alert thresholds when breaches keep recurring.
//!
//! This crate holds the pieces every other Foresight crate needs:
//!
//! - domain types (`Observation`, `Trend`, `EventSeverity`, `ResponseAction`)
//! - `ForesightConfig` — TOML-parsed tunables with defaults
//! - ports — the narrow traits a host process implements to wire the loop
//!   into its own threshold source, metrics sink, and audit log

pub mod config;
pub mod ports;
pub mod types;

pub use config::{
    ForesightConfig, ForecastConfig, IncidentConfig, ObservationConfig, PreemptConfig,
    StoryBackend, StoryConfig,
};
pub use ports::{EventEmitter, GaugeSink, LogEmitter, NullGauge, StaticThresholds, ThresholdSource};
pub use types::{EventSeverity, Observation, ResponseAction, Trend};
