//! foresight-control — the remediation control loop.
//!
//! Ties the observation store and forecast pipeline to side effects: the
//! dispatcher fires throttled mitigation callbacks when a breach is
//! forecast, and the incident handler records confirmed breaches and adapts
//! thresholds for metrics that keep recurring.
//!
//! # Architecture
//!
//! ```text
//! ControlLoop (one per process, handed to the external scheduler)
//!   ├── record() ──────────→ ObservationStore
//!   ├── evaluate() ────────→ forecast::evaluate_all (read-only)
//!   ├── maybe_preempt() ───→ PreemptDispatcher
//!   │     ├── fresh ThresholdSource read
//!   │     ├── per-metric cooldown table (anchored to last attempt)
//!   │     └── spawned mitigation callbacks (fire-and-continue)
//!   └── handle_breach() ───→ IncidentHandler
//!         ├── capped incident log (most-recent-first retrieval)
//!         ├── recurrence check → threshold × bump_factor
//!         └── GaugeSink + EventEmitter (best-effort)
//! ```
//!
//! Failures local to one metric — a throwing mitigation callback, a gauge
//! sink hiccup — are logged and never abort the pass for other metrics.

pub mod context;
pub mod dispatcher;
pub mod incident;
pub mod prometheus;

pub use context::ControlLoop;
pub use dispatcher::{BoxFuture, MitigationFn, PreemptDispatcher};
pub use incident::{Incident, IncidentHandler, ThresholdState};
pub use prometheus::render_prometheus;
