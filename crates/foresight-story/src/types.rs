//! Story record types.

use serde::{Deserialize, Serialize};

/// The span of time a story narrates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    /// Unix timestamp (seconds) of the window start.
    pub start: u64,
    /// Unix timestamp (seconds) of the window end.
    pub end: u64,
}

/// A narrative attached to an alert.
///
/// `story_id` is generated on first save when absent and stable afterwards;
/// saving again under the same id replaces the stored record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncidentStory {
    /// Unique, stable story identifier. Empty means "assign one on save".
    #[serde(default)]
    pub story_id: String,
    /// Identifier of the alert this story narrates.
    pub alert_uid: String,
    pub time_window: TimeWindow,
    /// Free-form narrative payload.
    pub narrative: serde_json::Value,
}
