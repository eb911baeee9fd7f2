//! foresight.toml configuration parser.
//!
//! Every tunable has a default so a host can run `ForesightConfig::default()`
//! without a config file. The story backend can also be selected through the
//! environment (`FORESIGHT_STORY_DIR` / `FORESIGHT_STORY_DB`), which takes
//! precedence over the TOML section.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable naming a directory for the file-backed story store.
pub const STORY_DIR_ENV: &str = "FORESIGHT_STORY_DIR";
/// Environment variable naming a redb database path for the story store.
pub const STORY_DB_ENV: &str = "FORESIGHT_STORY_DB";

/// Top-level Foresight configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForesightConfig {
    #[serde(default)]
    pub observation: ObservationConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub preempt: PreemptConfig,
    #[serde(default)]
    pub incident: IncidentConfig,
    #[serde(default)]
    pub story: StoryConfig,
}

/// Sliding-window bounds for the observation store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationConfig {
    /// Maximum samples retained per metric.
    pub max_samples: usize,
    /// Maximum sample age in seconds, relative to the newest sample.
    pub retention_secs: u64,
}

impl Default for ObservationConfig {
    fn default() -> Self {
        Self {
            max_samples: 120,
            retention_secs: 3600,
        }
    }
}

/// Forecast horizon for the prediction evaluator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Forward window within which a predicted crossing is actionable.
    pub horizon_secs: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self { horizon_secs: 900 }
    }
}

/// Throttling for preemptive mitigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreemptConfig {
    /// Minimum interval between mitigation attempts for one metric,
    /// anchored to the last attempt.
    pub cooldown_secs: u64,
}

impl Default for PreemptConfig {
    fn default() -> Self {
        Self { cooldown_secs: 300 }
    }
}

/// Incident log and adaptive-threshold tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentConfig {
    /// Span within which a repeat breach of the same metric counts as
    /// recurring.
    pub recurrence_window_secs: u64,
    /// Multiplier applied to the threshold on a recurring breach.
    pub bump_factor: f64,
    /// Maximum incidents retained in the in-memory log.
    pub max_incidents: usize,
}

impl Default for IncidentConfig {
    fn default() -> Self {
        Self {
            recurrence_window_secs: 900,
            bump_factor: 1.2,
            max_incidents: 200,
        }
    }
}

/// Story-store backend selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryConfig {
    /// Directory for the file-backed JSON store.
    pub dir: Option<PathBuf>,
    /// Path for the redb-backed store.
    pub db_path: Option<PathBuf>,
}

/// Resolved story backend after applying env overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryBackend {
    /// Whole-file JSON store under a directory.
    File(PathBuf),
    /// Embedded redb database.
    Database(PathBuf),
}

impl StoryConfig {
    /// Resolve the backend: environment first, then the TOML section.
    ///
    /// Returns `None` when neither names a location; hosts that never
    /// persist stories simply skip constructing a store.
    pub fn backend(&self) -> Option<StoryBackend> {
        if let Ok(dir) = std::env::var(STORY_DIR_ENV)
            && !dir.is_empty()
        {
            return Some(StoryBackend::File(PathBuf::from(dir)));
        }
        if let Ok(path) = std::env::var(STORY_DB_ENV)
            && !path.is_empty()
        {
            return Some(StoryBackend::Database(PathBuf::from(path)));
        }
        if let Some(dir) = &self.dir {
            return Some(StoryBackend::File(dir.clone()));
        }
        self.db_path.clone().map(StoryBackend::Database)
    }
}

impl ForesightConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ForesightConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = ForesightConfig::default();
        assert_eq!(config.observation.max_samples, 120);
        assert_eq!(config.forecast.horizon_secs, 900);
        assert_eq!(config.preempt.cooldown_secs, 300);
        assert!(config.incident.bump_factor > 1.0);
        assert!(config.story.dir.is_none());
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[observation]
max_samples = 60
retention_secs = 1800

[incident]
recurrence_window_secs = 600
bump_factor = 1.5
max_incidents = 50
"#;
        let config: ForesightConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.observation.max_samples, 60);
        assert_eq!(config.incident.bump_factor, 1.5);
        // Untouched sections fall back to defaults.
        assert_eq!(config.forecast.horizon_secs, 900);
    }

    #[test]
    fn story_backend_prefers_toml_dir_over_db() {
        let config = StoryConfig {
            dir: Some(PathBuf::from("/tmp/stories")),
            db_path: Some(PathBuf::from("/tmp/stories.redb")),
        };
        assert_eq!(
            config.backend(),
            Some(StoryBackend::File(PathBuf::from("/tmp/stories")))
        );
    }

    #[test]
    fn story_backend_none_when_unconfigured() {
        let config = StoryConfig::default();
        // Only valid when the env vars are unset; tests that set them
        // must use a scoped guard.
        if std::env::var(STORY_DIR_ENV).is_err() && std::env::var(STORY_DB_ENV).is_err() {
            assert!(config.backend().is_none());
        }
    }

    #[test]
    fn round_trips_through_toml() {
        let config = ForesightConfig::default();
        let rendered = config.to_toml_string().unwrap();
        let parsed: ForesightConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.observation.max_samples, config.observation.max_samples);
    }
}
