/// Monitor configuration loader - parses streams.toml
///
/// Separates per-stream thresholds, flow multipliers and feed endpoints from
/// code, making it easy to retune signage thresholds or point at a new feed
/// without recompiling the service.

use chrono::FixedOffset;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::model::StreamId;

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "streams.toml";

/// Environment variable overriding `DEFAULT_CONFIG_PATH`.
pub const CONFIG_PATH_ENV: &str = "STREAM_MONITOR_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Configuration structures
// ---------------------------------------------------------------------------

/// Root configuration, one `[monitor]` table plus one table per stream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonitorConfig {
    pub monitor: CycleConfig,
    pub streams: StreamsConfig,
}

/// Global refresh-cycle settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CycleConfig {
    /// Deadline for one fetch cycle (both feeds), and the HTTP timeout.
    pub fetch_timeout_ms: u64,
    /// How often the daemon starts a new cycle.
    pub refresh_interval_ms: u64,
    /// Age beyond which a selected reading is flagged stale.
    #[serde(default = "default_stale_after_minutes")]
    pub stale_after_minutes: i64,
    /// Port for the read-only JSON endpoint. No endpoint when absent.
    #[serde(default)]
    pub endpoint_port: Option<u16>,
    /// Default tracing filter when RUST_LOG is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    pub timezone: TimezoneConfig,
}

/// Fixed display timezone. Also used to interpret offset-less feed timestamps.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimezoneConfig {
    pub name: String,
    pub utc_offset_minutes: i32,
}

/// Per-stream tables, keyed the same way as `StreamId`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreamsConfig {
    pub waikane: StreamConfig,
    pub waiahole: StreamConfig,
}

/// Thresholds, flow conversion and feed location for one stream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreamConfig {
    pub endpoint_url: String,
    pub warning_threshold_ft: f64,
    pub danger_threshold_ft: f64,
    /// Height above which the emergency banner should show.
    pub alert_height_ft: f64,
    /// Flow estimate = height_ft × flow_multiplier.
    pub flow_multiplier: f64,
}

fn default_stale_after_minutes() -> i64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

impl StreamsConfig {
    pub fn get(&self, stream: StreamId) -> &StreamConfig {
        match stream {
            StreamId::Waikane => &self.waikane,
            StreamId::Waiahole => &self.waiahole,
        }
    }
}

impl MonitorConfig {
    pub fn stream(&self, stream: StreamId) -> &StreamConfig {
        self.streams.get(stream)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: MonitorConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Display timezone as a chrono offset.
    pub fn display_offset(&self) -> Result<FixedOffset, ConfigError> {
        self.monitor.timezone.offset()
    }

    pub fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.monitor.fetch_timeout_ms)
    }

    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.monitor.refresh_interval_ms)
    }

    /// Rejects configurations the classifier or the scheduler cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monitor.fetch_timeout_ms == 0 {
            return Err(ConfigError::Invalid("fetch_timeout_ms must be > 0".into()));
        }
        if self.monitor.refresh_interval_ms == 0 {
            return Err(ConfigError::Invalid("refresh_interval_ms must be > 0".into()));
        }
        if self.monitor.stale_after_minutes <= 0 {
            return Err(ConfigError::Invalid("stale_after_minutes must be > 0".into()));
        }
        self.monitor.timezone.offset()?;

        for id in StreamId::ALL {
            let s = self.stream(id);
            let finite = [
                s.warning_threshold_ft,
                s.danger_threshold_ft,
                s.alert_height_ft,
                s.flow_multiplier,
            ]
            .iter()
            .all(|v| v.is_finite());
            if !finite {
                return Err(ConfigError::Invalid(format!(
                    "{}: thresholds and multiplier must be finite numbers",
                    id
                )));
            }
            if s.warning_threshold_ft >= s.danger_threshold_ft {
                return Err(ConfigError::Invalid(format!(
                    "{}: warning_threshold_ft ({}) must be below danger_threshold_ft ({})",
                    id, s.warning_threshold_ft, s.danger_threshold_ft
                )));
            }
            if s.flow_multiplier < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{}: flow_multiplier must not be negative",
                    id
                )));
            }
            if s.endpoint_url.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{}: endpoint_url is empty", id)));
            }
        }
        Ok(())
    }
}

/// Zones without daylight saving, with their UTC offset in minutes.
/// Only these can be represented by a single fixed offset.
const FIXED_OFFSET_ZONES: &[(&str, i32)] = &[
    ("Pacific/Honolulu", -600),
    ("HST", -600),
    ("Pacific/Pago_Pago", -660),
    ("Pacific/Guam", 600),
    ("UTC", 0),
    ("Etc/UTC", 0),
];

impl TimezoneConfig {
    /// Checks the name against the known fixed-offset zones and returns
    /// the offset. A name whose offset disagrees is rejected.
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        let Some(&(_, expected)) = FIXED_OFFSET_ZONES
            .iter()
            .find(|(name, _)| *name == self.name)
        else {
            return Err(ConfigError::Invalid(format!(
                "timezone {}: not a known fixed-offset zone",
                self.name
            )));
        };
        if expected != self.utc_offset_minutes {
            return Err(ConfigError::Invalid(format!(
                "timezone {}: utc_offset_minutes is {}, expected {}",
                self.name, self.utc_offset_minutes, expected
            )));
        }
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "timezone {}: utc_offset_minutes {} out of range",
                self.name, self.utc_offset_minutes
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Loads configuration from an explicit path.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<MonitorConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    MonitorConfig::from_toml_str(&contents)
}

/// Loads configuration from `$STREAM_MONITOR_CONFIG`, falling back to
/// `streams.toml` in the current working directory.
pub fn load_config() -> Result<MonitorConfig, ConfigError> {
    let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_config_from(path)
}
