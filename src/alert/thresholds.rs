//! Stream height risk classification.
//!
//! **Simple static thresholds** - each stream has a warning and a danger
//! height from streams.toml. The classifier is pure and total; a height is
//! always a plain number by the time it gets here.
//!
//! Both comparisons are strict: a height exactly at a threshold classifies
//! as the lower status.

use crate::config::{MonitorConfig, StreamConfig};
use crate::model::{RiskStatus, StreamId, StreamSnapshot};

/// Ordered pair of classification thresholds, `warning_ft < danger_ft`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    pub warning_ft: f64,
    pub danger_ft: f64,
}

impl From<&StreamConfig> for RiskThresholds {
    fn from(config: &StreamConfig) -> Self {
        RiskThresholds {
            warning_ft: config.warning_threshold_ft,
            danger_ft: config.danger_threshold_ft,
        }
    }
}

/// Classifies a height against one stream's thresholds.
pub fn classify_height(height_ft: f64, thresholds: &RiskThresholds) -> RiskStatus {
    if height_ft > thresholds.danger_ft {
        RiskStatus::Danger
    } else if height_ft > thresholds.warning_ft {
        RiskStatus::Warning
    } else {
        RiskStatus::Safe
    }
}

/// Classifies a height using the configured thresholds for `stream`.
pub fn classify(config: &MonitorConfig, stream: StreamId, height_ft: f64) -> RiskStatus {
    classify_height(height_ft, &config.stream(stream).into())
}

/// True when the snapshot has a reading above the stream's emergency-banner
/// height. A stream without data never raises the banner.
pub fn exceeds_alert_height(snapshot: &StreamSnapshot, config: &StreamConfig) -> bool {
    snapshot.has_reading() && snapshot.height_ft > config.alert_height_ft
}
