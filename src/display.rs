/// Formatting helpers for the signage / dashboard consumer.
///
/// The pipeline hands out typed snapshots; these helpers turn them into the
/// strings the UI shows, so every consumer renders times and statuses the
/// same way.

use chrono::{DateTime, FixedOffset, Utc};

use crate::model::{PipelineState, RiskStatus, StreamSnapshot};

/// Shown in place of a time or value when there is no reading.
pub const NO_VALUE: &str = "--";

pub const MSG_LOADING: &str = "Loading...";
pub const MSG_FETCH_FAILED: &str = "Failed to retrieve data";
pub const MSG_NO_RECENT_READING: &str = "No recent valid reading";

/// Short local time for a reading, e.g. `"2:05 PM"`, or `"--"` when absent.
pub fn format_local_time(time: Option<DateTime<Utc>>, timezone: &FixedOffset) -> String {
    match time {
        Some(t) => t.with_timezone(timezone).format("%-I:%M %p").to_string(),
        None => NO_VALUE.to_string(),
    }
}

/// Gauge height with two decimals, e.g. `"4.31 ft"`.
pub fn format_height(height_ft: f64) -> String {
    format!("{:.2} ft", height_ft)
}

pub fn status_icon(status: RiskStatus) -> &'static str {
    match status {
        RiskStatus::Danger => "🚨",
        RiskStatus::Warning => "⚠️",
        RiskStatus::Safe => "✅",
    }
}

pub fn status_text(status: RiskStatus) -> &'static str {
    match status {
        RiskStatus::Danger => "HIGH WATER - AVOID AREA",
        RiskStatus::Warning => "Elevated levels - Use caution",
        RiskStatus::Safe => "Normal levels",
    }
}

/// The one message to show for a stream given the pipeline state, or `None`
/// when the stream has a reading to display.
///
/// Loading, fetch failure and "no valid reading" never share a message.
pub fn stream_notice(state: &PipelineState, snapshot: Option<&StreamSnapshot>) -> Option<&'static str> {
    match state {
        PipelineState::Loading => Some(MSG_LOADING),
        PipelineState::Failed(_) => Some(MSG_FETCH_FAILED),
        PipelineState::Ready(_) => match snapshot {
            Some(s) if s.has_reading() => None,
            _ => Some(MSG_NO_RECENT_READING),
        },
    }
}
