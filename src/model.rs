/// Shared data types for the stream monitoring pipeline.
///
/// Everything that flows between the feed client, the reading selector,
/// the risk classifier and the snapshot builder is defined here so that
/// the stages only agree on types, not on each other's internals.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Stream identity
// ---------------------------------------------------------------------------

/// The two monitored windward O'ahu streams.
///
/// Every per-stream setting (thresholds, flow multiplier, feed URL) is keyed
/// by this enum, so both streams always run through the same code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamId {
    Waikane,
    Waiahole,
}

impl StreamId {
    /// Both streams, in display order.
    pub const ALL: [StreamId; 2] = [StreamId::Waikane, StreamId::Waiahole];

    /// Stable lowercase key used in config tables and JSON output.
    pub fn key(self) -> &'static str {
        match self {
            StreamId::Waikane => "waikane",
            StreamId::Waiahole => "waiahole",
        }
    }
}

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

/// One entry from a feed payload, after validation.
///
/// Either field may be absent when the source entry was null, missing or
/// unparseable. Such entries are never selected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawReading {
    pub timestamp: Option<DateTime<Utc>>,
    pub value: Option<f64>,
}

impl RawReading {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            timestamp: Some(timestamp),
            value: Some(value),
        }
    }
}

/// The most recent valid reading picked from a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectedReading {
    pub time: DateTime<Utc>,
    pub value: f64,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Discrete flood-risk status, in ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskStatus {
    Safe,
    Warning,
    Danger,
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Current best-known state of one stream after selection and classification.
///
/// With no valid reading, height and flow are 0, status is `Safe` and
/// `last_reading_time` is `None`. Callers detect the outage through
/// `has_reading`, never through the status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StreamSnapshot {
    pub stream: StreamId,
    pub height_ft: f64,
    pub flow: f64,
    pub status: RiskStatus,
    pub last_reading_time: Option<DateTime<Utc>>,
}

impl StreamSnapshot {
    /// Snapshot for a stream whose feed yielded no valid reading.
    pub fn no_data(stream: StreamId) -> Self {
        Self {
            stream,
            height_ft: 0.0,
            flow: 0.0,
            status: RiskStatus::Safe,
            last_reading_time: None,
        }
    }

    pub fn has_reading(&self) -> bool {
        self.last_reading_time.is_some()
    }
}

/// Both stream snapshots from one pipeline cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnapshotPair {
    pub waikane: StreamSnapshot,
    pub waiahole: StreamSnapshot,
    /// True when either stream is above its emergency-banner height.
    /// The presentation layer decides what to do with it.
    pub any_danger: bool,
}

impl SnapshotPair {
    pub fn get(&self, stream: StreamId) -> &StreamSnapshot {
        match stream {
            StreamId::Waikane => &self.waikane,
            StreamId::Waiahole => &self.waiahole,
        }
    }

    /// Highest status across both streams.
    pub fn worst_status(&self) -> RiskStatus {
        self.waikane.status.max(self.waiahole.status)
    }
}

/// Published outcome of a pipeline cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineState {
    Loading,
    Ready(SnapshotPair),
    Failed(FetchError),
}

impl PipelineState {
    pub fn snapshots(&self) -> Option<&SnapshotPair> {
        match self {
            PipelineState::Ready(pair) => Some(pair),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to retrieve a stream's series.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport failure or non-success HTTP status.
    #[error("network error: {0}")]
    Network(String),

    /// Payload could not be decoded into a list of readings.
    #[error("decode error: {0}")]
    Decode(String),

    /// The fetch (or the whole cycle) ran past its deadline.
    #[error("timed out waiting for feed")]
    Timeout,
}
