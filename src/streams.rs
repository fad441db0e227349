/// Stream registry for the windward O'ahu stream monitor.
///
/// Static descriptive metadata for each monitored stream. Operational
/// settings (thresholds, flow multipliers, feed URLs) live in streams.toml;
/// this registry only carries what the signage shows alongside the live
/// readings and does not change between deployments.

use crate::model::StreamId;
use serde::Serialize;

/// Descriptive metadata for a single stream.
#[derive(Debug, Serialize)]
pub struct StreamInfo {
    pub id: StreamId,
    /// Display name, with Hawaiian diacritics.
    pub name: &'static str,
    pub location: &'static str,
    pub length_miles: f64,
    pub drainage_area_sq_miles: f64,
    /// Published flood stage, for reference only. Classification uses
    /// the configured thresholds.
    pub flood_stage_ft: f64,
    /// Typical (low, high) gauge height outside storm events.
    pub normal_range_ft: (f64, f64),
}

pub static STREAM_REGISTRY: &[StreamInfo] = &[
    StreamInfo {
        id: StreamId::Waikane,
        name: "Waikāne Stream",
        location: "Waikāne Valley, Ko'olau Range",
        length_miles: 8.0,
        drainage_area_sq_miles: 14.2,
        flood_stage_ft: 10.0,
        normal_range_ft: (2.0, 6.0),
    },
    StreamInfo {
        id: StreamId::Waiahole,
        name: "Waiahōle Stream",
        location: "Waiahōle Valley, Ko'olau Range",
        length_miles: 6.0,
        drainage_area_sq_miles: 10.8,
        flood_stage_ft: 8.0,
        normal_range_ft: (1.5, 5.0),
    },
];

/// Looks up registry metadata for a stream.
pub fn stream_info(id: StreamId) -> &'static StreamInfo {
    match id {
        StreamId::Waikane => &STREAM_REGISTRY[0],
        StreamId::Waiahole => &STREAM_REGISTRY[1],
    }
}
