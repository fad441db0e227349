/// Latest-valid-reading selection.
///
/// Feeds return whole windows of readings, in no guaranteed order, and
/// during outages or clock skew some entries are null or stamped in the
/// future. `select_latest` reduces a series to the one reading the
/// signage should show.

use chrono::{DateTime, Utc};

use crate::model::{RawReading, SelectedReading};

/// Returns the most recent reading with both a value and a timestamp, and
/// a timestamp no later than `now`.
///
/// Returns `None` when no entry qualifies; that is the normal outcome on
/// startup or during a sensor outage, not an error.
///
/// When several qualifying entries share the latest timestamp, the first one
/// in input order is returned. Callers should treat that priority as
/// undefined rather than rely on it.
pub fn select_latest(series: &[RawReading], now: DateTime<Utc>) -> Option<SelectedReading> {
    let mut latest: Option<SelectedReading> = None;

    for reading in series {
        let (Some(time), Some(value)) = (reading.timestamp, reading.value) else {
            continue;
        };
        if time > now {
            continue;
        }
        // Strictly greater keeps the earliest-encountered entry on ties
        if latest.is_none_or(|best| time > best.time) {
            latest = Some(SelectedReading { time, value });
        }
    }

    latest
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
