/// Reading freshness checks.
///
/// A stream can report a valid reading that is hours old when the gauge
/// stops transmitting but the feed keeps serving its history. These helpers
/// let the presentation layer flag that next to the reading.

use chrono::{DateTime, Duration, Utc};

use crate::model::StreamSnapshot;

/// Age of the snapshot's reading at `now`, or `None` without a reading.
pub fn reading_age(snapshot: &StreamSnapshot, now: DateTime<Utc>) -> Option<Duration> {
    snapshot.last_reading_time.map(|t| now - t)
}

/// True when the reading is older than `max_age_minutes`, or missing.
pub fn is_stale(snapshot: &StreamSnapshot, now: DateTime<Utc>, max_age_minutes: i64) -> bool {
    match reading_age(snapshot, now) {
        Some(age) => age.num_minutes() > max_age_minutes,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RiskStatus, StreamId};
    use chrono::TimeZone;

    fn snapshot_at(time: DateTime<Utc>) -> StreamSnapshot {
        StreamSnapshot {
            stream: StreamId::Waiahole,
            height_ft: 3.2,
            flow: 38.4,
            status: RiskStatus::Safe,
            last_reading_time: Some(time),
        }
    }

    #[test]
    fn test_fresh_reading_is_not_stale() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 22, 30, 0).unwrap();
        let snap = snapshot_at(now - Duration::minutes(15));
        assert_eq!(reading_age(&snap, now), Some(Duration::minutes(15)));
        assert!(!is_stale(&snap, now, 60));
    }

    #[test]
    fn test_old_reading_is_stale() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 22, 30, 0).unwrap();
        let snap = snapshot_at(now - Duration::minutes(61));
        assert!(is_stale(&snap, now, 60));
    }

    #[test]
    fn test_missing_reading_is_stale() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 22, 30, 0).unwrap();
        let snap = StreamSnapshot::no_data(StreamId::Waikane);
        assert_eq!(reading_age(&snap, now), None);
        assert!(is_stale(&snap, now, 60));
    }
}
