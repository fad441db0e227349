/// Risk evaluation for stream snapshots.
///
/// - `thresholds` — warning/danger classification and the banner trigger.
/// - `staleness` — reading freshness checks.

pub mod staleness;
pub mod thresholds;
