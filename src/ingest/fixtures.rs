/// Test fixtures: representative JSON payloads from the stream gauge feeds.
///
/// Feed response shape:
///   [
///     { "DateTime": "YYYY-MM-DD HH:MM:SS", "ft": <number|null>, ... }
///   ]
///
/// Timestamps are usually offset-less local Hawaii time; some deployments
/// emit RFC 3339. Heights are feet as JSON numbers, with `null` during
/// sensor outages.

use crate::config::MonitorConfig;

/// Waikāne stream, three consecutive 15-minute readings, normal levels.
/// Extra fields mirror what the feed sends and must be ignored.
pub(crate) fn fixture_waikane_feed_json() -> &'static str {
    r#"[
      { "DateTime": "2024-05-01 12:00:00", "ft": 4.12, "site": "16294900", "qualifier": "P" },
      { "DateTime": "2024-05-01 12:15:00", "ft": 4.20, "site": "16294900", "qualifier": "P" },
      { "DateTime": "2024-05-01 12:30:00", "ft": 4.31, "site": "16294900", "qualifier": "P" }
    ]"#
}

/// Waiahōle stream, newest reading first, elevated above warning (12.0 ft).
pub(crate) fn fixture_waiahole_elevated_json() -> &'static str {
    r#"[
      { "DateTime": "2024-05-01 12:30:00", "ft": 13.05 },
      { "DateTime": "2024-05-01 12:15:00", "ft": 12.61 },
      { "DateTime": "2024-05-01 12:00:00", "ft": 11.90 }
    ]"#
}

/// Same instants expressed as RFC 3339 with and without an offset.
pub(crate) fn fixture_rfc3339_feed_json() -> &'static str {
    r#"[
      { "DateTime": "2024-05-01T12:00:00-10:00", "ft": 4.12 },
      { "DateTime": "2024-05-01T22:15:00Z", "ft": 4.20 }
    ]"#
}

/// One entry per way a feed entry can be unusable, in this order:
/// null ft, missing ft, null DateTime, garbage DateTime, non-numeric ft,
/// non-object entry.
pub(crate) fn fixture_malformed_entries_json() -> &'static str {
    r#"[
      { "DateTime": "2024-05-01 12:00:00", "ft": null },
      { "DateTime": "2024-05-01 12:15:00" },
      { "DateTime": null, "ft": 5.0 },
      { "DateTime": "not a date", "ft": 5.0 },
      { "DateTime": "2024-05-01 12:30:00", "ft": "high" },
      42
    ]"#
}

/// Sensor outage: every entry has a null height.
pub(crate) fn fixture_sensor_outage_json() -> &'static str {
    r#"[
      { "DateTime": "2024-05-01 12:00:00", "ft": null },
      { "DateTime": "2024-05-01 12:15:00", "ft": null }
    ]"#
}

/// Reference deployment configuration with placeholder feed URLs.
pub(crate) fn fixture_monitor_config() -> MonitorConfig {
    MonitorConfig::from_toml_str(
        r#"
        [monitor]
        fetch_timeout_ms = 2000
        refresh_interval_ms = 900000
        stale_after_minutes = 60

        [monitor.timezone]
        name = "Pacific/Honolulu"
        utc_offset_minutes = -600

        [streams.waikane]
        endpoint_url = "http://127.0.0.1:9/api/waikane_stream"
        warning_threshold_ft = 7.0
        danger_threshold_ft = 10.8
        alert_height_ft = 10.0
        flow_multiplier = 15.0

        [streams.waiahole]
        endpoint_url = "http://127.0.0.1:9/api/waiahole_stream"
        warning_threshold_ft = 12.0
        danger_threshold_ft = 16.4
        alert_height_ft = 12.0
        flow_multiplier = 12.0
        "#,
    )
    .expect("fixture config must be valid")
}
