/// Stream state builder: one refresh cycle, fetch → select → classify.
///
/// ## Cycle
///
/// 1. Both feeds are fetched concurrently on a small thread pool
/// 2. The results are joined on a channel with a deadline of
///    `fetch_timeout_ms` (join barrier; nothing is built until both arrive)
/// 3. If either fetch failed or the deadline passed, the whole cycle is
///    `Failed`; a half-updated pair is never produced
/// 4. Otherwise each series goes through `select_latest` and `classify`
///    and the pair is returned as `Ready`
///
/// Only step 1 blocks. Everything after the join is synchronous and pure,
/// keyed by the caller-supplied `now`, so the same inputs always give the
/// same snapshot pair.
///
/// Publication and last-writer-wins ordering across cycles live in `store`.

pub mod store;

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Instant;
use threadpool::ThreadPool;

use crate::alert::thresholds::{classify, exceeds_alert_height};
use crate::analysis::selector::select_latest;
use crate::config::MonitorConfig;
use crate::ingest::feed::FeedSource;
use crate::model::{
    FetchError, PipelineState, RawReading, SnapshotPair, StreamId, StreamSnapshot,
};

/// Fetch workers. Two per cycle, with room for one overlapping cycle.
const FETCH_WORKERS: usize = 4;

// ---------------------------------------------------------------------------
// Pure snapshot construction
// ---------------------------------------------------------------------------

/// Builds one stream's snapshot from its raw series.
pub fn build_stream_snapshot(
    config: &MonitorConfig,
    stream: StreamId,
    series: &[RawReading],
    now: DateTime<Utc>,
) -> StreamSnapshot {
    match select_latest(series, now) {
        Some(reading) => StreamSnapshot {
            stream,
            height_ft: reading.value,
            flow: reading.value * config.stream(stream).flow_multiplier,
            status: classify(config, stream, reading.value),
            last_reading_time: Some(reading.time),
        },
        None => StreamSnapshot::no_data(stream),
    }
}

/// Builds the snapshot pair once both series are in hand.
pub fn build_pair(
    config: &MonitorConfig,
    waikane: &[RawReading],
    waiahole: &[RawReading],
    now: DateTime<Utc>,
) -> SnapshotPair {
    let waikane = build_stream_snapshot(config, StreamId::Waikane, waikane, now);
    let waiahole = build_stream_snapshot(config, StreamId::Waiahole, waiahole, now);

    let any_danger = [&waikane, &waiahole]
        .iter()
        .any(|snap| exceeds_alert_height(snap, config.stream(snap.stream)));

    SnapshotPair {
        waikane,
        waiahole,
        any_danger,
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Runs fetch cycles against a feed source.
pub struct SnapshotBuilder<F> {
    feed: Arc<F>,
    config: Arc<MonitorConfig>,
    pool: ThreadPool,
}

impl<F: FeedSource + 'static> SnapshotBuilder<F> {
    pub fn new(feed: Arc<F>, config: Arc<MonitorConfig>) -> Self {
        Self {
            feed,
            config,
            pool: ThreadPool::with_name("feed-fetch".into(), FETCH_WORKERS),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Runs one full cycle for both streams as of `now`.
    pub fn build_snapshot_pair(&self, now: DateTime<Utc>) -> PipelineState {
        match self.fetch_both() {
            Ok((waikane, waiahole)) => {
                let pair = build_pair(&self.config, &waikane, &waiahole, now);
                PipelineState::Ready(pair)
            }
            Err(e) => PipelineState::Failed(e),
        }
    }

    /// Fork-join over both feeds, bounded by the configured fetch timeout.
    /// The first failure to arrive is reported.
    fn fetch_both(&self) -> Result<(Vec<RawReading>, Vec<RawReading>), FetchError> {
        let (tx, rx) = mpsc::channel();

        for stream in StreamId::ALL {
            let tx = tx.clone();
            let feed = Arc::clone(&self.feed);
            self.pool.execute(move || {
                let result = feed.fetch_series(stream);
                // Receiver is gone if the cycle already timed out
                let _ = tx.send((stream, result));
            });
        }
        drop(tx);

        let deadline = Instant::now() + self.config.fetch_timeout();
        let mut waikane = None;
        let mut waiahole = None;

        while waikane.is_none() || waiahole.is_none() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let (stream, result) = match rx.recv_timeout(remaining) {
                Ok(message) => message,
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    tracing::warn!(
                        timeout_ms = self.config.monitor.fetch_timeout_ms,
                        "fetch cycle exceeded deadline"
                    );
                    return Err(FetchError::Timeout);
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    return Err(FetchError::Network("fetch worker exited without a result".into()));
                }
            };

            let series = result.inspect_err(|e| {
                tracing::warn!(%stream, error = %e, "feed fetch failed");
            })?;

            match stream {
                StreamId::Waikane => waikane = Some(series),
                StreamId::Waiahole => waiahole = Some(series),
            }
        }

        Ok((waikane.unwrap_or_default(), waiahole.unwrap_or_default()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::feed::parse_feed_response;
    use crate::ingest::fixtures::*;
    use crate::model::RiskStatus;
    use chrono::{Duration, FixedOffset, TimeZone};
    use std::collections::HashMap;

    /// Canned feed responses keyed by stream, with an optional delay.
    struct StaticFeed {
        responses: HashMap<StreamId, Result<Vec<RawReading>, FetchError>>,
        delay: Option<std::time::Duration>,
    }

    impl StaticFeed {
        fn new(
            waikane: Result<Vec<RawReading>, FetchError>,
            waiahole: Result<Vec<RawReading>, FetchError>,
        ) -> Self {
            let mut responses = HashMap::new();
            responses.insert(StreamId::Waikane, waikane);
            responses.insert(StreamId::Waiahole, waiahole);
            Self {
                responses,
                delay: None,
            }
        }
    }

    impl FeedSource for StaticFeed {
        fn fetch_series(&self, stream: StreamId) -> Result<Vec<RawReading>, FetchError> {
            if let Some(delay) = self.delay {
                std::thread::sleep(delay);
            }
            self.responses[&stream].clone()
        }
    }

    fn hst() -> FixedOffset {
        FixedOffset::west_opt(10 * 3600).unwrap()
    }

    fn now() -> DateTime<Utc> {
        // 12:45 HST, after every fixture reading
        Utc.with_ymd_and_hms(2024, 5, 1, 22, 45, 0).unwrap()
    }

    fn builder(feed: StaticFeed) -> SnapshotBuilder<StaticFeed> {
        SnapshotBuilder::new(Arc::new(feed), Arc::new(fixture_monitor_config()))
    }

    fn feed(json: &str) -> Vec<RawReading> {
        parse_feed_response(json, &hst()).expect("fixture should parse")
    }

    #[test]
    fn test_ready_pair_from_both_feeds() {
        let b = builder(StaticFeed::new(
            Ok(feed(fixture_waikane_feed_json())),
            Ok(feed(fixture_waiahole_elevated_json())),
        ));

        let state = b.build_snapshot_pair(now());
        let pair = state.snapshots().expect("both feeds succeeded");

        assert_eq!(pair.waikane.height_ft, 4.31);
        assert!((pair.waikane.flow - 4.31 * 15.0).abs() < 1e-9);
        assert_eq!(pair.waikane.status, RiskStatus::Safe);

        assert_eq!(pair.waiahole.height_ft, 13.05);
        assert!((pair.waiahole.flow - 13.05 * 12.0).abs() < 1e-9);
        assert_eq!(pair.waiahole.status, RiskStatus::Warning);
        assert_eq!(
            pair.waiahole.last_reading_time,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 22, 30, 0).unwrap())
        );

        // Waiahōle above its 12 ft banner height
        assert!(pair.any_danger);
    }

    #[test]
    fn test_scenario_a_danger_reading() {
        let t0 = now() - Duration::minutes(30);
        let t1 = now() - Duration::minutes(15);
        let b = builder(StaticFeed::new(
            Ok(vec![RawReading::new(t0, 5.0), RawReading::new(t1, 11.0)]),
            Ok(Vec::new()),
        ));

        let state = b.build_snapshot_pair(now());
        let pair = state.snapshots().unwrap();
        assert_eq!(pair.waikane.height_ft, 11.0);
        assert_eq!(pair.waikane.status, RiskStatus::Danger);
        assert_eq!(pair.waikane.last_reading_time, Some(t1));
        assert!(pair.any_danger);
    }

    #[test]
    fn test_scenario_b_no_valid_reading_defaults_to_safe() {
        let b = builder(StaticFeed::new(
            Ok(feed(fixture_sensor_outage_json())),
            Ok(vec![RawReading {
                timestamp: Some(now()),
                value: None,
            }]),
        ));

        let state = b.build_snapshot_pair(now());
        let pair = state.snapshots().unwrap();
        for snap in [&pair.waikane, &pair.waiahole] {
            assert_eq!(snap.height_ft, 0.0);
            assert_eq!(snap.flow, 0.0);
            assert_eq!(snap.status, RiskStatus::Safe);
            assert_eq!(snap.last_reading_time, None);
        }
        assert!(!pair.any_danger);
    }

    #[test]
    fn test_scenario_d_one_failed_feed_fails_the_pair() {
        let b = builder(StaticFeed::new(
            Ok(feed(fixture_waikane_feed_json())),
            Err(FetchError::Network("connection refused".into())),
        ));

        assert_eq!(
            b.build_snapshot_pair(now()),
            PipelineState::Failed(FetchError::Network("connection refused".into()))
        );
    }

    #[test]
    fn test_decode_failure_fails_the_pair() {
        let b = builder(StaticFeed::new(
            Err(FetchError::Decode("expected array".into())),
            Ok(feed(fixture_waikane_feed_json())),
        ));
        assert!(matches!(
            b.build_snapshot_pair(now()),
            PipelineState::Failed(FetchError::Decode(_))
        ));
    }

    #[test]
    fn test_slow_feed_times_out() {
        let mut slow = StaticFeed::new(Ok(Vec::new()), Ok(Vec::new()));
        slow.delay = Some(std::time::Duration::from_millis(500));

        let mut config = fixture_monitor_config();
        config.monitor.fetch_timeout_ms = 50;
        let b = SnapshotBuilder::new(Arc::new(slow), Arc::new(config));

        let started = Instant::now();
        assert_eq!(
            b.build_snapshot_pair(now()),
            PipelineState::Failed(FetchError::Timeout)
        );
        assert!(
            started.elapsed() < std::time::Duration::from_millis(450),
            "cycle must resolve at its deadline, not when the feed returns"
        );
    }

    #[test]
    fn test_both_feeds_are_fetched_concurrently() {
        // Each fetch takes more than half the deadline, so only parallel
        // fetches finish in time.
        let mut slow = StaticFeed::new(
            Ok(feed(fixture_waikane_feed_json())),
            Ok(feed(fixture_waiahole_elevated_json())),
        );
        slow.delay = Some(std::time::Duration::from_millis(300));

        let mut config = fixture_monitor_config();
        config.monitor.fetch_timeout_ms = 500;
        let b = SnapshotBuilder::new(Arc::new(slow), Arc::new(config));

        let started = Instant::now();
        let state = b.build_snapshot_pair(now());
        assert!(
            matches!(state, PipelineState::Ready(_)),
            "two 300 ms fetches must fit a 500 ms deadline, got {:?}",
            state
        );
        assert!(
            started.elapsed() < std::time::Duration::from_millis(500),
            "fetches ran one after the other"
        );
    }

    #[test]
    fn test_identical_inputs_give_identical_pairs() {
        let b = builder(StaticFeed::new(
            Ok(feed(fixture_waikane_feed_json())),
            Ok(feed(fixture_waiahole_elevated_json())),
        ));
        let first = b.build_snapshot_pair(now());
        let second = b.build_snapshot_pair(now());
        assert_eq!(first, second);
    }

    #[test]
    fn test_earlier_now_selects_earlier_reading() {
        let b = builder(StaticFeed::new(
            Ok(feed(fixture_waikane_feed_json())),
            Ok(feed(fixture_waiahole_elevated_json())),
        ));
        // 12:20 HST: the 12:30 readings are in the future
        let state = b.build_snapshot_pair(Utc.with_ymd_and_hms(2024, 5, 1, 22, 20, 0).unwrap());
        let pair = state.snapshots().unwrap();
        assert_eq!(pair.waikane.height_ft, 4.20);
        assert_eq!(pair.waiahole.height_ft, 12.61);
    }

    #[test]
    fn test_banner_height_is_separate_from_danger() {
        let config = fixture_monitor_config();
        // 10.5 ft on Waikāne: Warning (danger is 10.8) but above the 10 ft banner height
        let series = vec![RawReading::new(now(), 10.5)];
        let pair = build_pair(&config, &series, &[], now());
        assert_eq!(pair.waikane.status, RiskStatus::Warning);
        assert!(pair.any_danger);
    }
}
