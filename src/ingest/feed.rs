/// Stream gauge feed client.
///
/// Handles retrieval and JSON parsing for the per-stream height feeds. Each
/// feed returns a flat JSON array of readings:
///
/// ```text
/// [
///   { "DateTime": "2024-05-01 11:45:00", "ft": 4.12, ... },
///   { "DateTime": "2024-05-01 12:00:00", "ft": null, ... }
/// ]
/// ```
///
/// Only `ft` and `DateTime` are read; any other fields are ignored. See
/// `fixtures.rs` for representative payloads.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use std::time::Duration;

use crate::config::{MonitorConfig, StreamsConfig};
use crate::model::{FetchError, RawReading, StreamId};

const FIELD_VALUE: &str = "ft";
const FIELD_TIMESTAMP: &str = "DateTime";

/// Offset-less timestamp layouts seen in gauge feeds.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

// ---------------------------------------------------------------------------
// Feed source seam
// ---------------------------------------------------------------------------

/// Anything that can produce the raw series for a stream.
///
/// Implementations make no retries; the refresh cycle is the retry policy.
pub trait FeedSource: Send + Sync {
    fn fetch_series(&self, stream: StreamId) -> Result<Vec<RawReading>, FetchError>;
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// Feed client over blocking HTTP, one configured endpoint per stream.
pub struct HttpFeedClient {
    http: reqwest::blocking::Client,
    streams: StreamsConfig,
    feed_offset: FixedOffset,
}

impl HttpFeedClient {
    /// Builds a client whose every request is bounded by the configured
    /// fetch timeout.
    pub fn from_config(config: &MonitorConfig) -> Result<Self, Box<dyn std::error::Error>> {
        Self::new(config.streams.clone(), config.display_offset()?, config.fetch_timeout())
    }

    pub fn new(
        streams: StreamsConfig,
        feed_offset: FixedOffset,
        timeout: Duration,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            streams,
            feed_offset,
        })
    }
}

impl FeedSource for HttpFeedClient {
    fn fetch_series(&self, stream: StreamId) -> Result<Vec<RawReading>, FetchError> {
        let url = &self.streams.get(stream).endpoint_url;
        tracing::debug!(%stream, %url, "fetching feed");

        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(FetchError::Network(format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }

        let body = response.text().map_err(transport_error)?;
        let series = parse_feed_response(&body, &self.feed_offset)?;
        tracing::debug!(%stream, entries = series.len(), "feed decoded");
        Ok(series)
    }
}

fn transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_decode() {
        FetchError::Decode(err.to_string())
    } else {
        FetchError::Network(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a feed body into a fully typed series, one `RawReading` per
/// array element, preserving input order.
///
/// Entries with a null, missing or unusable `ft` or `DateTime` are kept
/// with that field absent; filtering them out is the selector's job.
/// Offset-less timestamps are taken to be in `feed_offset`.
///
/// # Errors
/// - `FetchError::Decode` — body is not JSON, or not a JSON array.
pub fn parse_feed_response(
    body: &str,
    feed_offset: &FixedOffset,
) -> Result<Vec<RawReading>, FetchError> {
    let payload: Value = serde_json::from_str(body)
        .map_err(|e| FetchError::Decode(format!("JSON deserialization failed: {}", e)))?;

    let entries = match payload {
        Value::Array(entries) => entries,
        other => {
            return Err(FetchError::Decode(format!(
                "expected a JSON array of readings, got {}",
                json_kind(&other)
            )));
        }
    };

    Ok(entries
        .iter()
        .map(|entry| match entry {
            Value::Object(fields) => RawReading {
                timestamp: fields
                    .get(FIELD_TIMESTAMP)
                    .and_then(|v| parse_timestamp_value(v, feed_offset)),
                value: fields.get(FIELD_VALUE).and_then(parse_height_value),
            },
            _ => RawReading {
                timestamp: None,
                value: None,
            },
        })
        .collect())
}

/// Height as a finite number. Numeric strings are accepted.
fn parse_height_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn parse_timestamp_value(value: &Value, feed_offset: &FixedOffset) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s, feed_offset),
        // Epoch milliseconds
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

/// Parses an RFC 3339 timestamp, or an offset-less one in `feed_offset`.
pub fn parse_timestamp(raw: &str, feed_offset: &FixedOffset) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|naive| feed_offset.from_local_datetime(&naive).single())
        .map(|dt| dt.with_timezone(&Utc))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
