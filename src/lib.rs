/// streamwatch_service: Waikāne / Waiahōle stream flood risk monitor.
///
/// # Module structure
///
/// ```text
/// streamwatch_service
/// ├── model       — shared data types (RawReading, StreamSnapshot, PipelineState, FetchError, …)
/// ├── config      — thresholds, multipliers, feed URLs and timing (streams.toml)
/// ├── streams     — descriptive registry for the two monitored streams
/// ├── ingest
/// │   ├── feed    — per-stream HTTP feed client + validated JSON parsing
/// │   └── fixtures (test only) — representative feed payloads
/// ├── analysis
/// │   └── selector — latest valid reading as of "now"
/// ├── alert
/// │   ├── thresholds — warning/danger classification, banner trigger
/// │   └── staleness  — reading freshness checking
/// ├── monitor     — snapshot builder (fork-join fetch cycle)
/// │   └── store   — published state, last writer wins
/// ├── daemon      — refresh loop
/// ├── display     — time/height/status formatting for the UI
/// ├── endpoint    — read-only JSON API over the published state
/// └── logging     — tracing subscriber setup
/// ```

/// Public modules
pub mod alert;
pub mod analysis;
pub mod config;
pub mod daemon;
pub mod display;
pub mod endpoint;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod monitor;
pub mod streams;
