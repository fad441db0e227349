/// HTTP endpoint for the published stream state
///
/// Provides a read-only JSON view of the latest pipeline state for the
/// signage front end and other consumers. Nothing here triggers a fetch;
/// it only reads what the refresh loop last published.
///
/// Endpoints:
/// - GET /streams - Current pipeline state with both stream snapshots
/// - GET /streams/info - Descriptive metadata for the monitored streams
/// - GET /health - Service health check

use crate::alert::staleness::is_stale;
use crate::config::MonitorConfig;
use crate::display::{
    format_height, format_local_time, status_icon, status_text, stream_notice, MSG_FETCH_FAILED,
    MSG_LOADING,
};
use crate::model::{PipelineState, RiskStatus, StreamId};
use crate::monitor::store::SnapshotStore;
use crate::streams::{stream_info, StreamInfo, STREAM_REGISTRY};
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

/// Pipeline state as served to the UI.
#[derive(Debug, Serialize)]
pub struct StreamsResponse {
    /// "loading", "ready" or "failed"
    pub state: &'static str,
    pub message: Option<&'static str>,
    pub error: Option<String>,
    pub any_danger: bool,
    /// Highest status across both streams; absent until a cycle is ready.
    pub worst_status: Option<RiskStatus>,
    pub streams: Vec<StreamView>,
}

/// One stream's snapshot plus display strings.
#[derive(Debug, Serialize)]
pub struct StreamView {
    pub id: StreamId,
    pub name: &'static str,
    pub height_ft: f64,
    pub height_display: String,
    pub flow: f64,
    pub status: RiskStatus,
    pub status_icon: &'static str,
    pub status_text: &'static str,
    pub last_reading_time: Option<DateTime<Utc>>,
    pub last_reading_display: String,
    pub has_reading: bool,
    pub stale: bool,
    pub notice: Option<&'static str>,
    pub info: &'static StreamInfo,
}

/// Renders the published state for the UI as of `now`.
pub fn build_streams_response(
    state: &PipelineState,
    config: &MonitorConfig,
    timezone: &FixedOffset,
    now: DateTime<Utc>,
) -> StreamsResponse {
    match state {
        PipelineState::Loading => StreamsResponse {
            state: "loading",
            message: Some(MSG_LOADING),
            error: None,
            any_danger: false,
            worst_status: None,
            streams: Vec::new(),
        },
        PipelineState::Failed(e) => StreamsResponse {
            state: "failed",
            message: Some(MSG_FETCH_FAILED),
            error: Some(e.to_string()),
            any_danger: false,
            worst_status: None,
            streams: Vec::new(),
        },
        PipelineState::Ready(pair) => StreamsResponse {
            state: "ready",
            message: None,
            error: None,
            any_danger: pair.any_danger,
            worst_status: Some(pair.worst_status()),
            streams: StreamId::ALL
                .iter()
                .map(|&id| {
                    let snap = pair.get(id);
                    let info = stream_info(id);
                    StreamView {
                        id,
                        name: info.name,
                        height_ft: snap.height_ft,
                        height_display: format_height(snap.height_ft),
                        flow: snap.flow,
                        status: snap.status,
                        status_icon: status_icon(snap.status),
                        status_text: status_text(snap.status),
                        last_reading_time: snap.last_reading_time,
                        last_reading_display: format_local_time(snap.last_reading_time, timezone),
                        has_reading: snap.has_reading(),
                        stale: is_stale(snap, now, config.monitor.stale_after_minutes),
                        notice: stream_notice(state, Some(snap)),
                        info,
                    }
                })
                .collect(),
        },
    }
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start HTTP endpoint server on the specified port
pub fn start_endpoint_server(
    port: u16,
    store: Arc<SnapshotStore>,
    config: Arc<MonitorConfig>,
) -> Result<(), String> {
    let timezone = config
        .display_offset()
        .map_err(|e| format!("Invalid display timezone: {}", e))?;
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    tracing::info!(
        port,
        "HTTP endpoint listening (GET /streams, GET /streams/info, GET /health)"
    );

    for request in server.incoming_requests() {
        let response = route(request.url(), &store, &config, &timezone);
        if let Err(e) = request.respond(response) {
            tracing::warn!(error = %e, "failed to send response");
        }
    }

    Ok(())
}

fn route(
    url: &str,
    store: &SnapshotStore,
    config: &MonitorConfig,
    timezone: &FixedOffset,
) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    match url.split('?').next().unwrap_or(url) {
        "/health" => handle_health(),
        "/streams" => {
            let state = store.current();
            let body = build_streams_response(&state, config, timezone, Utc::now());
            match serde_json::to_value(&body) {
                Ok(json) => create_response(200, json),
                Err(e) => create_response(500, serde_json::json!({ "error": e.to_string() })),
            }
        }
        "/streams/info" => handle_stream_info(),
        _ => create_response(
            404,
            serde_json::json!({
                "error": "Not found",
                "available_endpoints": ["/health", "/streams", "/streams/info"]
            }),
        ),
    }
}

/// Handle /streams/info endpoint
fn handle_stream_info() -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    match serde_json::to_value(STREAM_REGISTRY) {
        Ok(json) => create_response(200, json),
        Err(e) => create_response(500, serde_json::json!({ "error": e.to_string() })),
    }
}

/// Handle /health endpoint
fn handle_health() -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    create_response(
        200,
        serde_json::json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        }),
    )
}

/// Create HTTP response with JSON body
fn create_response(status_code: u16, json: serde_json::Value) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string());

    let response = tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(status_code));
    match tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
