//! Per-request span, trace id and body logging.

use std::time::Instant;

use axum::body::{Body, Bytes};
use axum::extract::Request;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::middleware::Next;
use axum::response::Response;
use http_body_util::BodyExt;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

pub const TRACE_HEADER: &str = "x-trace-id";

/// JSON bodies up to this size are logged at debug level.
const BODY_LOG_LIMIT: usize = 1024;

fn incoming_trace_id(headers: &HeaderMap) -> Option<Uuid> {
    let raw = headers.get(TRACE_HEADER)?.to_str().ok()?;
    Uuid::parse_str(raw).ok()
}

pub async fn trace_middleware(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let trace_id = incoming_trace_id(req.headers()).unwrap_or_else(Uuid::new_v4);

    let span = info_span!(
        "http_request",
        %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        let (parts, body) = req.into_parts();
        let body = log_json_body("request", &parts.headers, body).await;
        let response = next.run(Request::from_parts(parts, body)).await;

        let (mut parts, body) = response.into_parts();
        let body = log_json_body("response", &parts.headers, body).await;
        if let Ok(value) = HeaderValue::from_str(&trace_id.to_string()) {
            parts.headers.insert(TRACE_HEADER, value);
        }

        let status = parts.status.as_u16();
        let latency_ms = started.elapsed().as_millis();
        if parts.status.is_server_error() {
            warn!(status, latency_ms, "request failed");
        } else {
            info!(status, latency_ms, "request handled");
        }
        Response::from_parts(parts, body)
    }
    .instrument(span)
    .await
}

/// Buffer `body` so small JSON payloads can be logged, then hand it back.
/// Chat messages and Drive listings flow through here, so payloads are only
/// visible with debug logging on.
async fn log_json_body(direction: &'static str, headers: &HeaderMap, body: Body) -> Body {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));
    if !is_json {
        return body;
    }

    let bytes: Bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(direction, error = %e, "failed to read body");
            Bytes::new()
        }
    };
    if bytes.len() <= BODY_LOG_LIMIT {
        debug!(direction, body = %String::from_utf8_lossy(&bytes), "json body");
    } else {
        debug!(direction, size = bytes.len(), "json body too large to log");
    }
    Body::from(bytes)
}
