//! axum middleware that records every served request as a [`LogEntry`].
//!
//! ```ignore
//! let state = CaptureState::new(exporter.clone(), CaptureOptions::default());
//! let app = Router::new()
//!     .route("/orders", post(create_order))
//!     .layer(axum::middleware::from_fn_with_state(state, capture_api_log));
//! ```

use crate::domain::{HttpMethod, LogEntry};
use crate::exporter::Exporter;
use axum::body::{Body, HttpBody};
use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::{AsHeaderName, CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use serde_json::{Map, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Identity of the caller. Handlers insert it into the response extensions;
/// `CaptureOptions::user_extractor` is consulted when they do not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInfo {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub user_identifier: Option<String>,
}

/// Response extension that fills the entry's `error_message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage(pub String);

pub type UserExtractor = Arc<dyn Fn(&Parts) -> Option<UserInfo> + Send + Sync>;

#[derive(Clone)]
pub struct CaptureOptions {
    pub capture_headers: bool,
    pub capture_request_body: bool,
    pub capture_response_body: bool,
    /// JSON bodies larger than this, or of unknown length, are not captured.
    pub max_body_bytes: usize,
    pub user_extractor: Option<UserExtractor>,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            capture_headers: true,
            capture_request_body: true,
            capture_response_body: true,
            max_body_bytes: 64 * 1024,
            user_extractor: None,
        }
    }
}

#[derive(Clone)]
pub struct CaptureState {
    exporter: Arc<Exporter>,
    options: Arc<CaptureOptions>,
}

impl CaptureState {
    pub fn new(exporter: Arc<Exporter>, options: CaptureOptions) -> Self {
        Self {
            exporter,
            options: Arc::new(options),
        }
    }
}

pub async fn capture_api_log(
    State(state): State<CaptureState>,
    request: Request,
    next: Next,
) -> Response {
    let Ok(method) = request.method().as_str().parse::<HttpMethod>() else {
        return next.run(request).await;
    };
    let start = Instant::now();
    let options = &state.options;

    let (parts, body) = request.into_parts();
    let path = parts.uri.path().to_string();
    let user_agent = header_string(&parts.headers, USER_AGENT);
    let ip_address = client_ip(&parts);
    let request_headers = options
        .capture_headers
        .then(|| headers_to_map(&parts.headers));
    let fallback_user = options
        .user_extractor
        .as_ref()
        .and_then(|extract| extract(&parts));

    let (body, request_body) = if options.capture_request_body && is_json(&parts.headers) {
        match capture_body(body, options.max_body_bytes).await {
            Ok(captured) => captured,
            Err(e) => {
                // The stream is spent, so the handler gets an empty body.
                warn!(error = %e, %path, "Failed to read request body");
                (Body::empty(), None)
            }
        }
    } else {
        (body, None)
    };

    let response = next.run(Request::from_parts(parts, body)).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    let (parts, body) = response.into_parts();
    let content_length = parts
        .headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .or_else(|| body.size_hint().exact())
        .unwrap_or(0);
    let response_headers = options
        .capture_headers
        .then(|| headers_to_map(&parts.headers));

    let (body, response_body) = if options.capture_response_body && is_json(&parts.headers) {
        match capture_body(body, options.max_body_bytes).await {
            Ok(captured) => captured,
            Err(e) => {
                warn!(error = %e, %path, "Failed to read response body, entry skipped");
                let mut parts = parts;
                parts.headers.remove(CONTENT_LENGTH);
                return Response::from_parts(parts, Body::empty());
            }
        }
    } else {
        (body, None)
    };

    let user = parts
        .extensions
        .get::<UserInfo>()
        .cloned()
        .or(fallback_user)
        .unwrap_or_default();
    let error_message = parts
        .extensions
        .get::<ErrorMessage>()
        .map(|message| message.0.clone());

    let entry = LogEntry {
        response_time_ms,
        content_length,
        ip_address,
        user_agent,
        error_message,
        user_id: user.user_id,
        user_name: user.user_name,
        user_identifier: user.user_identifier,
        request_headers,
        response_headers,
        request_body,
        response_body,
        ..LogEntry::new(method, path, parts.status.as_u16())
    };
    state.exporter.log(entry);

    Response::from_parts(parts, body)
}

/// Buffers a body of known size so it can be parsed and handed on unchanged.
async fn capture_body(body: Body, max: usize) -> Result<(Body, Option<Value>), axum::Error> {
    match body.size_hint().exact() {
        Some(len) if len as usize <= max => {}
        _ => return Ok((body, None)),
    }

    let bytes = axum::body::to_bytes(body, max).await?;
    let value = serde_json::from_slice(&bytes).ok();
    Ok((Body::from(bytes), value))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

fn header_string(headers: &HeaderMap, name: impl AsHeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn client_ip(parts: &Parts) -> Option<String> {
    if let Some(forwarded) = header_string(&parts.headers, X_FORWARDED_FOR)
        && let Some(first) = forwarded.split(',').next().map(str::trim)
        && !first.is_empty()
    {
        return Some(first.to_string());
    }

    header_string(&parts.headers, X_REAL_IP).or_else(|| {
        parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
    })
}

/// Single-valued headers become strings, repeated ones arrays.
fn headers_to_map(headers: &HeaderMap) -> Map<String, Value> {
    let mut map = Map::new();
    for name in headers.keys() {
        let mut values: Vec<Value> = headers
            .get_all(name)
            .iter()
            .map(|v| Value::String(String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();
        let value = if values.len() == 1 {
            values.remove(0)
        } else {
            Value::Array(values)
        };
        map.insert(name.as_str().to_string(), value);
    }
    map
}
