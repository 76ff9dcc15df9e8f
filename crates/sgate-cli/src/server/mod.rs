//! HTTP adapter: maps axum requests onto the access gate and back.
//!
//! All decision logic lives in `sgate_core::gate`; this module only extracts
//! the method, name, raw flag, headers and submitted key, runs the gate on
//! the blocking pool and copies the rendered response out.
//!
//! Inputs are decoded lossily and never rejected here: a path segment or
//! header value with bytes outside UTF-8 still reaches the gate, which
//! sanitizes or classifies it like any other input.

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use percent_encoding::percent_decode_str;
use sgate_core::gate::{AccessDecision, AccessGate};
use sgate_core::request::{AccessMode, GateRequest, RequestHeaders, RequestMethod, RAW_FLAG};
use sgate_core::store::ScriptDir;
use sgate_core::variant::{self, CardPages, GateResponse};
use std::sync::Arc;

/// Form field carrying the shared key on POST.
pub const KEY_FIELD: &str = "key";
const NAME_PARAM: &str = "name";
const SCRIPT_ROUTE: &str = "/api/script";

pub type SharedGate = Arc<AccessGate<ScriptDir>>;

pub fn router(gate: SharedGate) -> Router {
    Router::new()
        .route(SCRIPT_ROUTE, any(script_handler))
        .route("/api/script/:name", any(script_handler))
        .with_state(gate)
}

fn form_value(encoded: &[u8], field: &str) -> Option<String> {
    url::form_urlencoded::parse(encoded)
        .find(|(k, _)| k == field)
        .map(|(_, v)| v.into_owned())
}

/// Percent-decoded `name` segment of `/api/script/<name>`, if present.
pub(crate) fn path_name(path: &str) -> Option<String> {
    let segment = path.strip_prefix(SCRIPT_ROUTE)?.strip_prefix('/')?;
    Some(percent_decode_str(segment).decode_utf8_lossy().into_owned())
}

/// Builds the gate request. A `name` query parameter wins over the path segment.
pub(crate) fn build_request(
    method: &Method,
    path_name: Option<String>,
    query: Option<&str>,
    headers: &HeaderMap,
    body: &[u8],
) -> GateRequest {
    let query = query.unwrap_or("").as_bytes();
    let raw_name = form_value(query, NAME_PARAM)
        .or(path_name)
        .unwrap_or_default();
    let mode = AccessMode::from_raw_flag(form_value(query, RAW_FLAG).as_deref());

    let request_headers: RequestHeaders = headers
        .iter()
        .map(|(k, v)| (k.as_str(), String::from_utf8_lossy(v.as_bytes())))
        .collect();

    let method = RequestMethod::parse(method.as_str());
    let presented_key = match method {
        RequestMethod::Post => form_value(body, KEY_FIELD),
        _ => None,
    };

    GateRequest {
        method,
        raw_name,
        mode,
        headers: request_headers,
        presented_key,
    }
}

fn into_response(resp: GateResponse) -> Response {
    let mut builder = axum::http::Response::builder().status(resp.status);
    for (name, value) in &resp.headers {
        builder = builder.header(*name, value.as_str());
    }
    builder
        .body(Body::from(resp.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

fn internal_error() -> Response {
    into_response(variant::respond(
        &AccessDecision::InternalError,
        false,
        &CardPages,
    ))
}

pub async fn script_handler(
    State(gate): State<SharedGate>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let req = build_request(&method, path_name(uri.path()), uri.query(), &headers, &body);
    match tokio::task::spawn_blocking(move || gate.handle(&req)).await {
        Ok(resp) => {
            tracing::info!(method = %method, status = resp.status, "script request");
            into_response(resp)
        }
        Err(e) => {
            tracing::error!("gate task failed: {}", e);
            internal_error()
        }
    }
}
