//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{HeaderMap, HeaderValue, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// Bodies longer than this many characters are truncated in the `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// JSON fields whose values never appear in the logs.
const REDACTED_FIELDS: [&str; 2] = ["password", "token"];

const REDACTED: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
/// Passwords, bearer tokens and the `Authorization` header are redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let Some(body_bytes) = collect_body(body).await else {
        return (StatusCode::BAD_REQUEST, "could not read request body").into_response();
    };

    tracing::info!(
        "Received request: {} {}\nheaders: {:?}\nbody: {}",
        parts.method,
        parts.uri,
        redact_headers(&parts.headers),
        summarize_body(&body_bytes, "request")
    );

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let Some(body_bytes) = collect_body(body).await else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    tracing::info!(
        "Sending response: {}\nheaders: {:?}\nbody: {}",
        parts.status,
        parts.headers,
        summarize_body(&body_bytes, "response")
    );

    Response::from_parts(parts, Body::from(body_bytes))
}

async fn collect_body(body: Body) -> Option<Bytes> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .inspect_err(|error| tracing::error!("could not read body for logging: {error}"))
        .ok()
}

fn redact_headers(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();

    if headers.contains_key(AUTHORIZATION) {
        headers.insert(AUTHORIZATION, HeaderValue::from_static(REDACTED));
    }

    headers
}

fn summarize_body(body: &Bytes, kind: &str) -> String {
    let text = redact_body(body);

    if text.chars().count() > LOG_BODY_LENGTH_LIMIT {
        tracing::debug!("Full {kind} body: {text:?}");
        let truncated: String = text.chars().take(LOG_BODY_LENGTH_LIMIT).collect();
        format!("{truncated:?}...")
    } else {
        format!("{text:?}")
    }
}

/// The body as text with the value of every [REDACTED_FIELDS] key hidden.
///
/// Bodies that are not JSON are returned as is.
fn redact_body(body: &[u8]) -> String {
    match serde_json::from_slice::<Value>(body) {
        Ok(mut json) => {
            redact_value(&mut json);
            json.to_string()
        }
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}

fn redact_value(value: &mut Value) {
    match value {
        Value::Object(fields) => {
            for (key, field) in fields.iter_mut() {
                if REDACTED_FIELDS.contains(&key.as_str()) {
                    *field = Value::String(REDACTED.to_owned());
                } else {
                    redact_value(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_value),
        _ => {}
    }
}
