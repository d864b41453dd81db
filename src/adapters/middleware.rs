//! Gateway-level axum middleware.
//!
//! These run in front of every REST and GraphQL route: API-key enforcement,
//! request ids, inbound metrics and CORS. They hold no state beyond the key
//! set handed to [`api_key_middleware`].
use std::{collections::HashSet, sync::Arc, time::Instant};

use axum::{
    Json,
    extract::{MatchedPath, Request, State},
    http::{HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::Instrument;

use super::envelope::Envelope;
use crate::{core::error::ApiError, metrics::record_api_request, tracing_setup::create_request_span};

pub const API_KEY_HEADER: &str = "x-api-key";
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";
pub const HEALTH_PATH: &str = "/ping";

/// Accepted API keys.
pub type ApiKeys = Arc<HashSet<String>>;

/// Reject requests whose `x-api-key` is missing or unknown, except the health
/// check. Nothing downstream runs for a rejected request.
pub async fn api_key_middleware(State(keys): State<ApiKeys>, req: Request, next: Next) -> Response {
    if req.uri().path() == HEALTH_PATH {
        return next.run(req).await;
    }

    let presented = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match presented {
        Some(key) if keys.contains(key) => next.run(req).await,
        _ => {
            tracing::warn!(path = %req.uri().path(), "Rejected request with invalid API key");
            let err = ApiError::unauthorized("invalid API key");
            (err.status_code(), Json(Envelope::<String>::failure(&err))).into_response()
        }
    }
}

/// Run the request inside a `request` span and echo its id in `X-Request-ID`.
pub async fn request_id_middleware(req: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let span = create_request_span(req.method().as_str(), req.uri().path(), &request_id);
    let start = Instant::now();

    let mut response = next.run(req).instrument(span.clone()).await;

    span.record("http.status_code", response.status().as_u16());
    span.record("duration_ms", start.elapsed().as_millis() as u64);
    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    }

    response
}

/// Record inbound traffic metrics and log completion with latency.
pub async fn api_metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let response = next.run(req).await;
    let duration = start.elapsed();
    let status = response.status();

    record_api_request(method.as_str(), &path, status.as_u16(), duration);
    tracing::info!(
        method = %method,
        path = %path,
        status = status.as_u16(),
        elapsed = ?duration,
        "Completed request"
    );

    response
}

/// Permissive CORS. Preflight requests are answered directly.
pub async fn cors_middleware(req: Request, next: Next) -> Response {
    let origin = req.headers().get("origin").cloned();
    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    let headers = response.headers_mut();
    headers.insert(
        "Access-Control-Allow-Origin",
        origin.unwrap_or_else(|| HeaderValue::from_static("*")),
    );
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type, Authorization, x-api-key, x-auth-token"),
    );
    headers.insert("Access-Control-Max-Age", HeaderValue::from_static("86400"));

    response
}
