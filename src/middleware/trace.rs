//! Structured request logging.
//!
//! # Responsibilities
//! - Open a `request` span per request (method, path, matched pattern, id)
//! - Emit one completion event with status and latency
//!
//! # Design Decisions
//! - 5xx logged at error, 4xx at warn, everything else at info
//! - The request id is read from `x-request-id`, so register
//!   [`request_id`](crate::middleware::request_id) before this middleware

use std::time::Instant;

use axum::extract::Request;
use tracing::Instrument;

use crate::http::{Handler, RequestExt};
use crate::middleware::request_id::X_REQUEST_ID;
use crate::middleware::Middleware;

#[derive(Debug, Clone, Copy, Default)]
pub struct TraceRequests;

impl Middleware for TraceRequests {
    fn wrap(&self, next: Handler) -> Handler {
        Handler::new(move |req: Request| {
            let request_id = req
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");

            let span = tracing::info_span!(
                "request",
                method = %req.method(),
                path = %req.uri().path(),
                pattern = req.matched_pattern().unwrap_or(""),
                request_id = %request_id,
            );

            let next = next.clone();
            async move {
                let start = Instant::now();
                tracing::debug!("request started");

                let response = next.serve(req).await;
                let status = response.status();
                let latency_ms = start.elapsed().as_millis() as u64;

                if status.is_server_error() {
                    tracing::error!(status = %status, latency_ms, "request failed");
                } else if status.is_client_error() {
                    tracing::warn!(status = %status, latency_ms, "request rejected");
                } else {
                    tracing::info!(status = %status, latency_ms, "request completed");
                }
                response
            }
            .instrument(span)
        })
    }
}
