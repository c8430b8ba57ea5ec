//! Request metrics through the `metrics` facade.
//!
//! # Metrics
//! - `http_requests_total` (counter): by method, pattern, status
//! - `http_request_duration_seconds` (histogram): by method, pattern
//!
//! No recorder is installed here; the embedding process picks an exporter.

use std::time::Instant;

use axum::extract::Request;

use crate::http::{Handler, RequestExt};
use crate::middleware::Middleware;

#[derive(Debug, Clone, Copy, Default)]
pub struct RecordMetrics;

impl Middleware for RecordMetrics {
    fn wrap(&self, next: Handler) -> Handler {
        Handler::new(move |req: Request| {
            let method = req.method().to_string();
            let pattern = req.matched_pattern().unwrap_or("unmatched").to_string();
            let next = next.clone();

            async move {
                let start = Instant::now();
                let response = next.serve(req).await;
                let status = response.status().as_u16().to_string();

                metrics::counter!(
                    "http_requests_total",
                    "method" => method.clone(),
                    "pattern" => pattern.clone(),
                    "status" => status
                )
                .increment(1);
                metrics::histogram!(
                    "http_request_duration_seconds",
                    "method" => method,
                    "pattern" => pattern
                )
                .record(start.elapsed().as_secs_f64());

                response
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_records_without_recorder() {
        let handler = RecordMetrics.wrap(Handler::new(|_req: Request| async { StatusCode::NO_CONTENT }));
        let response = handler.serve(Request::new(Body::empty())).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
