//! Request timing middleware.
//!
//! Counts every request and samples wall-clock handling time into the
//! metrics collector. The elapsed time is echoed back in an
//! `x-process-time` header for client-side diagnosis.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};

use crate::adapters::metrics::MetricsCollector;
use crate::ports::MetricsSink;

/// Middleware recording request counts and response times.
pub async fn timing_middleware(
    State(metrics): State<Arc<MetricsCollector>>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    metrics.record_request();

    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;
    let elapsed = started.elapsed().as_secs_f64();
    metrics.record_response_time(elapsed);

    if let Ok(header) = HeaderValue::from_str(&format!("{elapsed:.3}")) {
        response.headers_mut().insert("x-process-time", header);
    }
    tracing::info!(%method, %path, elapsed_secs = format!("{elapsed:.3}"), "request handled");
    response
}
