//! HTTP handlers for the honeypot endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::metrics::MetricsCollector;
use crate::application::{CallbackService, EngagementService, SessionStore};
use crate::ports::{ErrorClass, MetricsSink};

use super::dto::{ErrorResponse, FinalizeResponse, HealthResponse, HoneypotRequest, HoneypotResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct HoneypotHandlers {
    engagement: Arc<EngagementService>,
    sessions: Arc<SessionStore>,
    callback: Arc<CallbackService>,
    metrics: Arc<MetricsCollector>,
}

impl HoneypotHandlers {
    pub fn new(
        engagement: Arc<EngagementService>,
        sessions: Arc<SessionStore>,
        callback: Arc<CallbackService>,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            engagement,
            sessions,
            callback,
            metrics,
        }
    }

    /// Shared collector, for wiring the timing middleware and /metrics.
    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/honeypot - Run one conversation turn
pub async fn honeypot(
    State(handlers): State<HoneypotHandlers>,
    Json(request): Json<HoneypotRequest>,
) -> Response {
    let session_id = request.session_id.clone();
    tracing::info!(%session_id, "processing honeypot turn");

    match handlers.engagement.engage(request.into_engage_request()).await {
        Ok(reply) => {
            (StatusCode::OK, Json(HoneypotResponse::success(reply.reply))).into_response()
        }
        Err(err) => {
            tracing::error!(%session_id, %err, "honeypot turn failed");
            handlers.metrics.record_error(ErrorClass::Store);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to process request")),
            )
                .into_response()
        }
    }
}

/// POST /api/finalize-session/:id - Deliver the final report immediately
///
/// Operator action, mainly for testing: bypasses the callback policy but
/// still sets the reported flag on success.
pub async fn finalize_session(
    State(handlers): State<HoneypotHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    tracing::info!(%session_id, "manual finalize requested");

    let session = match handlers.sessions.get(&session_id).await {
        Ok(Some(session)) => session,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(format!(
                    "Session {session_id} not found"
                ))),
            )
                .into_response()
        }
        Err(err) => {
            tracing::error!(%session_id, %err, "session lookup failed");
            handlers.metrics.record_error(ErrorClass::Store);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to process callback request")),
            )
                .into_response();
        }
    };

    match handlers.callback.force_report(&session).await {
        Ok(()) => {
            let response = FinalizeResponse {
                status: "success".to_string(),
                message: format!("Callback sent successfully for session {session_id}"),
                session_id,
                scam_detected: session.scam_detected,
                total_messages: session.message_count,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => {
            tracing::error!(%session_id, %err, "manual callback delivery failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to send callback")),
            )
                .into_response()
        }
    }
}

/// GET /health - Liveness probe, no authentication required
pub async fn health() -> Response {
    (StatusCode::OK, Json(HealthResponse::current())).into_response()
}

/// GET /metrics - Counter snapshot, no authentication required
pub async fn metrics_summary(State(handlers): State<HoneypotHandlers>) -> Response {
    (StatusCode::OK, Json(handlers.metrics.summary())).into_response()
}
