//! Honeytrap service binary.
//!
//! Loads configuration, wires the adapters into the engagement pipeline and
//! serves the HTTP surface.

use std::sync::Arc;
use std::time::Duration;

use tower_http::timeout::TimeoutLayer;
use tracing_subscriber::EnvFilter;

use honeytrap::adapters::ai::{CredentialRotator, GroqConfig, GroqProvider};
use honeytrap::adapters::http::{app_router, honeypot::cors_layer, HoneypotHandlers};
use honeytrap::adapters::kv::RedisStore;
use honeytrap::adapters::metrics::MetricsCollector;
use honeytrap::adapters::report::HttpReportSink;
use honeytrap::application::{
    CallbackService, DecoyAgent, EngagementService, IntelExtractor, ScamDetector, SessionStore,
};
use honeytrap::config::{AppConfig, PolicyKind};
use honeytrap::ports::{AiProvider, CallbackPolicy, ReportOnDetection, ThresholdPolicy};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.log_level))
        .init();

    tracing::info!(
        environment = ?config.server.environment,
        policy = ?config.callback.policy,
        "starting honeytrap"
    );

    // One provider per credential; the rotator spreads calls round-robin.
    let providers: Vec<Arc<dyn AiProvider>> = config
        .ai
        .api_keys()
        .into_iter()
        .filter_map(|key| {
            let provider_config = GroqConfig::new(key)
                .with_model(config.ai.model.as_str())
                .with_timeout(config.ai.timeout());
            match GroqProvider::new(provider_config) {
                Ok(provider) => Some(Arc::new(provider) as Arc<dyn AiProvider>),
                Err(err) => {
                    tracing::warn!(%err, "skipping credential, provider init failed");
                    None
                }
            }
        })
        .collect();
    if providers.is_empty() {
        tracing::warn!("no completion credentials configured, running on deterministic fallbacks");
    } else {
        tracing::info!(credentials = providers.len(), "completion provider ready");
    }
    let rotator = Arc::new(CredentialRotator::new(providers));

    let store = RedisStore::connect(&config.redis.url).await?;
    let sessions = Arc::new(SessionStore::new(
        Arc::new(store),
        config.redis.session_ttl(),
    ));

    let metrics = Arc::new(MetricsCollector::new());

    let policy: Arc<dyn CallbackPolicy> = match config.callback.policy {
        PolicyKind::OnDetection => Arc::new(ReportOnDetection),
        PolicyKind::Threshold => Arc::new(ThresholdPolicy {
            report_after_messages: config.callback.report_after_messages,
            max_turns: config.callback.max_turns,
            min_artifacts: config.callback.min_artifacts,
            min_messages_for_artifacts: config.callback.min_messages_for_artifacts,
        }),
    };
    let sink = HttpReportSink::new(config.callback.url.as_str(), config.callback.timeout())?;
    let callback = Arc::new(CallbackService::new(
        Arc::new(sink),
        policy,
        sessions.clone(),
        metrics.clone(),
    ));

    let engagement = Arc::new(EngagementService::new(
        sessions.clone(),
        ScamDetector::new(rotator.clone(), config.ai.cache_capacity, metrics.clone()),
        IntelExtractor::new(rotator.clone(), config.ai.cache_capacity, metrics.clone()),
        DecoyAgent::new(rotator),
        callback.clone(),
        metrics.clone(),
    ));

    let handlers = HoneypotHandlers::new(engagement, sessions, callback, metrics);
    let router = app_router(handlers, config.server.api_key.clone())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config.server.cors_origins_list()));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "honeytrap listening");
    axum::serve(listener, router).await?;

    Ok(())
}
