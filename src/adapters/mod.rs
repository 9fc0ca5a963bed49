//! Adapters - concrete implementations of the ports.
//!
//! # Module Organization
//!
//! - `ai` - Groq completion provider, credential rotator, test mock
//! - `cache` - bounded in-process result cache and content fingerprinting
//! - `http` - axum REST surface and middleware
//! - `kv` - Redis session backend plus the in-memory test store
//! - `metrics` - process-local metrics collector
//! - `report` - evaluator callback delivery

pub mod ai;
pub mod cache;
pub mod http;
pub mod kv;
pub mod metrics;
pub mod report;
