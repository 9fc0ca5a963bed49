//! Evaluator callback adapters.

mod http;

pub use http::{HttpReportSink, RecordingSink};
