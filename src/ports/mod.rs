//! Ports - trait boundaries between the engine and its collaborators.
//!
//! Adapters implement these; application services depend only on the traits.

pub mod ai_provider;
pub mod callback_policy;
pub mod key_value;
pub mod metrics;
pub mod report_sink;

pub use ai_provider::{
    AiError, AiProvider, ChatMessage, CompletionRequest, CompletionResponse, MessageRole,
    ProviderInfo,
};
pub use callback_policy::{CallbackPolicy, ReportOnDetection, ThresholdPolicy};
pub use key_value::{KeyValueStore, StoreError};
pub use metrics::{ErrorClass, IntelCategory, MetricsSink, NoOpMetrics};
pub use report_sink::{FinalReport, ReportError, ReportSink};
