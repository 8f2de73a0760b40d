//! Notification relay and usage-metrics delivery for the Virtual Andon
//! console.
//!
//! - [`NotificationRelay`]: in-process toast channel backed by
//!   `tokio::sync::broadcast`.
//! - [`MetricsSink`]: fire-and-forget usage metrics, with an HTTP
//!   implementation ([`MetricsDelivery`]) and a no-op one ([`NoopMetrics`]).

pub mod metrics;
pub mod relay;

pub use metrics::{MetricsDelivery, MetricsError, MetricsSink, NoopMetrics, UsageReport};
pub use relay::NotificationRelay;
