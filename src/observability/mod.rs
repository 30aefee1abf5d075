//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Probe loop produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (latency summary + histogram)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;

pub use metrics::{LatencyLabels, LatencyMetrics, MetricsError};
