//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! Prometheus scrape
//!     → server.rs (axum router, trace + timeout layers)
//!     → LatencyMetrics::render (read-only snapshot)
//! ```

pub mod server;

pub use server::MetricsServer;
