//! Black-box prober for the Rekor transparency log and the Fulcio CA.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod probe;
pub mod signing;

pub use config::schema::ProberConfig;
pub use http::MetricsServer;
pub use lifecycle::Shutdown;
pub use probe::{Prober, RunOutcome};
