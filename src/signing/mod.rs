//! Write probe subsystem.
//!
//! # Data Flow
//! ```text
//! identity.rs (read projected OIDC token, extract subject)
//!     → keys.rs (fresh P-256 key, proof of possession)
//!     → fulcio.rs (POST /api/v2/signingCert)
//!     → types.rs (verify issued chain)
//! ```
//!
//! # Design Decisions
//! - The scheduler only sees the [`WriteProbe`] trait: success or failure
//! - The write probe is not a latency observation; its result is logged and
//!   folded into the pass outcome

pub mod fulcio;
pub mod identity;
pub mod keys;
pub mod types;

use async_trait::async_trait;

pub use fulcio::FulcioWriteProbe;
pub use types::{WriteProbeError, WriteProbeResult};

/// A stateful probe performing an authenticated write-then-verify round trip.
#[async_trait]
pub trait WriteProbe: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn run(&self) -> WriteProbeResult<()>;
}
