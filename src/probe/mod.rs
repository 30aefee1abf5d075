//! Probe subsystem.
//!
//! # Data Flow
//! ```text
//! scheduler.rs (one pass, in catalog order)
//!     → catalog.rs (Rekor probes, then Fulcio probes)
//!     → executor.rs (send request, time it)
//!     → recorder.rs (label + append to summary and histogram)
//!     → signing::WriteProbe (once per pass, if enabled)
//! ```

pub mod catalog;
pub mod executor;
pub mod recorder;
pub mod scheduler;

pub use catalog::{ProbeCatalog, ProbeDefinition, Target};
pub use executor::{ObservationOutcome, ProbeError, RequestExecutor};
pub use recorder::ObservationRecorder;
pub use scheduler::{PassReport, ProbeSettings, Prober, RunOutcome};
