//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → args.rs (command-line overrides)
//!     → validation.rs (semantic checks)
//!     → ProberConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow running with no file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod args;
pub mod loader;
pub mod schema;
pub mod validation;

pub use args::Cli;
pub use loader::{read_config, ConfigError};
pub use schema::{LoopConfig, ObservabilityConfig, ProberConfig, TargetsConfig, WriteProbeConfig};
pub use validation::ValidationError;
