//! Command-line flags.
//!
//! Flags override values from the optional config file. Flag names follow the
//! long-standing prober deployment manifests, including the misspelled
//! `--frequecy` which is still accepted as an alias.

use clap::Parser;
use std::path::PathBuf;

use crate::config::loader::{read_config, ConfigError};
use crate::config::schema::ProberConfig;
use crate::config::validation::validate_config;

#[derive(Debug, Parser)]
#[command(name = "sigstore-prober")]
#[command(about = "Black-box prober for Rekor and Fulcio", long_about = None)]
pub struct Cli {
    /// Optional TOML config file; flags take precedence over its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// How often to run probers (in seconds)
    #[arg(long = "frequency", alias = "frequecy", value_name = "SECS")]
    pub frequency: Option<u64>,

    /// Address to expose Prometheus metrics on
    #[arg(long)]
    pub addr: Option<String>,

    /// Rekor URL to run probers against
    #[arg(long = "rekor-url")]
    pub rekor_url: Option<String>,

    /// Fulcio URL to run probers against
    #[arg(long = "fulcio-url")]
    pub fulcio_url: Option<String>,

    /// Run a single pass and exit with its status
    #[arg(
        long = "one-time",
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub one_time: Option<bool>,

    /// Run the Fulcio write prober (requires a projected identity token)
    #[arg(
        long = "write-prober",
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub write_prober: Option<bool>,

    /// Log level filter (overridden by RUST_LOG)
    #[arg(long = "log-level")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Build the effective configuration: file (or defaults), then flags.
    pub fn resolve(&self) -> Result<ProberConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => ProberConfig::default(),
        };
        self.apply(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    fn apply(&self, config: &mut ProberConfig) {
        if let Some(frequency) = self.frequency {
            config.prober.interval_secs = frequency;
        }
        if let Some(addr) = &self.addr {
            config.observability.metrics_address = addr.clone();
        }
        if let Some(url) = &self.rekor_url {
            config.targets.rekor_url = url.clone();
        }
        if let Some(url) = &self.fulcio_url {
            config.targets.fulcio_url = url.clone();
        }
        if let Some(one_time) = self.one_time {
            config.prober.one_time = one_time;
        }
        if let Some(enabled) = self.write_prober {
            config.write_probe.enabled = enabled;
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
    }
}
