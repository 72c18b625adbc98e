//! Environment configuration for the `stocksim` binary.
//!
//! The binary takes no arguments. Everything optional comes from the
//! environment:
//!
//! - `STOCKSIM_SEED`: u64 seed making the randomized configuration reproducible
//! - `STOCKSIM_MONITOR`: `1`/`true`/`yes` to sample the stock while workers run
//! - `STOCKSIM_LOG_FORMAT`: `text` (default) or `json`
//! - `RUST_LOG`: tracing filter (default `warn`)

use std::num::ParseIntError;

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use stocksim_observability::{LogFormat, ObservabilityConfig, ParseLogFormatError};
use stocksim_simulation::SimulationConfig;

pub const SEED_VAR: &str = "STOCKSIM_SEED";
pub const MONITOR_VAR: &str = "STOCKSIM_MONITOR";
pub const LOG_FORMAT_VAR: &str = "STOCKSIM_LOG_FORMAT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("STOCKSIM_SEED={value:?} is not a u64: {source}")]
    InvalidSeed {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("{var}={value:?} is not a boolean")]
    InvalidFlag { var: &'static str, value: String },

    #[error("STOCKSIM_LOG_FORMAT: {0}")]
    LogFormat(#[from] ParseLogFormatError),
}

/// Settings read from the environment at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    pub seed: Option<u64>,
    pub monitor: bool,
    pub log_format: LogFormat,
}

impl CliConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let seed = match lookup(SEED_VAR) {
            Some(value) => Some(value.trim().parse::<u64>().map_err(|source| {
                ConfigError::InvalidSeed {
                    value: value.clone(),
                    source,
                }
            })?),
            None => None,
        };

        let monitor = match lookup(MONITOR_VAR) {
            Some(value) => parse_flag(MONITOR_VAR, &value)?,
            None => false,
        };

        let log_format = match lookup(LOG_FORMAT_VAR) {
            Some(value) => value.parse::<LogFormat>()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            seed,
            monitor,
            log_format,
        })
    }

    /// The configured seed, or a fresh one from the thread-local generator.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Randomized simulation parameters drawn from `seed`.
    pub fn simulation_config(&self, seed: u64) -> SimulationConfig {
        let mut rng = StdRng::seed_from_u64(seed);
        SimulationConfig::random(&mut rng).with_monitor(self.monitor)
    }

    pub fn observability(&self) -> ObservabilityConfig {
        ObservabilityConfig::default().with_format(self.log_format)
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var,
            value: value.to_string(),
        }),
    }
}
