//! # Configuration
//!
//! Runtime settings for the console binary.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command line flags (`--seed`, `--output`, `--log-level`)
//! 2. Environment variables (`VENDING_*`, `RUST_LOG`)
//! 3. Defaults (this file)

use std::env;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Log filter used when neither `--log-level` nor `RUST_LOG` is set.
///
/// Logs go to stderr, which shares the terminal with the customer console,
/// so only errors are shown by default.
pub const DEFAULT_LOG_FILTER: &str = "error";

// =============================================================================
// Command Line
// =============================================================================

#[derive(Debug, Default, clap::Parser)]
#[command(
    version,
    name = "vending-machine",
    about = "Run one interactive vending machine session"
)]
pub struct Args {
    /// Seed for the coin box RNG (same seed, same coins)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the final receipt as JSON after the session
    #[arg(long, value_enum)]
    pub output: Option<OutputFormat>,

    /// tracing filter directive, e.g. `debug` or `vending_core=trace`
    #[arg(long)]
    pub log_level: Option<String>,
}

/// How the session summary is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Console lines only
    #[default]
    Text,

    /// Console lines plus a pretty JSON receipt
    Json,
}

// =============================================================================
// Config
// =============================================================================

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Coin box RNG seed; `None` seeds from OS entropy.
    pub rng_seed: Option<u64>,

    pub output: OutputFormat,

    /// tracing-subscriber `EnvFilter` directive.
    pub log_filter: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            rng_seed: None,
            output: OutputFormat::Text,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = CliConfig::default();

        let rng_seed = match lookup("VENDING_RNG_SEED") {
            Some(raw) => Some(
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("VENDING_RNG_SEED".to_string()))?,
            ),
            None => defaults.rng_seed,
        };

        let output = match lookup("VENDING_OUTPUT") {
            Some(raw) => OutputFormat::from_str(raw.trim(), true)
                .map_err(|_| ConfigError::InvalidValue("VENDING_OUTPUT".to_string()))?,
            None => defaults.output,
        };

        let log_filter = lookup("RUST_LOG")
            .filter(|raw| !raw.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        Ok(CliConfig {
            rng_seed,
            output,
            log_filter,
        })
    }

    /// Command line flags win over environment values.
    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(seed) = args.seed {
            self.rng_seed = Some(seed);
        }
        if let Some(output) = args.output {
            self.output = output;
        }
        if let Some(filter) = &args.log_level {
            self.log_filter = filter.clone();
        }
        self
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_empty() {
        let config = CliConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_env_values() {
        let config = CliConfig::from_lookup(lookup_from(&[
            ("VENDING_RNG_SEED", "42"),
            ("VENDING_OUTPUT", "JSON"),
            ("RUST_LOG", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_invalid_env_values() {
        let err = CliConfig::from_lookup(lookup_from(&[("VENDING_RNG_SEED", "abc")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for VENDING_RNG_SEED");

        let err = CliConfig::from_lookup(lookup_from(&[("VENDING_OUTPUT", "xml")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref var) if var == "VENDING_OUTPUT"));
    }

    #[test]
    fn test_args_override_env() {
        let env_config = CliConfig::from_lookup(lookup_from(&[
            ("VENDING_RNG_SEED", "1"),
            ("RUST_LOG", "info"),
        ]))
        .unwrap();

        let args = Args::parse_from(["vending-machine", "--seed", "7", "--output", "json"]);
        let config = env_config.with_args(&args);

        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_empty_args_keep_config() {
        let config = CliConfig::default().with_args(&Args::default());
        assert_eq!(config, CliConfig::default());
    }
}
