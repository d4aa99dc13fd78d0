//! Configuration management for the desk.
//!
//! Loads configuration from environment variables with sensible defaults.
//! The binary reads a `.env` file first (via `dotenvy`).

use crate::error::ConfigError;
use crate::filter::SearchMode;
use crate::lifecycle::TransitionPolicy;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment variable selecting the search mode
pub const SEARCH_MODE_VAR: &str = "DESK_SEARCH_MODE";

/// Environment variable selecting the transition policy
pub const TRANSITION_POLICY_VAR: &str = "DESK_TRANSITION_POLICY";

/// Environment variable naming a JSON seed file
pub const SEED_FILE_VAR: &str = "DESK_SEED_FILE";

/// Environment variable with the log filter
pub const LOG_FILTER_VAR: &str = "RUST_LOG";

/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "deskflow=info";

/// Desk configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeskConfig {
    /// How list search combines with the other filters
    pub search_mode: SearchMode,
    /// Which status changes reviewers may make
    pub transition_policy: TransitionPolicy,
    /// Seed file to load instead of the demo data
    pub seed_file: Option<PathBuf>,
    /// `tracing` filter directive
    pub log_filter: String,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            search_mode: SearchMode::default(),
            transition_policy: TransitionPolicy::default(),
            seed_file: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl DeskConfig {
    /// Load configuration from environment variables
    ///
    /// Unset or unparseable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            search_mode: env::var(SEARCH_MODE_VAR)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            transition_policy: env::var(TRANSITION_POLICY_VAR)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            seed_file: env::var(SEED_FILE_VAR)
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            log_filter: env::var(LOG_FILTER_VAR)
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    /// Like [`from_env`](Self::from_env), but rejects unparseable values
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first variable that is
    /// set to something unrecognized.
    pub fn try_from_env() -> Result<Self, ConfigError> {
        let defaults = Self::from_env();
        Ok(Self {
            search_mode: parse_var(SEARCH_MODE_VAR)?.unwrap_or_default(),
            transition_policy: parse_var(TRANSITION_POLICY_VAR)?.unwrap_or_default(),
            ..defaults
        })
    }
}

fn parse_var<T>(key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr<Err = ConfigError>,
{
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value.parse().map(Some),
        _ => Ok(None),
    }
}

impl FromStr for SearchMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exclusive" => Ok(Self::Exclusive),
            "conjunctive" => Ok(Self::Conjunctive),
            _ => Err(ConfigError::InvalidValue {
                key: SEARCH_MODE_VAR,
                value: s.to_string(),
                expected: "exclusive, conjunctive",
            }),
        }
    }
}

impl FromStr for TransitionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unrestricted" => Ok(Self::Unrestricted),
            "forward-only" | "forward_only" => Ok(Self::ForwardOnly),
            _ => Err(ConfigError::InvalidValue {
                key: TRANSITION_POLICY_VAR,
                value: s.to_string(),
                expected: "unrestricted, forward-only",
            }),
        }
    }
}
