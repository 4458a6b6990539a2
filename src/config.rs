//! Container configuration.
//!
//! Values come from [`Default`], from `FERROUS_INJECT_*` environment variables,
//! or, with the `config` feature, from JSON documents.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Environment variable prefix read by [`ContainerConfig::from_env`].
pub const ENV_PREFIX: &str = "FERROUS_INJECT";

/// Tunables for a [`Container`](crate::Container).
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{Container, ContainerConfig};
///
/// let config = ContainerConfig {
///     capacity: 64,
///     ..ContainerConfig::default()
/// };
/// let container = Container::with_config(config);
/// assert!(container.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerConfig {
    /// Expected number of registrations
    pub capacity: usize,
    /// Reject unknown strategy names at registration instead of falling back
    pub strict_strategies: bool,
    /// Install a [`LoggingObserver`](crate::LoggingObserver) at construction
    pub log_wiring: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            capacity: 16,
            strict_strategies: false,
            log_wiring: false,
        }
    }
}

impl ContainerConfig {
    /// Reads `FERROUS_INJECT_CAPACITY`, `FERROUS_INJECT_STRICT_STRATEGIES` and
    /// `FERROUS_INJECT_LOG_WIRING`. Missing or unparsable values keep their
    /// defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(capacity) = env_value("CAPACITY").and_then(|v| v.parse().ok()) {
            config.capacity = capacity;
        }
        if let Some(strict) = env_value("STRICT_STRATEGIES").and_then(|v| parse_flag(&v)) {
            config.strict_strategies = strict;
        }
        if let Some(log) = env_value("LOG_WIRING").and_then(|v| parse_flag(&v)) {
            config.log_wiring = log;
        }
        config
    }

    /// Parses a JSON document; absent keys keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(format!("{}_{}", ENV_PREFIX, key)).ok()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" on "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_fills_missing_keys_with_defaults() {
        let config = ContainerConfig::from_json(r#"{"strict_strategies": true}"#).unwrap();
        assert!(config.strict_strategies);
        assert_eq!(config.capacity, 16);
        assert!(!config.log_wiring);
    }
}
