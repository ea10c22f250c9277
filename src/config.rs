//! Machine options.
//!
//! Options are plain serde data so hosts can keep them next to the rest of
//! their game configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Blend transitions shorter than this many seconds complete instantly.
pub const DEFAULT_INSTANT_THRESHOLD: f32 = 0.01;

pub const DEFAULT_HISTORY_LIMIT: usize = 64;

/// Errors raised while loading or validating [`MachineOptions`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse machine options: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Instant threshold must be finite and non-negative, got {0}")]
    InvalidThreshold(f32),

    #[error("Machine name must not be empty")]
    EmptyName,
}

/// Tunables of a single machine.
///
/// # Example
///
/// ```rust
/// use crossfade::config::MachineOptions;
///
/// let options = MachineOptions::from_json(r#"{ "name": "enemy-ai", "history_limit": 8 }"#).unwrap();
///
/// assert_eq!(options.name, "enemy-ai");
/// assert_eq!(options.history_limit, Some(8));
/// assert_eq!(options.instant_threshold, 0.01);
/// assert!(options.lock_on_die);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineOptions {
    /// Name attached to every log line of the machine
    pub name: String,

    /// Blend transitions shorter than this (seconds) are instantaneous
    pub instant_threshold: f32,

    /// Maximum number of completed transitions kept; `None` keeps all,
    /// so memory grows with every finished transition
    pub history_limit: Option<usize>,

    /// Whether `die` also locks the machine
    pub lock_on_die: bool,
}

impl Default for MachineOptions {
    fn default() -> Self {
        Self {
            name: "state-machine".to_string(),
            instant_threshold: DEFAULT_INSTANT_THRESHOLD,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
            lock_on_die: true,
        }
    }
}

impl MachineOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse and validate options from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if !self.instant_threshold.is_finite() || self.instant_threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.instant_threshold));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let options = MachineOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.instant_threshold, DEFAULT_INSTANT_THRESHOLD);
        assert_eq!(options.history_limit, Some(DEFAULT_HISTORY_LIMIT));
    }

    #[test]
    fn empty_json_yields_defaults() {
        let options = MachineOptions::from_json("{}").unwrap();
        assert_eq!(options, MachineOptions::default());
    }

    #[test]
    fn unlimited_history_is_expressible() {
        let options = MachineOptions::from_json(r#"{ "history_limit": null }"#).unwrap();
        assert_eq!(options.history_limit, None);
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let result = MachineOptions::from_json(r#"{ "instant_threshold": -1.0 }"#);
        assert!(matches!(result, Err(ConfigError::InvalidThreshold(_))));
    }

    #[test]
    fn blank_name_is_rejected() {
        let result = MachineOptions::named("  ").validate();
        assert!(matches!(result, Err(ConfigError::EmptyName)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = MachineOptions::from_json("{ name: ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
