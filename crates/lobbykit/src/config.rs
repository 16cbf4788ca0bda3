//! Facade configuration and loading.

use std::path::Path;

use lobbykit_session::MatchmakingConfig;
use serde::{Deserialize, Serialize};

/// Errors raised while loading or validating a [`MatchmakerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file couldn't be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The config isn't valid JSON, or has fields of the wrong type.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The config parsed but holds a value Lobbykit can't work with.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for a [`Matchmaker`](crate::Matchmaker).
///
/// Every field has a default, so `{}` is a valid config file:
///
/// ```rust
/// use lobbykit::MatchmakerConfig;
///
/// let config = MatchmakerConfig::from_json_str(r#"{
///     "auto_join_lobby": false,
///     "matchmaking": { "unauthorized": "ignore" }
/// }"#).unwrap();
/// assert!(!config.auto_join_lobby);
/// assert_eq!(config.matchmaking.default_capacity, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchmakerConfig {
    /// Session-layer tunables (capacities, unauthorized-mutation policy).
    pub matchmaking: MatchmakingConfig,

    /// Join the lobby automatically every time the transport reports
    /// `ConnectedToMaster`, including after leaving a session.
    ///
    /// Default: `true`.
    pub auto_join_lobby: bool,
}

impl Default for MatchmakerConfig {
    fn default() -> Self {
        Self {
            matchmaking: MatchmakingConfig::default(),
            auto_join_lobby: true,
        }
    }
}

impl MatchmakerConfig {
    /// Parses and validates a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks values the type system can't.
    ///
    /// Capacities handed to the transport by explicit setter calls are not
    /// validated here; only the defaults used when the caller doesn't
    /// choose are.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matchmaking.default_capacity == 0 {
            return Err(ConfigError::Invalid(
                "matchmaking.default_capacity must be at least 1".into(),
            ));
        }
        if self.matchmaking.multi_policy_capacity == 0 {
            return Err(ConfigError::Invalid(
                "matchmaking.multi_policy_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
