//! Matchmaking configuration.

use lobbykit_protocol::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// UnauthorizedMutation
// ---------------------------------------------------------------------------

/// What a privileged mutation does when this client isn't the authority.
///
/// Either way, nothing reaches the transport. The only difference is what
/// the caller sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnauthorizedMutation {
    /// Return [`SessionError::Unauthorized`](crate::SessionError::Unauthorized).
    #[default]
    Reject,

    /// Return `Ok(())` as if the call had gone through. Callers that depend
    /// on the old fire-and-forget setters can opt into this.
    Ignore,
}

// ---------------------------------------------------------------------------
// MatchmakingConfig
// ---------------------------------------------------------------------------

/// Tunables for the session layer.
///
/// `#[serde(default)]` lets a config file name only the fields it wants to
/// change; everything else falls back to [`MatchmakingConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchmakingConfig {
    /// Capacity for multi-occupant sessions created without an explicit one.
    ///
    /// Default: 5.
    pub default_capacity: u32,

    /// Capacity applied by
    /// [`apply_multi_occupant_policy`](crate::SessionConfigurator::apply_multi_occupant_policy).
    ///
    /// Default: 5.
    pub multi_policy_capacity: u32,

    /// Behaviour of setters called without authority.
    pub unauthorized: UnauthorizedMutation,
}

impl Default for MatchmakingConfig {
    fn default() -> Self {
        Self {
            default_capacity: DEFAULT_CAPACITY,
            multi_policy_capacity: DEFAULT_CAPACITY,
            unauthorized: UnauthorizedMutation::Reject,
        }
    }
}
