//! Unified error type for the Lobbykit facade.

use lobbykit_session::SessionError;
use lobbykit_transport::TransportError;

use crate::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates the `From` impls, so
/// `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum LobbykitError {
    /// The transport refused a call (not connected, not in a session).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The session layer refused a call (not the authority).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl LobbykitError {
    /// Returns `true` if this is a refused privileged mutation.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Session(SessionError::Unauthorized))
    }
}
