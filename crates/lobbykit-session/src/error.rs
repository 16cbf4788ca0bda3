//! Error types for the session layer.

use lobbykit_transport::TransportError;

/// Errors that can occur while configuring or joining sessions.
///
/// A locally rejected join is *not* an error: [`JoinCoordinator::try_join`]
/// returns `Ok(false)` for it.
///
/// [`JoinCoordinator::try_join`]: crate::JoinCoordinator::try_join
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A privileged mutation was attempted by a client that isn't the
    /// authority for its current session. Nothing was sent to the
    /// transport.
    #[error("not the authority client for the current session")]
    Unauthorized,

    /// The transport refused the request at call time.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
