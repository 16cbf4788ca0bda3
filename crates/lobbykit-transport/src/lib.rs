//! Transport abstraction layer for Lobbykit.
//!
//! Lobbykit doesn't implement networking itself. Connection establishment,
//! lobby discovery and property replication belong to an external real-time
//! multiplayer service. This crate defines the seam:
//!
//! - [`TransportAdapter`]: the calls the matchmaking core makes into the
//!   service.
//! - [`TransportEvent`]: the asynchronous feed the service delivers back
//!   (discovery updates, join/create outcomes, authority handoffs).
//!
//! # Feature Flags
//!
//! - `local` (default): [`LocalLobby`], an in-memory stand-in for the
//!   managed service, used by tests and demos.

mod error;
mod event;
#[cfg(feature = "local")]
mod local;

pub use error::TransportError;
pub use event::{JoinFailure, TransportEvent};
#[cfg(feature = "local")]
pub use local::{LocalLobby, LocalTransport};

use std::future::Future;

use lobbykit_protocol::{ClientId, CreationParameters, SessionName, SessionUpdate};

/// The calls the matchmaking core makes into the multiplayer service.
///
/// Every method is fire-and-forget from the core's point of view: an `Ok`
/// means the request was handed to the service, not that it succeeded.
/// Outcomes are reported on the event feed.
///
/// # Trait bounds
///
/// Methods return `impl Future<Output = ...> + Send` (instead of plain
/// `async fn`) so callers generic over the adapter can still hand their
/// futures to `tokio::spawn`. Implementors may write `async fn` in the
/// `impl` block as long as the body is `Send`.
pub trait TransportAdapter: Send + Sync + 'static {
    /// Starts connecting to the service. Completion is reported as
    /// [`TransportEvent::ConnectedToMaster`].
    fn connect(&self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Subscribes to lobby discovery. The service answers with
    /// [`TransportEvent::JoinedLobby`] followed by session list updates.
    fn join_lobby(&self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Point-in-time query: is this client the authority for its current
    /// session? `false` when not in a session.
    ///
    /// Callers must not cache the answer. Authority can be handed off at any
    /// time between two calls.
    fn is_authority_for_current_session(&self) -> impl Future<Output = bool> + Send;

    /// Requests a new session. A name collision is reported as
    /// [`TransportEvent::CreateFailed`].
    fn create_session(
        &self,
        name: &SessionName,
        params: &CreationParameters,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Applies a patch to the current session.
    ///
    /// The service only honours this for the authority client. Anyone else
    /// gets an `Ok` and the patch is silently discarded, so callers must
    /// check authority themselves.
    fn set_current_session_properties(
        &self,
        update: SessionUpdate,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Requests to join a session by name. Failure (full, closed, gone) is
    /// reported as [`TransportEvent::JoinFailed`].
    fn join_session(
        &self,
        name: &SessionName,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Leaves the current session.
    fn leave_session(&self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// This client's identity on the service.
    fn client_id(&self) -> ClientId;
}
