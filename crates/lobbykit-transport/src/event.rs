//! The asynchronous event feed delivered by the transport.

use lobbykit_protocol::{ClientId, SessionName, SessionSummary};

/// Why a join request was turned down by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum JoinFailure {
    /// No session with that name is active.
    #[error("session does not exist")]
    NotFound,

    /// The session exists but isn't accepting joiners.
    #[error("session is closed")]
    Closed,

    /// The session is at capacity.
    #[error("session is full")]
    Full,

    /// The client is already in a session and must leave it first.
    #[error("already in a session")]
    AlreadyInSession,
}

/// Notifications from the transport.
///
/// The host guarantees these are delivered serially, in the order the
/// service produced them. A [`TransportEvent::SessionListUpdate`] carries
/// only the sessions that changed, except right after joining the lobby,
/// when it carries the full listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The connection to the service is established.
    ConnectedToMaster,

    /// Lobby discovery is active.
    JoinedLobby,

    /// Advertised sessions appeared, changed, or were removed.
    SessionListUpdate(Vec<SessionSummary>),

    /// A session this client requested was registered.
    SessionCreated { name: SessionName },

    /// A session this client requested could not be registered.
    CreateFailed { name: SessionName, reason: String },

    /// This client is now inside `name`.
    JoinedSession { name: SessionName },

    /// A join request was rejected by the service.
    JoinFailed {
        name: SessionName,
        reason: JoinFailure,
    },

    /// This client left `name`.
    LeftSession { name: SessionName },

    /// Authority for `name` moved to `authority`.
    AuthorityChanged {
        name: SessionName,
        authority: ClientId,
    },

    /// The connection was lost.
    Disconnected { reason: String },
}

impl TransportEvent {
    /// A short, stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectedToMaster => "connected_to_master",
            Self::JoinedLobby => "joined_lobby",
            Self::SessionListUpdate(_) => "session_list_update",
            Self::SessionCreated { .. } => "session_created",
            Self::CreateFailed { .. } => "create_failed",
            Self::JoinedSession { .. } => "joined_session",
            Self::JoinFailed { .. } => "join_failed",
            Self::LeftSession { .. } => "left_session",
            Self::AuthorityChanged { .. } => "authority_changed",
            Self::Disconnected { .. } => "disconnected",
        }
    }
}
