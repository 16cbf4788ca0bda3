//! # Lobbykit
//!
//! Client-side session matchmaking and access control for games built on a
//! managed real-time multiplayer service.
//!
//! The service does the networking. Lobbykit decides how sessions are
//! created and configured, which discovered sessions this client may join
//! (password-gated, checked locally before any round trip), and which
//! changes this client is allowed to make (only the session's authority
//! client may touch session-wide settings).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use lobbykit::prelude::*;
//!
//! # async fn run() -> Result<(), LobbykitError> {
//! let lobby = LocalLobby::new();
//! let (transport, events) = lobby.client().await;
//!
//! let matchmaker = Arc::new(MatchmakerBuilder::new().build(transport)?);
//! let (_pump, mut app_events) = Matchmaker::spawn_event_pump(&matchmaker, events);
//! matchmaker.connect().await?;
//!
//! while let Some(event) = app_events.recv().await {
//!     if let TransportEvent::JoinedLobby = event {
//!         matchmaker
//!             .create_multi_session(&SessionName::from("Alpha"), "x1", None)
//!             .await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod logging;
mod matchmaker;

pub use config::{ConfigError, MatchmakerConfig};
pub use error::LobbykitError;
pub use logging::init_tracing;
pub use matchmaker::{Matchmaker, MatchmakerBuilder};

/// Everything a typical caller needs, in one import.
pub mod prelude {
    pub use crate::{
        ConfigError, LobbykitError, Matchmaker, MatchmakerBuilder, MatchmakerConfig,
    };
    pub use lobbykit_protocol::{
        ClientId, CreationParameters, PropertyBag, SessionKind, SessionName,
        SessionSummary, SessionUpdate, DEFAULT_CAPACITY, PASSWORD_KEY,
    };
    pub use lobbykit_session::{MatchmakingConfig, SessionError, UnauthorizedMutation};
    #[cfg(feature = "local")]
    pub use lobbykit_transport::{LocalLobby, LocalTransport};
    pub use lobbykit_transport::{
        JoinFailure, TransportAdapter, TransportError, TransportEvent,
    };
}
