//! Matchmaking and access control for Lobbykit.
//!
//! This crate holds the only pieces of the stack with real state and
//! policy:
//!
//! 1. **Credential cache** ([`CredentialCache`]): session name → last
//!    observed password, fed by discovery events.
//! 2. **Session configuration** ([`SessionConfigurator`]): creation
//!    parameters and authority-gated mutators for the current session.
//! 3. **Join coordination** ([`JoinCoordinator`]): validates a join
//!    locally before spending a network round trip on it.
//!
//! # How it fits in the stack
//!
//! ```text
//! Matchmaker (above)  ← wires the pieces together, pumps transport events
//!     ↕
//! Session Layer (this crate)  ← cache, authority gate, policies
//!     ↕
//! Transport Layer (below)  ← TransportAdapter, TransportEvent
//! ```

mod authority;
mod cache;
mod config;
mod configurator;
mod error;
mod join;

#[cfg(test)]
mod test_support;

pub use cache::{CredentialCache, SharedCredentials};
pub use config::{MatchmakingConfig, UnauthorizedMutation};
pub use configurator::SessionConfigurator;
pub use error::SessionError;
pub use join::JoinCoordinator;
