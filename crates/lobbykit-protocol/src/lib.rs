//! Session data model for Lobbykit.
//!
//! This crate defines the values that move between the matchmaking core
//! and the external transport:
//!
//! - **Identity** ([`SessionName`], [`ClientId`]): which session or client
//!   we're talking about.
//! - **Descriptors** ([`SessionSummary`], [`PropertyBag`]): what the
//!   transport advertises during discovery.
//! - **Configuration** ([`SessionKind`], [`CreationParameters`],
//!   [`SessionUpdate`]): what we ask the transport to create or change.
//!
//! # Architecture
//!
//! The data model sits at the bottom of the stack. It doesn't know about
//! connections, caches or authority. It only describes sessions.
//!
//! ```text
//! Transport (events) → Protocol (SessionSummary) → Session (cache, gate)
//! ```

mod params;
mod types;

pub use params::{CreationParameters, SessionKind, SessionUpdate, DEFAULT_CAPACITY};
pub use types::{ClientId, PropertyBag, SessionName, SessionSummary, PASSWORD_KEY};
