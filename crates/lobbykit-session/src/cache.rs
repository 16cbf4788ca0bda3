//! The credential cache: session name → last observed password.
//!
//! The cache is a projection of discovery events, nothing more. It learns a
//! password only when the transport advertises a session carrying the
//! `"password"` property, and it never forgets one.
//!
//! # Concurrency note
//!
//! `CredentialCache` itself is a plain `HashMap` owner with `&mut self`
//! writes. Transport events are pumped on their own task, so the cache is
//! shared between that task (writer) and the join path (reader) as
//! [`SharedCredentials`], an `Arc<RwLock<_>>`.

use std::collections::HashMap;
use std::sync::Arc;

use lobbykit_protocol::{SessionName, SessionSummary};
use tokio::sync::RwLock;

/// A credential cache shared between the event pump and the join path.
pub type SharedCredentials = Arc<RwLock<CredentialCache>>;

/// Client-local mapping from session name to its advertised password.
///
/// ## Invariants
///
/// - An entry exists only for sessions that published `"password"` in some
///   discovery batch.
/// - The entry holds the value from the most recent such summary.
/// - Entries are never pruned. A session that closes or stops being listed
///   keeps its last password until the process exits.
#[derive(Debug, Default)]
pub struct CredentialCache {
    passwords: HashMap<SessionName, String>,
}

impl CredentialCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a fresh cache for sharing across tasks.
    pub fn shared() -> SharedCredentials {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Folds one discovery batch into the cache.
    ///
    /// Every summary that carries a password overwrites that session's entry.
    /// Summaries without one are skipped: no insert, no delete. That
    /// includes summaries flagged `removed_from_list`, which the transport
    /// sends without properties.
    pub fn on_session_list_update(&mut self, sessions: &[SessionSummary]) {
        for summary in sessions {
            let Some(password) = summary.password() else {
                continue;
            };
            tracing::debug!(session = %summary.name, "cached session password");
            match self.passwords.get_mut(summary.name.as_str()) {
                Some(existing) => password.clone_into(existing),
                None => {
                    self.passwords
                        .insert(summary.name.clone(), password.to_owned());
                }
            }
        }
    }

    /// Returns the cached password for `name`, if one was ever observed.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.passwords.get(name).map(String::as_str)
    }

    /// Number of sessions with a cached password.
    pub fn len(&self) -> usize {
        self.passwords.len()
    }

    /// Returns `true` if no password has been observed yet.
    pub fn is_empty(&self) -> bool {
        self.passwords.is_empty()
    }
}
