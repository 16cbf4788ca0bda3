//! Identity and descriptor types shared by every Lobbykit layer.
//!
//! The transport owns the authoritative copy of every session. What we see
//! on the client is a [`SessionSummary`]: a read-only snapshot delivered
//! with each discovery notification.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The reserved property key that carries a session's plaintext password.
pub const PASSWORD_KEY: &str = "password";

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The name of a session. Names are unique among active sessions, so the
/// name doubles as the session's primary key.
///
/// Newtype over `String` so a session name can't be confused with a
/// password or a property value in function signatures.
/// `#[serde(transparent)]` keeps it a plain JSON string.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SessionName(String);

impl SessionName {
    /// Creates a session name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `Borrow<str>` lets a `HashMap<SessionName, _>` be queried with a plain
/// `&str`, without allocating a `SessionName` first.
impl Borrow<str> for SessionName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionName {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<String> for SessionName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Opaque identifier for one client connected to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(u64);

impl ClientId {
    /// Creates a new `ClientId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// PropertyBag
// ---------------------------------------------------------------------------

/// Arbitrary string key/value pairs replicated with a session.
///
/// Backed by a `BTreeMap` so iteration order (and therefore log output and
/// serialized form) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag(BTreeMap<String, String>);

impl PropertyBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bag holding only the password property.
    pub fn with_password(password: impl Into<String>) -> Self {
        let mut bag = Self::new();
        bag.insert(PASSWORD_KEY, password);
        bag
    }

    /// Inserts or overwrites a property, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns the published password, if the session carries one.
    ///
    /// `Some("")` and `None` are different: the first is a session that
    /// explicitly published an empty password, the second never published
    /// the property at all.
    pub fn password(&self) -> Option<&str> {
        self.get(PASSWORD_KEY)
    }

    /// Copies every entry of `other` into `self`, overwriting on collision.
    pub fn merge(&mut self, other: &PropertyBag) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Returns the number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no properties.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// SessionSummary
// ---------------------------------------------------------------------------

/// One entry of a discovery notification.
///
/// Delivered by the transport whenever the set of advertised sessions or
/// their properties changes. This is read-only to the matchmaking core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// The session's unique name.
    pub name: SessionName,
    /// Number of clients currently in the session.
    pub player_count: u32,
    /// Maximum clients allowed.
    pub capacity: u32,
    /// Whether the session is listed in the lobby.
    pub visible: bool,
    /// Whether the session accepts new joiners.
    pub open: bool,
    /// Replicated custom properties (including `"password"`, if published).
    #[serde(default)]
    pub properties: PropertyBag,
    /// Set when the transport stopped advertising this session (closed,
    /// hidden or emptied). Removed entries usually carry no properties.
    #[serde(default)]
    pub removed_from_list: bool,
}

impl SessionSummary {
    /// Creates a listed, open summary with no players and no properties.
    pub fn new(name: impl Into<SessionName>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            player_count: 0,
            capacity,
            visible: true,
            open: true,
            properties: PropertyBag::new(),
            removed_from_list: false,
        }
    }

    /// Builder-style helper that publishes a password property.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.properties.insert(PASSWORD_KEY, password);
        self
    }

    /// Returns the published password, if any.
    pub fn password(&self) -> Option<&str> {
        self.properties.password()
    }
}
