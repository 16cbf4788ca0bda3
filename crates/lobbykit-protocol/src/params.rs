//! Session creation parameters and in-session update patches.

use serde::{Deserialize, Serialize};

use crate::{PropertyBag, PASSWORD_KEY};

/// Capacity used for multi-occupant sessions when the caller doesn't pick one.
pub const DEFAULT_CAPACITY: u32 = 5;

// ---------------------------------------------------------------------------
// SessionKind
// ---------------------------------------------------------------------------

/// The two fixed configuration profiles a session can be created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionKind {
    /// Capacity 1, hidden, closed. Nobody else can find or join it.
    Single,
    /// Caller-chosen capacity, listed, open, password-gated.
    Multi,
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => write!(f, "Single"),
            Self::Multi => write!(f, "Multi"),
        }
    }
}

// ---------------------------------------------------------------------------
// CreationParameters
// ---------------------------------------------------------------------------

/// Everything the transport needs to register a new session.
///
/// Build these with [`CreationParameters::for_kind`] (or the `single` /
/// `multi` shorthands) rather than by hand, so the derivation rules for
/// each [`SessionKind`] stay in one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationParameters {
    /// Maximum clients. Not validated here; the transport enforces its
    /// own bounds.
    pub capacity: u32,
    /// Listed in the lobby.
    pub visible: bool,
    /// Accepting new joiners.
    pub open: bool,
    /// `Some` means the `"password"` property is published at creation,
    /// even when the string is empty.
    pub password: Option<String>,
}

impl CreationParameters {
    /// Derives creation parameters from a session kind.
    ///
    /// - `Single` ignores `capacity` and `password` entirely.
    /// - `Multi` uses both verbatim. An empty password is still published,
    ///   which is what makes the session joinable with an empty password.
    pub fn for_kind(kind: SessionKind, capacity: u32, password: &str) -> Self {
        match kind {
            SessionKind::Single => Self {
                capacity: 1,
                visible: false,
                open: false,
                password: None,
            },
            SessionKind::Multi => Self {
                capacity,
                visible: true,
                open: true,
                password: Some(password.to_owned()),
            },
        }
    }

    /// Shorthand for `for_kind(SessionKind::Single, ..)`.
    pub fn single() -> Self {
        Self::for_kind(SessionKind::Single, 1, "")
    }

    /// Shorthand for `for_kind(SessionKind::Multi, capacity, password)`.
    pub fn multi(capacity: u32, password: &str) -> Self {
        Self::for_kind(SessionKind::Multi, capacity, password)
    }

    /// The custom properties the session is created with.
    pub fn initial_properties(&self) -> PropertyBag {
        match &self.password {
            Some(password) => PropertyBag::with_password(password.as_str()),
            None => PropertyBag::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionUpdate
// ---------------------------------------------------------------------------

/// A patch against the current session's settings.
///
/// Fields left as `None` (and keys absent from `properties`) are untouched.
/// The configurator only ever sends single-field patches, one per setter
/// call, mirroring how the transport replicates each change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUpdate {
    pub capacity: Option<u32>,
    pub visible: Option<bool>,
    pub open: Option<bool>,
    #[serde(default)]
    pub properties: PropertyBag,
}

impl SessionUpdate {
    pub fn capacity(n: u32) -> Self {
        Self {
            capacity: Some(n),
            ..Self::default()
        }
    }

    pub fn visible(visible: bool) -> Self {
        Self {
            visible: Some(visible),
            ..Self::default()
        }
    }

    pub fn open(open: bool) -> Self {
        Self {
            open: Some(open),
            ..Self::default()
        }
    }

    pub fn password(password: &str) -> Self {
        let mut properties = PropertyBag::new();
        properties.insert(PASSWORD_KEY, password);
        Self {
            properties,
            ..Self::default()
        }
    }

    /// Returns `true` if applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.capacity.is_none()
            && self.visible.is_none()
            && self.open.is_none()
            && self.properties.is_empty()
    }
}
