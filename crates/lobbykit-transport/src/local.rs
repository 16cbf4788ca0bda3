//! In-memory lobby: a process-local stand-in for the managed service.
//!
//! A [`LocalLobby`] plays the part of the remote service. Each call to
//! [`LocalLobby::client`] hands out a [`LocalTransport`] (one connected
//! client) plus the receiving end of that client's event feed. All clients
//! share one registry behind a `tokio::sync::Mutex`, so any number of them
//! can live in the same test or demo.
//!
//! The lobby mirrors the service contract the matchmaking core relies on:
//!
//! - the first member of a session is its authority; when the authority
//!   leaves, the next member takes over;
//! - a non-authority property patch is accepted and thrown away;
//! - create/join outcomes are reported on the event feed, never as errors;
//! - lobby clients receive a summary every time a visible session changes,
//!   and a `removed_from_list` summary when it is hidden or closes down;
//! - dropping a `LocalTransport` deregisters its client, which closes that
//!   client's event feed.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use lobbykit_protocol::{
    ClientId, CreationParameters, PropertyBag, SessionName, SessionSummary,
    SessionUpdate,
};
use tokio::sync::{mpsc, Mutex};

use crate::{JoinFailure, TransportAdapter, TransportError, TransportEvent};

/// The shared, in-memory "service".
///
/// Cheap to clone: every clone refers to the same registry.
#[derive(Clone, Default)]
pub struct LocalLobby {
    state: Arc<Mutex<LobbyState>>,
}

impl LocalLobby {
    /// Creates an empty lobby with no clients and no sessions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new (not yet connected) client.
    ///
    /// Returns the client's transport handle and its event feed. Dropping
    /// the receiver is fine; events for that client are then discarded.
    pub async fn client(
        &self,
    ) -> (LocalTransport, mpsc::UnboundedReceiver<TransportEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state.lock().await;
        state.next_client += 1;
        let id = ClientId::new(state.next_client);
        state.clients.insert(
            id,
            ClientSlot {
                events: tx,
                connected: false,
                in_lobby: false,
                current: None,
            },
        );
        tracing::debug!(client = %id, "local client registered");

        let transport = LocalTransport {
            id,
            lobby: Arc::clone(&self.state),
        };
        (transport, rx)
    }

    /// Returns the service-side view of a session, whether listed or not.
    pub async fn session(&self, name: &str) -> Option<SessionSummary> {
        let state = self.state.lock().await;
        state
            .sessions
            .get_key_value(name)
            .map(|(name, session)| session.summary(name))
    }

    /// Returns the authority client of a session.
    pub async fn authority_of(&self, name: &str) -> Option<ClientId> {
        let state = self.state.lock().await;
        state.sessions.get(name).and_then(HostedSession::authority)
    }

    /// Number of active sessions.
    pub async fn session_count(&self) -> usize {
        self.state.lock().await.sessions.len()
    }

    /// Number of registered clients, connected or not.
    pub async fn client_count(&self) -> usize {
        self.state.lock().await.clients.len()
    }

    /// Simulates a dropped connection for `client`.
    ///
    /// The client leaves its session (handing off authority if needed) and
    /// receives [`TransportEvent::Disconnected`].
    pub async fn disconnect(&self, client: ClientId, reason: &str) {
        let mut state = self.state.lock().await;
        state.remove_member(client);
        if let Some(slot) = state.clients.get_mut(&client) {
            slot.connected = false;
            slot.in_lobby = false;
        }
        state.send(
            client,
            TransportEvent::Disconnected {
                reason: reason.to_owned(),
            },
        );
        tracing::debug!(%client, reason, "local client disconnected");
    }
}

/// One client's handle onto a [`LocalLobby`].
pub struct LocalTransport {
    id: ClientId,
    lobby: Arc<Mutex<LobbyState>>,
}

impl TransportAdapter for LocalTransport {
    async fn connect(&self) -> Result<(), TransportError> {
        let mut state = self.lobby.lock().await;
        let slot = state
            .clients
            .get_mut(&self.id)
            .ok_or(TransportError::Shutdown)?;
        slot.connected = true;
        state.send(self.id, TransportEvent::ConnectedToMaster);
        Ok(())
    }

    async fn join_lobby(&self) -> Result<(), TransportError> {
        let mut state = self.lobby.lock().await;
        state.require_connected(self.id)?.in_lobby = true;
        let listing = state.listing();
        state.send(self.id, TransportEvent::JoinedLobby);
        state.send(self.id, TransportEvent::SessionListUpdate(listing));
        Ok(())
    }

    async fn is_authority_for_current_session(&self) -> bool {
        let state = self.lobby.lock().await;
        state.is_authority(self.id)
    }

    async fn create_session(
        &self,
        name: &SessionName,
        params: &CreationParameters,
    ) -> Result<(), TransportError> {
        let mut state = self.lobby.lock().await;
        state.require_connected(self.id)?;
        state.create(self.id, name, params);
        Ok(())
    }

    async fn set_current_session_properties(
        &self,
        update: SessionUpdate,
    ) -> Result<(), TransportError> {
        let mut state = self.lobby.lock().await;
        state.require_connected(self.id)?;
        state.update(self.id, &update);
        Ok(())
    }

    async fn join_session(
        &self,
        name: &SessionName,
    ) -> Result<(), TransportError> {
        let mut state = self.lobby.lock().await;
        state.require_connected(self.id)?;
        state.join(self.id, name);
        Ok(())
    }

    async fn leave_session(&self) -> Result<(), TransportError> {
        let mut state = self.lobby.lock().await;
        state.require_connected(self.id)?;
        let left = state
            .remove_member(self.id)
            .ok_or(TransportError::NotInSession)?;
        state.send(self.id, TransportEvent::LeftSession { name: left });
        // Leaving drops the client back onto the master connection, which
        // is reported the same way as the initial connect.
        state.send(self.id, TransportEvent::ConnectedToMaster);
        Ok(())
    }

    fn client_id(&self) -> ClientId {
        self.id
    }
}

impl Drop for LocalTransport {
    fn drop(&mut self) {
        if let Ok(mut state) = self.lobby.try_lock() {
            state.deregister(self.id);
            return;
        }
        // The registry is busy; finish on the runtime if there is one.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let lobby = Arc::clone(&self.lobby);
            let id = self.id;
            handle.spawn(async move {
                lobby.lock().await.deregister(id);
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Registry internals
// ---------------------------------------------------------------------------

#[derive(Default)]
struct LobbyState {
    next_client: u64,
    clients: HashMap<ClientId, ClientSlot>,
    /// `BTreeMap` so full listings come out in name order.
    sessions: BTreeMap<SessionName, HostedSession>,
}

struct ClientSlot {
    events: mpsc::UnboundedSender<TransportEvent>,
    connected: bool,
    in_lobby: bool,
    current: Option<SessionName>,
}

struct HostedSession {
    capacity: u32,
    visible: bool,
    open: bool,
    properties: PropertyBag,
    /// Join order. The first member is the authority.
    members: Vec<ClientId>,
}

impl HostedSession {
    fn authority(&self) -> Option<ClientId> {
        self.members.first().copied()
    }

    /// Lobby clients see every visible session. A closed one stays listed;
    /// only joining it is refused.
    fn is_listed(&self) -> bool {
        self.visible
    }

    fn is_full(&self) -> bool {
        self.members.len() >= self.capacity as usize
    }

    fn summary(&self, name: &SessionName) -> SessionSummary {
        SessionSummary {
            name: name.clone(),
            player_count: self.members.len() as u32,
            capacity: self.capacity,
            visible: self.visible,
            open: self.open,
            properties: self.properties.clone(),
            removed_from_list: false,
        }
    }

    fn removed_summary(&self, name: &SessionName) -> SessionSummary {
        SessionSummary {
            properties: PropertyBag::new(),
            removed_from_list: true,
            ..self.summary(name)
        }
    }
}

impl LobbyState {
    /// Delivers an event to one client. Silently drops if the client's
    /// receiver is gone.
    fn send(&self, client: ClientId, event: TransportEvent) {
        if let Some(slot) = self.clients.get(&client) {
            let _ = slot.events.send(event);
        }
    }

    /// Sends a one-entry list update to every client browsing the lobby.
    fn broadcast_listing(&self, summary: SessionSummary) {
        for slot in self.clients.values() {
            if slot.connected && slot.in_lobby {
                let _ = slot
                    .events
                    .send(TransportEvent::SessionListUpdate(vec![summary.clone()]));
            }
        }
    }

    fn listing(&self) -> Vec<SessionSummary> {
        self.sessions
            .iter()
            .filter(|(_, session)| session.is_listed())
            .map(|(name, session)| session.summary(name))
            .collect()
    }

    fn require_connected(
        &mut self,
        client: ClientId,
    ) -> Result<&mut ClientSlot, TransportError> {
        match self.clients.get_mut(&client) {
            Some(slot) if slot.connected => Ok(slot),
            _ => Err(TransportError::NotConnected),
        }
    }

    fn current_session(&self, client: ClientId) -> Option<&SessionName> {
        self.clients.get(&client).and_then(|slot| slot.current.as_ref())
    }

    fn is_authority(&self, client: ClientId) -> bool {
        self.current_session(client)
            .and_then(|name| self.sessions.get(name))
            .and_then(HostedSession::authority)
            == Some(client)
    }

    /// Moves `client` into `name`: leaves the lobby listing and records the
    /// current session.
    fn enter(&mut self, client: ClientId, name: &SessionName) {
        if let Some(slot) = self.clients.get_mut(&client) {
            slot.in_lobby = false;
            slot.current = Some(name.clone());
        }
        self.send(client, TransportEvent::JoinedSession { name: name.clone() });
    }

    fn create(
        &mut self,
        client: ClientId,
        name: &SessionName,
        params: &CreationParameters,
    ) {
        if self.current_session(client).is_some() {
            self.send(
                client,
                TransportEvent::CreateFailed {
                    name: name.clone(),
                    reason: JoinFailure::AlreadyInSession.to_string(),
                },
            );
            return;
        }
        if self.sessions.contains_key(name) {
            tracing::debug!(%client, session = %name, "create rejected: name taken");
            self.send(
                client,
                TransportEvent::CreateFailed {
                    name: name.clone(),
                    reason: format!("a session named {name} already exists"),
                },
            );
            return;
        }

        let session = HostedSession {
            capacity: params.capacity,
            visible: params.visible,
            open: params.open,
            properties: params.initial_properties(),
            members: vec![client],
        };
        let listed = session.is_listed().then(|| session.summary(name));
        self.sessions.insert(name.clone(), session);
        tracing::debug!(%client, session = %name, "local session created");

        self.send(client, TransportEvent::SessionCreated { name: name.clone() });
        self.enter(client, name);
        if let Some(summary) = listed {
            self.broadcast_listing(summary);
        }
    }

    fn join(&mut self, client: ClientId, name: &SessionName) {
        if let Some(reason) = self.join_failure(client, name) {
            tracing::debug!(%client, session = %name, %reason, "join rejected");
            self.send(
                client,
                TransportEvent::JoinFailed {
                    name: name.clone(),
                    reason,
                },
            );
            return;
        }

        let mut listed = None;
        if let Some(session) = self.sessions.get_mut(name) {
            session.members.push(client);
            if session.is_listed() {
                listed = Some(session.summary(name));
            }
        }
        self.enter(client, name);
        if let Some(summary) = listed {
            self.broadcast_listing(summary);
        }
    }

    fn join_failure(
        &self,
        client: ClientId,
        name: &SessionName,
    ) -> Option<JoinFailure> {
        if self.current_session(client).is_some() {
            return Some(JoinFailure::AlreadyInSession);
        }
        let Some(session) = self.sessions.get(name) else {
            return Some(JoinFailure::NotFound);
        };
        if !session.open {
            return Some(JoinFailure::Closed);
        }
        if session.is_full() {
            return Some(JoinFailure::Full);
        }
        None
    }

    fn update(&mut self, client: ClientId, update: &SessionUpdate) {
        if update.is_empty() {
            return;
        }
        let Some(name) = self.current_session(client).cloned() else {
            tracing::debug!(%client, "property update outside a session, discarded");
            return;
        };
        let Some(session) = self.sessions.get_mut(&name) else {
            return;
        };
        if session.authority() != Some(client) {
            tracing::debug!(%client, session = %name, "non-authority update discarded");
            return;
        }

        let was_listed = session.is_listed();
        if let Some(capacity) = update.capacity {
            session.capacity = capacity;
        }
        if let Some(visible) = update.visible {
            session.visible = visible;
        }
        if let Some(open) = update.open {
            session.open = open;
        }
        session.properties.merge(&update.properties);

        let change = if session.is_listed() {
            Some(session.summary(&name))
        } else if was_listed {
            Some(session.removed_summary(&name))
        } else {
            None
        };
        if let Some(summary) = change {
            self.broadcast_listing(summary);
        }
    }

    /// Drops `client` entirely: leaves its session, then removes its slot
    /// so the event sender is released.
    fn deregister(&mut self, client: ClientId) {
        self.remove_member(client);
        if self.clients.remove(&client).is_some() {
            tracing::debug!(%client, "local client deregistered");
        }
    }

    /// Takes `client` out of its current session, handing off authority
    /// and closing the session if it empties. Returns the session left.
    fn remove_member(&mut self, client: ClientId) -> Option<SessionName> {
        let name = self.clients.get_mut(&client)?.current.take()?;
        let Some(session) = self.sessions.get_mut(&name) else {
            return Some(name);
        };

        let was_authority = session.authority() == Some(client);
        session.members.retain(|member| *member != client);

        if session.members.is_empty() {
            let removed = session.is_listed().then(|| session.removed_summary(&name));
            self.sessions.remove(&name);
            tracing::debug!(session = %name, "local session closed (empty)");
            if let Some(summary) = removed {
                self.broadcast_listing(summary);
            }
            return Some(name);
        }

        let handoff = if was_authority { session.authority() } else { None };
        let members = session.members.clone();
        let listed = session.is_listed().then(|| session.summary(&name));

        if let Some(authority) = handoff {
            tracing::debug!(session = %name, %authority, "authority handed off");
            for member in members {
                self.send(
                    member,
                    TransportEvent::AuthorityChanged {
                        name: name.clone(),
                        authority,
                    },
                );
            }
        }
        if let Some(summary) = listed {
            self.broadcast_listing(summary);
        }
        Some(name)
    }
}
