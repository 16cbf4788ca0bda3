//! `Matchmaker` builder, facade, and transport event pump.
//!
//! This is the entry point for application code. It ties the layers
//! together: transport events → credential cache → join coordinator, with
//! the session configurator talking to the transport directly.
//!
//! There is no global instance. Build one `Matchmaker` at startup, wrap it
//! in an `Arc`, and hand clones to whoever needs it.

use std::sync::{Arc, Weak};

use lobbykit_protocol::{ClientId, CreationParameters, SessionKind, SessionName};
use lobbykit_session::{
    CredentialCache, JoinCoordinator, MatchmakingConfig, SessionConfigurator,
    SharedCredentials,
};
use lobbykit_transport::{TransportAdapter, TransportEvent};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{LobbykitError, MatchmakerConfig};

/// Builder for configuring a [`Matchmaker`].
///
/// # Example
///
/// ```rust,ignore
/// let matchmaker = MatchmakerBuilder::new()
///     .auto_join_lobby(false)
///     .build(transport)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct MatchmakerBuilder {
    config: MatchmakerConfig,
}

impl MatchmakerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration (e.g. one loaded from a file).
    pub fn config(mut self, config: MatchmakerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the session-layer configuration.
    pub fn matchmaking(mut self, matchmaking: MatchmakingConfig) -> Self {
        self.config.matchmaking = matchmaking;
        self
    }

    /// Sets whether the lobby is joined automatically after connecting.
    pub fn auto_join_lobby(mut self, enabled: bool) -> Self {
        self.config.auto_join_lobby = enabled;
        self
    }

    /// Validates the configuration and builds a matchmaker over `transport`.
    pub fn build<T: TransportAdapter>(
        self,
        transport: T,
    ) -> Result<Matchmaker<T>, LobbykitError> {
        self.config.validate()?;

        let transport = Arc::new(transport);
        let credentials = CredentialCache::shared();
        let configurator = SessionConfigurator::new(
            Arc::clone(&transport),
            self.config.matchmaking.clone(),
        );
        let joiner = JoinCoordinator::new(Arc::clone(&transport), Arc::clone(&credentials));

        Ok(Matchmaker {
            transport,
            credentials,
            configurator,
            joiner,
            config: self.config,
        })
    }
}

/// Client-side matchmaking over a [`TransportAdapter`].
pub struct Matchmaker<T: TransportAdapter> {
    transport: Arc<T>,
    credentials: SharedCredentials,
    configurator: SessionConfigurator<T>,
    joiner: JoinCoordinator<T>,
    config: MatchmakerConfig,
}

impl<T: TransportAdapter> Matchmaker<T> {
    /// This client's identity on the service.
    pub fn client_id(&self) -> ClientId {
        self.transport.client_id()
    }

    // -- Event handling ----------------------------------------------------

    /// Applies one transport event to local state.
    ///
    /// - `SessionListUpdate` is folded into the credential cache.
    /// - `ConnectedToMaster` joins the lobby when `auto_join_lobby` is set.
    /// - Failures reported by the transport are logged; nothing is retried.
    pub async fn handle_event(&self, event: &TransportEvent) -> Result<(), LobbykitError> {
        match event {
            TransportEvent::ConnectedToMaster => {
                tracing::info!(client = %self.client_id(), "connected to master");
                if self.config.auto_join_lobby {
                    self.transport.join_lobby().await?;
                }
            }
            TransportEvent::SessionListUpdate(summaries) => {
                let mut credentials = self.credentials.write().await;
                credentials.on_session_list_update(summaries);
                tracing::debug!(
                    updated = summaries.len(),
                    cached = credentials.len(),
                    "session list updated"
                );
            }
            TransportEvent::CreateFailed { name, reason } => {
                tracing::warn!(session = %name, %reason, "session creation failed");
            }
            TransportEvent::JoinFailed { name, reason } => {
                tracing::warn!(session = %name, %reason, "join failed");
            }
            TransportEvent::Disconnected { reason } => {
                tracing::warn!(%reason, "disconnected from transport");
            }
            TransportEvent::JoinedSession { name } => {
                tracing::info!(session = %name, "joined session");
            }
            other => {
                tracing::debug!(event = other.kind(), "transport event");
            }
        }
        Ok(())
    }

    /// Spawns a task that drains `events`, applies each one with
    /// [`handle_event`](Self::handle_event), then forwards it to the
    /// returned receiver for the application to react to.
    ///
    /// The task holds only a weak reference to the matchmaker. It ends when
    /// the transport closes its feed or when the last `Arc` is dropped.
    /// Errors from handling an event are logged and don't stop the pump. If
    /// the application drops its receiver, events are still applied.
    ///
    /// Call it as `Matchmaker::spawn_event_pump(&mm, events)`.
    pub fn spawn_event_pump(
        this: &Arc<Self>,
        mut events: mpsc::UnboundedReceiver<TransportEvent>,
    ) -> (JoinHandle<()>, mpsc::UnboundedReceiver<TransportEvent>) {
        let (app_tx, app_rx) = mpsc::unbounded_channel();
        let weak: Weak<Self> = Arc::downgrade(this);
        let client = this.client_id();

        let handle = tokio::spawn(async move {
            tracing::info!(%client, "event pump started");
            while let Some(event) = events.recv().await {
                let Some(matchmaker) = weak.upgrade() else {
                    break;
                };
                if let Err(e) = matchmaker.handle_event(&event).await {
                    tracing::error!(
                        event = event.kind(),
                        error = %e,
                        "failed to handle transport event"
                    );
                }
                drop(matchmaker);
                let _ = app_tx.send(event);
            }
            tracing::info!(%client, "event pump stopped");
        });

        (handle, app_rx)
    }

    // -- Connection (pass-through) -----------------------------------------

    /// Starts connecting to the service.
    pub async fn connect(&self) -> Result<(), LobbykitError> {
        self.transport.connect().await?;
        Ok(())
    }

    /// Subscribes to lobby discovery.
    pub async fn join_lobby(&self) -> Result<(), LobbykitError> {
        self.transport.join_lobby().await?;
        Ok(())
    }

    /// Leaves the current session.
    pub async fn leave_session(&self) -> Result<(), LobbykitError> {
        self.transport.leave_session().await?;
        Ok(())
    }

    /// Point-in-time authority query for the current session.
    pub async fn is_authority(&self) -> bool {
        self.transport.is_authority_for_current_session().await
    }

    // -- Discovery ---------------------------------------------------------

    /// Returns the password last advertised for `name`, if any.
    pub async fn lookup_password(&self, name: &str) -> Option<String> {
        self.credentials.read().await.lookup(name).map(str::to_owned)
    }

    // -- Creation ----------------------------------------------------------

    /// See [`SessionConfigurator::build_creation_parameters`].
    pub fn build_creation_parameters(
        &self,
        kind: SessionKind,
        capacity: Option<u32>,
        password: &str,
    ) -> CreationParameters {
        self.configurator
            .build_creation_parameters(kind, capacity, password)
    }

    /// Asks the transport to register a session.
    pub async fn create_session(
        &self,
        name: &SessionName,
        params: &CreationParameters,
    ) -> Result<(), LobbykitError> {
        self.configurator.create_session(name, params).await?;
        Ok(())
    }

    /// Creates a hidden, closed, capacity-1 session.
    pub async fn create_single_session(&self, name: &SessionName) -> Result<(), LobbykitError> {
        self.configurator.create_single_session(name).await?;
        Ok(())
    }

    /// Creates a listed, open, password-gated session.
    pub async fn create_multi_session(
        &self,
        name: &SessionName,
        password: &str,
        capacity: Option<u32>,
    ) -> Result<(), LobbykitError> {
        self.configurator
            .create_multi_session(name, password, capacity)
            .await?;
        Ok(())
    }

    // -- Joining -----------------------------------------------------------

    /// See [`JoinCoordinator::try_join`]. `Ok(true)` means "attempted".
    pub async fn try_join(
        &self,
        name: &SessionName,
        supplied_password: &str,
    ) -> Result<bool, LobbykitError> {
        Ok(self.joiner.try_join(name, supplied_password).await?)
    }

    // -- Authority-gated mutation ------------------------------------------

    /// Sets the current session's capacity. Authority only.
    pub async fn set_capacity(&self, n: u32) -> Result<(), LobbykitError> {
        self.configurator.set_capacity(n).await?;
        Ok(())
    }

    /// Lists or hides the current session. Authority only.
    pub async fn set_visible(&self, visible: bool) -> Result<(), LobbykitError> {
        self.configurator.set_visible(visible).await?;
        Ok(())
    }

    /// Opens or closes the current session to joiners. Authority only.
    pub async fn set_open(&self, open: bool) -> Result<(), LobbykitError> {
        self.configurator.set_open(open).await?;
        Ok(())
    }

    /// Publishes a new password for the current session. Authority only.
    pub async fn set_password(&self, password: &str) -> Result<(), LobbykitError> {
        self.configurator.set_password(password).await?;
        Ok(())
    }

    /// Opens, then lists, the current session.
    pub async fn make_public(&self) -> Result<(), LobbykitError> {
        self.configurator.make_public().await?;
        Ok(())
    }

    /// Closes, then hides, the current session.
    pub async fn make_private(&self) -> Result<(), LobbykitError> {
        self.configurator.make_private().await?;
        Ok(())
    }

    /// Private with capacity 1.
    pub async fn apply_single_occupant_policy(&self) -> Result<(), LobbykitError> {
        self.configurator.apply_single_occupant_policy().await?;
        Ok(())
    }

    /// Public with the configured multi-occupant capacity.
    pub async fn apply_multi_occupant_policy(&self) -> Result<(), LobbykitError> {
        self.configurator.apply_multi_occupant_policy().await?;
        Ok(())
    }
}
