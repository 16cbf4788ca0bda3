//! Session creation and authority-gated mutation of the current session.
//!
//! Creating a session is open to anyone. Changing one is not: every setter
//! here goes through the authority gate first, and only the authority
//! client's calls ever reach
//! [`TransportAdapter::set_current_session_properties`].

use std::sync::Arc;

use lobbykit_protocol::{CreationParameters, SessionKind, SessionName, SessionUpdate};
use lobbykit_transport::TransportAdapter;

use crate::authority::{self, Gate};
use crate::{MatchmakingConfig, SessionError};

/// Capacity enforced by the single-occupant policy.
const SINGLE_OCCUPANT_CAPACITY: u32 = 1;

/// Builds sessions and changes the settings of the current one.
pub struct SessionConfigurator<T: TransportAdapter> {
    transport: Arc<T>,
    config: MatchmakingConfig,
}

impl<T: TransportAdapter> SessionConfigurator<T> {
    /// Creates a configurator that talks to `transport`.
    pub fn new(transport: Arc<T>, config: MatchmakingConfig) -> Self {
        Self { transport, config }
    }

    // -- Creation --------------------------------------------------------

    /// Derives creation parameters for `kind`.
    ///
    /// `None` capacity falls back to `config.default_capacity`. Pure: no
    /// transport call, no validation.
    pub fn build_creation_parameters(
        &self,
        kind: SessionKind,
        capacity: Option<u32>,
        password: &str,
    ) -> CreationParameters {
        CreationParameters::for_kind(
            kind,
            capacity.unwrap_or(self.config.default_capacity),
            password,
        )
    }

    /// Asks the transport to register a session named `name`.
    ///
    /// A name collision is not reported here; it arrives later as
    /// [`TransportEvent::CreateFailed`](lobbykit_transport::TransportEvent::CreateFailed).
    pub async fn create_session(
        &self,
        name: &SessionName,
        params: &CreationParameters,
    ) -> Result<(), SessionError> {
        tracing::info!(
            session = %name,
            capacity = params.capacity,
            visible = params.visible,
            open = params.open,
            "requesting session creation"
        );
        self.transport.create_session(name, params).await?;
        Ok(())
    }

    /// Creates a hidden, closed, capacity-1 session.
    pub async fn create_single_session(
        &self,
        name: &SessionName,
    ) -> Result<(), SessionError> {
        let params = self.build_creation_parameters(SessionKind::Single, None, "");
        self.create_session(name, &params).await
    }

    /// Creates a listed, open session gated by `password`.
    pub async fn create_multi_session(
        &self,
        name: &SessionName,
        password: &str,
        capacity: Option<u32>,
    ) -> Result<(), SessionError> {
        let params =
            self.build_creation_parameters(SessionKind::Multi, capacity, password);
        self.create_session(name, &params).await
    }

    // -- Authority-gated setters ------------------------------------------

    /// Sets the current session's capacity.
    pub async fn set_capacity(&self, n: u32) -> Result<(), SessionError> {
        self.mutate("set_capacity", SessionUpdate::capacity(n)).await
    }

    /// Lists or hides the current session.
    pub async fn set_visible(&self, visible: bool) -> Result<(), SessionError> {
        self.mutate("set_visible", SessionUpdate::visible(visible)).await
    }

    /// Opens or closes the current session to new joiners.
    pub async fn set_open(&self, open: bool) -> Result<(), SessionError> {
        self.mutate("set_open", SessionUpdate::open(open)).await
    }

    /// Publishes a new password for the current session.
    pub async fn set_password(&self, password: &str) -> Result<(), SessionError> {
        self.mutate("set_password", SessionUpdate::password(password)).await
    }

    /// Open, then visible.
    pub async fn make_public(&self) -> Result<(), SessionError> {
        self.set_open(true).await?;
        self.set_visible(true).await
    }

    /// Closed, then hidden.
    pub async fn make_private(&self) -> Result<(), SessionError> {
        self.set_open(false).await?;
        self.set_visible(false).await
    }

    // -- Policies ----------------------------------------------------------

    /// Private, capacity 1.
    ///
    /// A sequence of separate mutations, not a transaction. If authority is
    /// lost part-way, the steps already sent stay applied.
    pub async fn apply_single_occupant_policy(&self) -> Result<(), SessionError> {
        if let Gate::Closed(outcome) = self.gate("apply_single_occupant_policy").await {
            return outcome;
        }
        self.make_private().await?;
        self.set_capacity(SINGLE_OCCUPANT_CAPACITY).await
    }

    /// Public, capacity `config.multi_policy_capacity`.
    ///
    /// Same non-atomic composition as
    /// [`apply_single_occupant_policy`](Self::apply_single_occupant_policy).
    pub async fn apply_multi_occupant_policy(&self) -> Result<(), SessionError> {
        if let Gate::Closed(outcome) = self.gate("apply_multi_occupant_policy").await {
            return outcome;
        }
        self.make_public().await?;
        self.set_capacity(self.config.multi_policy_capacity).await
    }

    // -- Internals ---------------------------------------------------------

    async fn gate(&self, operation: &'static str) -> Gate {
        authority::check(&*self.transport, self.config.unauthorized, operation).await
    }

    /// Checks authority, then sends exactly one patch.
    async fn mutate(
        &self,
        operation: &'static str,
        update: SessionUpdate,
    ) -> Result<(), SessionError> {
        if let Gate::Closed(outcome) = self.gate(operation).await {
            return outcome;
        }
        tracing::debug!(operation, ?update, "updating current session");
        self.transport.set_current_session_properties(update).await?;
        Ok(())
    }
}
