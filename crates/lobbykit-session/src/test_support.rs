//! A recording transport for unit tests.
//!
//! `MockTransport` never talks to anything. It records every call it
//! receives so tests can assert on exactly what reached the transport, and
//! it lets tests flip the authority flag between calls.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use lobbykit_protocol::{ClientId, CreationParameters, SessionName, SessionUpdate};
use lobbykit_transport::{TransportAdapter, TransportError};

#[derive(Default)]
pub(crate) struct MockTransport {
    authority: AtomicBool,
    /// When set, authority is reported for this many more queries only.
    authority_budget: Mutex<Option<usize>>,
    disconnected: AtomicBool,
    pub(crate) authority_queries: AtomicUsize,
    pub(crate) updates: Mutex<Vec<SessionUpdate>>,
    pub(crate) joins: Mutex<Vec<SessionName>>,
    pub(crate) creates: Mutex<Vec<(SessionName, CreationParameters)>>,
}

impl MockTransport {
    pub(crate) fn with_authority(authority: bool) -> Self {
        let mock = Self::default();
        mock.set_authority(authority);
        mock
    }

    pub(crate) fn set_authority(&self, authority: bool) {
        self.authority.store(authority, Ordering::SeqCst);
    }

    /// Authority holds for the next `queries` checks, then is lost.
    pub(crate) fn revoke_authority_after(&self, queries: usize) {
        self.set_authority(true);
        *self.authority_budget.lock().unwrap() = Some(queries);
    }

    /// Makes every network call fail with `NotConnected`.
    pub(crate) fn disconnect(&self) {
        self.disconnected.store(true, Ordering::SeqCst);
    }

    pub(crate) fn updates(&self) -> Vec<SessionUpdate> {
        self.updates.lock().unwrap().clone()
    }

    pub(crate) fn joins(&self) -> Vec<SessionName> {
        self.joins.lock().unwrap().clone()
    }

    pub(crate) fn creates(&self) -> Vec<(SessionName, CreationParameters)> {
        self.creates.lock().unwrap().clone()
    }

    fn check_connected(&self) -> Result<(), TransportError> {
        if self.disconnected.load(Ordering::SeqCst) {
            Err(TransportError::NotConnected)
        } else {
            Ok(())
        }
    }
}

impl TransportAdapter for MockTransport {
    async fn connect(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn join_lobby(&self) -> Result<(), TransportError> {
        self.check_connected()
    }

    async fn is_authority_for_current_session(&self) -> bool {
        self.authority_queries.fetch_add(1, Ordering::SeqCst);
        let mut budget = self.authority_budget.lock().unwrap();
        if let Some(remaining) = budget.as_mut() {
            if *remaining == 0 {
                self.authority.store(false, Ordering::SeqCst);
            } else {
                *remaining -= 1;
            }
        }
        self.authority.load(Ordering::SeqCst)
    }

    async fn create_session(
        &self,
        name: &SessionName,
        params: &CreationParameters,
    ) -> Result<(), TransportError> {
        self.check_connected()?;
        self.creates
            .lock()
            .unwrap()
            .push((name.clone(), params.clone()));
        Ok(())
    }

    async fn set_current_session_properties(
        &self,
        update: SessionUpdate,
    ) -> Result<(), TransportError> {
        self.check_connected()?;
        self.updates.lock().unwrap().push(update);
        Ok(())
    }

    async fn join_session(&self, name: &SessionName) -> Result<(), TransportError> {
        self.check_connected()?;
        self.joins.lock().unwrap().push(name.clone());
        Ok(())
    }

    async fn leave_session(&self) -> Result<(), TransportError> {
        self.check_connected()
    }

    fn client_id(&self) -> ClientId {
        ClientId::new(1)
    }
}
