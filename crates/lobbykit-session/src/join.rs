//! Password-gated joining.
//!
//! A join attempt is checked against the credential cache before anything
//! goes over the network. An unknown session and a wrong password look the
//! same from here: both are a plain `false`, and no round trip is spent.

use std::sync::Arc;

use lobbykit_protocol::SessionName;
use lobbykit_transport::TransportAdapter;

use crate::{SessionError, SharedCredentials};

/// Validates join attempts locally, then delegates to the transport.
pub struct JoinCoordinator<T: TransportAdapter> {
    transport: Arc<T>,
    credentials: SharedCredentials,
}

impl<T: TransportAdapter> JoinCoordinator<T> {
    /// Creates a coordinator reading from `credentials`.
    pub fn new(transport: Arc<T>, credentials: SharedCredentials) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    /// Attempts to join `name` with `supplied_password`.
    ///
    /// - `Ok(false)`: no cached password for `name`, or it differs from
    ///   `supplied_password` (exact, case-sensitive). Nothing was sent.
    /// - `Ok(true)`: exactly one join request went to the transport. This
    ///   means "attempted", not "joined". The outcome arrives as
    ///   `JoinedSession` or `JoinFailed` on the event feed.
    /// - `Err`: the transport refused the request at call time.
    ///
    /// A session that never published a password can't be joined this
    /// way, even with an empty `supplied_password`.
    pub async fn try_join(
        &self,
        name: &SessionName,
        supplied_password: &str,
    ) -> Result<bool, SessionError> {
        // Compare under the read lock, release it before the transport call.
        let accepted = {
            let credentials = self.credentials.read().await;
            credentials.lookup(name.as_str()) == Some(supplied_password)
        };

        if !accepted {
            tracing::info!(
                session = %name,
                "incorrect password or session does not exist"
            );
            return Ok(false);
        }

        tracing::info!(session = %name, "password accepted, requesting join");
        self.transport.join_session(name).await?;
        Ok(true)
    }
}
