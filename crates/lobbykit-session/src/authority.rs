//! The authority gate shared by every privileged mutation.
//!
//! Authority is owned by the transport. We ask for it right before each
//! mutation and never remember the answer, so an authority handoff on the
//! service side is picked up by the very next call.

use lobbykit_transport::TransportAdapter;

use crate::{SessionError, UnauthorizedMutation};

/// Result of asking the gate whether a mutation may proceed.
#[derive(Debug)]
pub(crate) enum Gate {
    /// This client is the authority; go ahead.
    Open,
    /// Not the authority. Carries what the caller should return.
    Closed(Result<(), SessionError>),
}

/// Checks authority for `operation` and decides what a refusal looks like.
pub(crate) async fn check<T: TransportAdapter>(
    transport: &T,
    policy: UnauthorizedMutation,
    operation: &'static str,
) -> Gate {
    if transport.is_authority_for_current_session().await {
        return Gate::Open;
    }

    tracing::debug!(
        client = %transport.client_id(),
        operation,
        "privileged mutation refused: not the session authority"
    );
    match policy {
        UnauthorizedMutation::Reject => Gate::Closed(Err(SessionError::Unauthorized)),
        UnauthorizedMutation::Ignore => Gate::Closed(Ok(())),
    }
}
