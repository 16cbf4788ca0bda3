/// Errors a transport can report synchronously, at call time.
///
/// Failures that only become known after a network round trip (a name
/// collision on create, a full session on join) are not errors here. They
/// arrive later on the event feed as
/// [`TransportEvent`](crate::TransportEvent)s.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The client hasn't connected (or has been disconnected).
    #[error("not connected to the transport")]
    NotConnected,

    /// The operation needs a current session and the client has none.
    #[error("not in a session")]
    NotInSession,

    /// The transport was shut down.
    #[error("transport shut down")]
    Shutdown,
}
