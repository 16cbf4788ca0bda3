//! A host and a guest sharing an in-memory lobby.
//!
//! Run with `RUST_LOG=debug cargo run -p local-lobby` to see every
//! transport event.

use std::sync::Arc;

use lobbykit::prelude::*;
use tokio::sync::mpsc::UnboundedReceiver;

type Events = UnboundedReceiver<TransportEvent>;

// ---------------------------------------------------------------------------
// Plumbing
// ---------------------------------------------------------------------------

async fn start_client(
    lobby: &LocalLobby,
) -> Result<(Arc<Matchmaker<LocalTransport>>, Events), LobbykitError> {
    let (transport, feed) = lobby.client().await;
    let matchmaker = Arc::new(MatchmakerBuilder::new().build(transport)?);
    let (_pump, mut events) = Matchmaker::spawn_event_pump(&matchmaker, feed);

    matchmaker.connect().await?;
    wait_for(&mut events, |e| matches!(e, TransportEvent::JoinedLobby)).await;
    Ok((matchmaker, events))
}

/// Skips forwarded events until one matches.
async fn wait_for(
    events: &mut Events,
    pred: impl Fn(&TransportEvent) -> bool,
) -> Option<TransportEvent> {
    while let Some(event) = events.recv().await {
        if pred(&event) {
            return Some(event);
        }
    }
    None
}

fn listed(event: &TransportEvent, session: &str) -> bool {
    matches!(
        event,
        TransportEvent::SessionListUpdate(summaries)
            if summaries.iter().any(|s| s.name.as_str() == session)
    )
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    lobbykit::init_tracing("info");

    let lobby = LocalLobby::new();
    let (host, mut host_events) = start_client(&lobby).await?;
    let (guest, mut guest_events) = start_client(&lobby).await?;
    let room = SessionName::from("Alpha");

    host.create_multi_session(&room, "x1", None).await?;
    wait_for(&mut host_events, |e| matches!(e, TransportEvent::JoinedSession { .. })).await;
    wait_for(&mut guest_events, |e| listed(e, "Alpha")).await;

    for (round, attempt) in ["wrong", "x1"].into_iter().enumerate() {
        let accepted = guest.try_join(&room, attempt).await?;
        tracing::info!(round, accepted, "guest tried to join");
    }
    wait_for(&mut guest_events, |e| matches!(e, TransportEvent::JoinedSession { .. })).await;

    match guest.apply_single_occupant_policy().await {
        Err(e) if e.is_unauthorized() => tracing::info!("guest was refused: {e}"),
        other => other?,
    }

    host.apply_single_occupant_policy().await?;
    if let Some(session) = lobby.session("Alpha").await {
        tracing::info!(
            capacity = session.capacity,
            visible = session.visible,
            open = session.open,
            players = session.player_count,
            "host locked the session"
        );
    }

    Ok(())
}
