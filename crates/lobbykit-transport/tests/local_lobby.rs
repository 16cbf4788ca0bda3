//! Integration tests for the in-memory lobby.
//!
//! `LocalTransport` pushes events onto the feed while it still holds the
//! lobby lock, so by the time a call returns its events are already
//! queued. That lets these tests drain the feed with `try_recv` instead of
//! waiting on timers.

#[cfg(feature = "local")]
mod local {
    use lobbykit_protocol::{CreationParameters, SessionName, SessionUpdate};
    use lobbykit_transport::{
        JoinFailure, LocalLobby, LocalTransport, TransportAdapter, TransportError,
        TransportEvent,
    };
    use tokio::sync::mpsc::UnboundedReceiver;

    /// Helper: drains every event currently queued on a feed.
    fn drain(rx: &mut UnboundedReceiver<TransportEvent>) -> Vec<TransportEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Helper: a client that has connected and joined the lobby, with its
    /// feed already drained.
    async fn lobby_client(
        lobby: &LocalLobby,
    ) -> (LocalTransport, UnboundedReceiver<TransportEvent>) {
        let (transport, mut rx) = lobby.client().await;
        transport.connect().await.unwrap();
        transport.join_lobby().await.unwrap();
        drain(&mut rx);
        (transport, rx)
    }

    fn name(s: &str) -> SessionName {
        SessionName::from(s)
    }

    #[tokio::test]
    async fn test_connect_emits_connected_to_master() {
        let lobby = LocalLobby::new();
        let (transport, mut rx) = lobby.client().await;

        transport.connect().await.unwrap();

        assert_eq!(drain(&mut rx), vec![TransportEvent::ConnectedToMaster]);
    }

    #[tokio::test]
    async fn test_join_lobby_requires_connection() {
        let lobby = LocalLobby::new();
        let (transport, _rx) = lobby.client().await;

        let result = transport.join_lobby().await;

        assert!(matches!(result, Err(TransportError::NotConnected)));
    }

    #[tokio::test]
    async fn test_join_lobby_delivers_full_listing_of_visible_sessions() {
        let lobby = LocalLobby::new();
        let (host_a, _a) = lobby_client(&lobby).await;
        let (host_b, _b) = lobby_client(&lobby).await;
        host_a
            .create_session(&name("Alpha"), &CreationParameters::multi(5, "x1"))
            .await
            .unwrap();
        host_b
            .create_session(&name("Solo"), &CreationParameters::single())
            .await
            .unwrap();

        let (browser, mut rx) = lobby.client().await;
        browser.connect().await.unwrap();
        browser.join_lobby().await.unwrap();

        let events = drain(&mut rx);
        assert_eq!(events[1], TransportEvent::JoinedLobby);
        let TransportEvent::SessionListUpdate(listing) = &events[2] else {
            panic!("expected a listing, got {:?}", events[2]);
        };
        assert_eq!(listing.len(), 1, "single sessions are hidden");
        assert_eq!(listing[0].name, name("Alpha"));
        assert_eq!(listing[0].password(), Some("x1"));
    }

    #[tokio::test]
    async fn test_create_makes_creator_authority_and_broadcasts() {
        let lobby = LocalLobby::new();
        let (host, mut host_rx) = lobby_client(&lobby).await;
        let (_browser, mut browser_rx) = lobby_client(&lobby).await;

        host.create_session(&name("Alpha"), &CreationParameters::multi(4, "pw"))
            .await
            .unwrap();

        assert_eq!(
            drain(&mut host_rx),
            vec![
                TransportEvent::SessionCreated { name: name("Alpha") },
                TransportEvent::JoinedSession { name: name("Alpha") },
            ]
        );
        assert!(host.is_authority_for_current_session().await);
        assert_eq!(lobby.authority_of("Alpha").await, Some(host.client_id()));

        let events = drain(&mut browser_rx);
        assert_eq!(events.len(), 1);
        let TransportEvent::SessionListUpdate(update) = &events[0] else {
            panic!("expected a list update");
        };
        assert_eq!(update[0].capacity, 4);
        assert_eq!(update[0].player_count, 1);
    }

    #[tokio::test]
    async fn test_create_with_taken_name_reports_create_failed() {
        let lobby = LocalLobby::new();
        let (first, _first_rx) = lobby_client(&lobby).await;
        let (second, mut second_rx) = lobby_client(&lobby).await;
        first
            .create_session(&name("Alpha"), &CreationParameters::multi(5, ""))
            .await
            .unwrap();
        drain(&mut second_rx);

        // The call itself succeeds; the failure arrives on the feed.
        second
            .create_session(&name("Alpha"), &CreationParameters::multi(5, ""))
            .await
            .unwrap();

        let events = drain(&mut second_rx);
        assert!(matches!(
            &events[..],
            [TransportEvent::CreateFailed { name: n, .. }] if *n == name("Alpha")
        ));
        assert_eq!(lobby.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_join_outcomes_are_reported_on_the_feed() {
        let lobby = LocalLobby::new();
        let (host, _host_rx) = lobby_client(&lobby).await;
        let (guest, mut guest_rx) = lobby_client(&lobby).await;

        guest.join_session(&name("Nowhere")).await.unwrap();
        assert_eq!(
            drain(&mut guest_rx),
            vec![TransportEvent::JoinFailed {
                name: name("Nowhere"),
                reason: JoinFailure::NotFound,
            }]
        );

        host.create_session(&name("Alpha"), &CreationParameters::multi(5, ""))
            .await
            .unwrap();
        drain(&mut guest_rx);
        guest.join_session(&name("Alpha")).await.unwrap();

        assert_eq!(
            drain(&mut guest_rx),
            vec![TransportEvent::JoinedSession { name: name("Alpha") }]
        );
        assert!(!guest.is_authority_for_current_session().await);
        assert_eq!(lobby.session("Alpha").await.unwrap().player_count, 2);
    }

    #[tokio::test]
    async fn test_join_full_and_closed_sessions_fail() {
        let lobby = LocalLobby::new();
        let (host, _host_rx) = lobby_client(&lobby).await;
        let (guest, mut guest_rx) = lobby_client(&lobby).await;
        let (solo, _solo_rx) = lobby_client(&lobby).await;

        host.create_session(&name("Pair"), &CreationParameters::multi(1, ""))
            .await
            .unwrap();
        solo.create_session(&name("Solo"), &CreationParameters::single())
            .await
            .unwrap();
        drain(&mut guest_rx);

        guest.join_session(&name("Pair")).await.unwrap();
        guest.join_session(&name("Solo")).await.unwrap();

        assert_eq!(
            drain(&mut guest_rx),
            vec![
                TransportEvent::JoinFailed {
                    name: name("Pair"),
                    reason: JoinFailure::Full,
                },
                TransportEvent::JoinFailed {
                    name: name("Solo"),
                    reason: JoinFailure::Closed,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_non_authority_update_is_silently_discarded() {
        let lobby = LocalLobby::new();
        let (host, _host_rx) = lobby_client(&lobby).await;
        let (guest, _guest_rx) = lobby_client(&lobby).await;
        host.create_session(&name("Alpha"), &CreationParameters::multi(5, "pw"))
            .await
            .unwrap();
        guest.join_session(&name("Alpha")).await.unwrap();

        let result = guest
            .set_current_session_properties(SessionUpdate::capacity(2))
            .await;

        assert!(result.is_ok());
        assert_eq!(lobby.session("Alpha").await.unwrap().capacity, 5);
    }

    #[tokio::test]
    async fn test_authority_update_applies_and_hiding_broadcasts_removal() {
        let lobby = LocalLobby::new();
        let (host, _host_rx) = lobby_client(&lobby).await;
        let (_browser, mut browser_rx) = lobby_client(&lobby).await;
        host.create_session(&name("Alpha"), &CreationParameters::multi(5, "pw"))
            .await
            .unwrap();
        drain(&mut browser_rx);

        host.set_current_session_properties(SessionUpdate::password("new"))
            .await
            .unwrap();
        host.set_current_session_properties(SessionUpdate::visible(false))
            .await
            .unwrap();

        let events = drain(&mut browser_rx);
        assert_eq!(events.len(), 2);
        let TransportEvent::SessionListUpdate(changed) = &events[0] else {
            panic!("expected a list update");
        };
        assert_eq!(changed[0].password(), Some("new"));
        let TransportEvent::SessionListUpdate(removed) = &events[1] else {
            panic!("expected a list update");
        };
        assert!(removed[0].removed_from_list);
        assert!(!lobby.session("Alpha").await.unwrap().visible);
    }

    #[tokio::test]
    async fn test_authority_hands_off_when_master_leaves() {
        let lobby = LocalLobby::new();
        let (host, mut host_rx) = lobby_client(&lobby).await;
        let (guest, mut guest_rx) = lobby_client(&lobby).await;
        host.create_session(&name("Alpha"), &CreationParameters::multi(5, ""))
            .await
            .unwrap();
        guest.join_session(&name("Alpha")).await.unwrap();
        drain(&mut host_rx);
        drain(&mut guest_rx);

        host.leave_session().await.unwrap();

        assert_eq!(
            drain(&mut host_rx),
            vec![
                TransportEvent::LeftSession { name: name("Alpha") },
                TransportEvent::ConnectedToMaster,
            ]
        );
        assert_eq!(
            drain(&mut guest_rx),
            vec![TransportEvent::AuthorityChanged {
                name: name("Alpha"),
                authority: guest.client_id(),
            }]
        );
        assert!(guest.is_authority_for_current_session().await);
        assert!(!host.is_authority_for_current_session().await);
    }

    #[tokio::test]
    async fn test_last_member_leaving_closes_session() {
        let lobby = LocalLobby::new();
        let (host, _host_rx) = lobby_client(&lobby).await;
        let (_browser, mut browser_rx) = lobby_client(&lobby).await;
        host.create_session(&name("Alpha"), &CreationParameters::multi(5, "pw"))
            .await
            .unwrap();
        drain(&mut browser_rx);

        host.leave_session().await.unwrap();

        assert_eq!(lobby.session_count().await, 0);
        let events = drain(&mut browser_rx);
        let [TransportEvent::SessionListUpdate(removed)] = &events[..] else {
            panic!("expected one removal update, got {events:?}");
        };
        assert!(removed[0].removed_from_list);
        assert_eq!(removed[0].password(), None);
    }

    #[tokio::test]
    async fn test_leave_without_session_is_an_error() {
        let lobby = LocalLobby::new();
        let (client, _rx) = lobby_client(&lobby).await;

        let result = client.leave_session().await;

        assert!(matches!(result, Err(TransportError::NotInSession)));
    }

    #[tokio::test]
    async fn test_disconnect_hands_off_and_blocks_further_calls() {
        let lobby = LocalLobby::new();
        let (host, mut host_rx) = lobby_client(&lobby).await;
        let (guest, _guest_rx) = lobby_client(&lobby).await;
        host.create_session(&name("Alpha"), &CreationParameters::multi(5, ""))
            .await
            .unwrap();
        guest.join_session(&name("Alpha")).await.unwrap();
        drain(&mut host_rx);

        lobby.disconnect(host.client_id(), "network lost").await;

        assert_eq!(
            drain(&mut host_rx),
            vec![TransportEvent::Disconnected {
                reason: "network lost".into(),
            }]
        );
        assert_eq!(lobby.authority_of("Alpha").await, Some(guest.client_id()));
        assert!(matches!(
            host.join_session(&name("Alpha")).await,
            Err(TransportError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_closed_session_stays_listed_but_refuses_joins() {
        let lobby = LocalLobby::new();
        let (host, _host_rx) = lobby_client(&lobby).await;
        let (guest, mut guest_rx) = lobby_client(&lobby).await;
        host.create_session(&name("Alpha"), &CreationParameters::multi(5, "pw"))
            .await
            .unwrap();
        drain(&mut guest_rx);

        host.set_current_session_properties(SessionUpdate::open(false))
            .await
            .unwrap();

        let events = drain(&mut guest_rx);
        let [TransportEvent::SessionListUpdate(changed)] = &events[..] else {
            panic!("expected one list update, got {events:?}");
        };
        assert!(!changed[0].removed_from_list);
        assert!(!changed[0].open);
        assert_eq!(changed[0].password(), Some("pw"));

        guest.join_session(&name("Alpha")).await.unwrap();
        assert_eq!(
            drain(&mut guest_rx),
            vec![TransportEvent::JoinFailed {
                name: name("Alpha"),
                reason: JoinFailure::Closed,
            }]
        );
    }

    #[tokio::test]
    async fn test_empty_update_broadcasts_nothing() {
        let lobby = LocalLobby::new();
        let (host, _host_rx) = lobby_client(&lobby).await;
        let (_browser, mut browser_rx) = lobby_client(&lobby).await;
        host.create_session(&name("Alpha"), &CreationParameters::multi(5, "pw"))
            .await
            .unwrap();
        drain(&mut browser_rx);

        host.set_current_session_properties(SessionUpdate::default())
            .await
            .unwrap();

        assert!(drain(&mut browser_rx).is_empty());
    }

    #[tokio::test]
    async fn test_dropping_transport_deregisters_and_closes_feed() {
        let lobby = LocalLobby::new();
        let (host, mut host_rx) = lobby_client(&lobby).await;
        let (guest, mut guest_rx) = lobby_client(&lobby).await;
        host.create_session(&name("Alpha"), &CreationParameters::multi(5, ""))
            .await
            .unwrap();
        guest.join_session(&name("Alpha")).await.unwrap();
        drain(&mut host_rx);
        drain(&mut guest_rx);

        drop(host);

        assert_eq!(lobby.client_count().await, 1);
        assert_eq!(lobby.authority_of("Alpha").await, Some(guest.client_id()));
        assert_eq!(
            drain(&mut guest_rx),
            vec![TransportEvent::AuthorityChanged {
                name: name("Alpha"),
                authority: guest.client_id(),
            }]
        );
        assert_eq!(host_rx.recv().await, None);
    }
}
