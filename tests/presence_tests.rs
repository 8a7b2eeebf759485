//! Integration tests for presence registration, displacement, and
//! broadcast semantics.
//!
//! All tests run against the in-memory store; no database required.

mod helpers;

use courier_realtime::ServerEvent;

#[tokio::test]
async fn test_connect_registers_and_disconnect_unregisters() {
    let (engine, _store) = helpers::engine_with_users(&[(1, "alice")]);
    let manager = engine.manager();

    let (handle, _rx) = manager.connect(1, "alice").await;
    assert!(engine.directory().is_online(1));
    assert_eq!(engine.directory().lookup(1).unwrap().id, handle.id);

    manager.disconnect(&handle).await;
    assert!(!engine.directory().is_online(1));
    assert!(engine.directory().lookup(1).is_none());
}

#[tokio::test]
async fn test_presence_mirror_written_on_both_transitions() {
    let (engine, store) = helpers::engine_with_users(&[(1, "alice")]);
    let manager = engine.manager();

    let (handle, _rx) = manager.connect(1, "alice").await;
    manager.disconnect(&handle).await;

    let transitions = store.transitions();
    assert_eq!(transitions.len(), 2);

    // Online carries the connection reference, offline clears it.
    assert_eq!(transitions[0].0, 1);
    assert!(transitions[0].1);
    assert_eq!(transitions[0].2.as_deref(), Some(handle.id.to_string().as_str()));

    assert_eq!(transitions[1].0, 1);
    assert!(!transitions[1].1);
    assert!(transitions[1].2.is_none());
}

#[tokio::test]
async fn test_new_registration_displaces_old_session() {
    let (engine, _store) = helpers::engine_with_users(&[(1, "alice")]);
    let manager = engine.manager();

    let (h1, _rx1) = manager.connect(1, "alice").await;
    let (h2, _rx2) = manager.connect(1, "alice").await;

    assert_ne!(h1.id, h2.id);
    assert_eq!(engine.directory().online_count(), 1);
    assert_eq!(engine.directory().lookup(1).unwrap().id, h2.id);
}

#[tokio::test]
async fn test_stale_disconnect_cannot_clobber_newer_session() {
    let (engine, store) = helpers::engine_with_users(&[(1, "alice"), (2, "bob")]);
    let manager = engine.manager();

    let (h1, _rx1) = manager.connect(1, "alice").await;
    let (h2, _rx2) = manager.connect(1, "alice").await;

    let (_hb, mut rxb) = manager.connect(2, "bob").await;
    helpers::drain_events(&mut rxb);

    // The displaced session's disconnect arrives late.
    manager.disconnect(&h1).await;

    assert!(engine.directory().is_online(1));
    assert_eq!(engine.directory().lookup(1).unwrap().id, h2.id);

    // No offline mirror write and no offline broadcast for the stale drop.
    assert!(
        !store
            .transitions()
            .iter()
            .any(|(id, online, _)| *id == 1 && !online)
    );
    assert!(
        !helpers::drain_events(&mut rxb)
            .iter()
            .any(|e| matches!(e, ServerEvent::UserOffline { .. }))
    );

    // The current session's disconnect still works.
    manager.disconnect(&h2).await;
    assert!(!engine.directory().is_online(1));
    assert!(
        helpers::drain_events(&mut rxb)
            .iter()
            .any(|e| matches!(e, ServerEvent::UserOffline { user_id: 1, .. }))
    );
}

#[tokio::test]
async fn test_online_broadcast_reaches_each_other_identity_once() {
    let (engine, _store) =
        helpers::engine_with_users(&[(1, "alice"), (2, "bob"), (3, "carol")]);
    let manager = engine.manager();

    let (_h1, mut rx1) = manager.connect(1, "alice").await;
    let (_h2, mut rx2) = manager.connect(2, "bob").await;
    helpers::drain_events(&mut rx1);
    helpers::drain_events(&mut rx2);

    let (h3, mut rx3) = manager.connect(3, "carol").await;

    let count_online_for_3 = |events: &[ServerEvent]| {
        events
            .iter()
            .filter(|e| matches!(e, ServerEvent::UserOnline { user_id: 3, .. }))
            .count()
    };
    assert_eq!(count_online_for_3(&helpers::drain_events(&mut rx1)), 1);
    assert_eq!(count_online_for_3(&helpers::drain_events(&mut rx2)), 1);

    // The joining identity does not hear its own arrival.
    assert!(helpers::drain_events(&mut rx3).is_empty());

    manager.disconnect(&h3).await;

    let count_offline_for_3 = |events: &[ServerEvent]| {
        events
            .iter()
            .filter(|e| matches!(e, ServerEvent::UserOffline { user_id: 3, .. }))
            .count()
    };
    assert_eq!(count_offline_for_3(&helpers::drain_events(&mut rx1)), 1);
    assert_eq!(count_offline_for_3(&helpers::drain_events(&mut rx2)), 1);
}

#[tokio::test]
async fn test_broadcast_carries_identity_and_name() {
    let (engine, _store) = helpers::engine_with_users(&[(1, "alice"), (2, "bob")]);
    let manager = engine.manager();

    let (_h1, mut rx1) = manager.connect(1, "alice").await;
    let (_h2, _rx2) = manager.connect(2, "bob").await;

    let events = helpers::drain_events(&mut rx1);
    match events.as_slice() {
        [ServerEvent::UserOnline {
            user_id,
            username,
            online,
        }] => {
            assert_eq!(*user_id, 2);
            assert_eq!(username, "bob");
            assert!(*online);
        }
        other => panic!("expected a single user:online event, got {other:?}"),
    }
}

#[tokio::test]
async fn test_reconnect_after_disconnect_comes_back_online() {
    let (engine, store) = helpers::engine_with_users(&[(1, "alice")]);
    let manager = engine.manager();

    let (h1, _rx1) = manager.connect(1, "alice").await;
    manager.disconnect(&h1).await;
    let (_h2, _rx2) = manager.connect(1, "alice").await;

    assert!(engine.directory().is_online(1));

    let transitions = store.transitions();
    assert_eq!(transitions.len(), 3);
    assert!(transitions[2].1);
}
