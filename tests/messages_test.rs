//! Message store and direction-partitioned query behavior.

use messagely::identity::NewUser;
use messagely::state::SharedState;

use test_utils::test_state;

async fn register(state: &SharedState, username: &str, first_name: &str) {
    let new_user = NewUser {
        username: username.to_owned(),
        password: "correct-horse-battery".to_owned(),
        first_name: first_name.to_owned(),
        last_name: "Tester".to_owned(),
        phone: "+1 555 0100".to_owned(),
    };
    state
        .identity
        .register(&new_user)
        .await
        .expect("registration should succeed");
}

#[tokio::test]
async fn sent_and_received_views_mirror_each_other() {
    let state = test_state().await;
    register(&state, "alice", "Alice").await;
    register(&state, "bob", "Bob").await;

    let stored = state
        .repository
        .messages
        .send("alice", "bob", "hi")
        .await
        .expect("sending should succeed");
    assert!(stored.read_at.is_none());

    let from_alice = state
        .repository
        .messages
        .messages_from("alice")
        .await
        .expect("query should succeed");
    assert_eq!(from_alice.len(), 1);
    let sent = &from_alice[0];
    assert_eq!(sent.id, stored.id);
    assert_eq!(sent.body, "hi");
    assert_eq!(sent.sent_at, stored.sent_at);
    assert_eq!(sent.read_at, None);
    assert_eq!(sent.to_user.username, "bob");
    assert_eq!(sent.to_user.first_name, "Bob");

    let to_bob = state
        .repository
        .messages
        .messages_to("bob")
        .await
        .expect("query should succeed");
    assert_eq!(to_bob.len(), 1);
    let received = &to_bob[0];
    assert_eq!(received.id, stored.id);
    assert_eq!(received.body, "hi");
    assert_eq!(received.sent_at, stored.sent_at);
    assert_eq!(received.from_user.username, "alice");
    assert_eq!(received.from_user.first_name, "Alice");
}

#[tokio::test]
async fn direction_partitions_do_not_bleed() {
    let state = test_state().await;
    register(&state, "alice", "Alice").await;
    register(&state, "bob", "Bob").await;

    state
        .repository
        .messages
        .send("alice", "bob", "one")
        .await
        .expect("sending should succeed");
    state
        .repository
        .messages
        .send("bob", "alice", "two")
        .await
        .expect("sending should succeed");

    let from_alice = state
        .repository
        .messages
        .messages_from("alice")
        .await
        .expect("query should succeed");
    assert_eq!(from_alice.len(), 1);
    assert_eq!(from_alice[0].body, "one");

    let to_alice = state
        .repository
        .messages
        .messages_to("alice")
        .await
        .expect("query should succeed");
    assert_eq!(to_alice.len(), 1);
    assert_eq!(to_alice[0].body, "two");
}

#[tokio::test]
async fn self_message_shows_up_in_both_directions() {
    let state = test_state().await;
    register(&state, "alice", "Alice").await;

    let stored = state
        .repository
        .messages
        .send("alice", "alice", "note to self")
        .await
        .expect("self-message should be allowed");

    let sent = state
        .repository
        .messages
        .messages_from("alice")
        .await
        .expect("query should succeed");
    let received = state
        .repository
        .messages
        .messages_to("alice")
        .await
        .expect("query should succeed");

    assert_eq!(sent.len(), 1);
    assert_eq!(received.len(), 1);
    assert_eq!(sent[0].id, stored.id);
    assert_eq!(received[0].id, stored.id);
    assert_eq!(sent[0].to_user.username, "alice");
    assert_eq!(received[0].from_user.username, "alice");
}

#[tokio::test]
async fn no_messages_means_empty_not_error() {
    let state = test_state().await;
    register(&state, "carol", "Carol").await;

    // Registered but quiet.
    let quiet_from = state
        .repository
        .messages
        .messages_from("carol")
        .await
        .expect("query should succeed");
    let quiet_to = state
        .repository
        .messages
        .messages_to("carol")
        .await
        .expect("query should succeed");
    assert!(quiet_from.is_empty());
    assert!(quiet_to.is_empty());

    // Never registered at all: same answer, no existence check.
    let unknown_from = state
        .repository
        .messages
        .messages_from("nobody")
        .await
        .expect("query should succeed");
    let unknown_to = state
        .repository
        .messages
        .messages_to("nobody")
        .await
        .expect("query should succeed");
    assert!(unknown_from.is_empty());
    assert!(unknown_to.is_empty());
}

#[tokio::test]
async fn messages_require_existing_parties() {
    let state = test_state().await;
    register(&state, "alice", "Alice").await;

    let no_recipient = state
        .repository
        .messages
        .send("alice", "ghost", "anyone there?")
        .await;
    assert!(no_recipient.is_err(), "unknown recipient must be rejected");

    let no_sender = state
        .repository
        .messages
        .send("ghost", "alice", "boo")
        .await;
    assert!(no_sender.is_err(), "unknown sender must be rejected");
}

#[tokio::test]
async fn message_ids_are_unique_and_server_assigned() {
    let state = test_state().await;
    register(&state, "alice", "Alice").await;
    register(&state, "bob", "Bob").await;

    let first = state
        .repository
        .messages
        .send("alice", "bob", "first")
        .await
        .expect("sending should succeed");
    let second = state
        .repository
        .messages
        .send("alice", "bob", "second")
        .await
        .expect("sending should succeed");
    assert_ne!(first.id, second.id);
}
