//! Registration, authentication, and login-timestamp behavior at the
//! service level, against an in-memory database.

use messagely::identity::{LoginError, NewUser, RegistrationError};
use messagely::repository::user::ProfileError;

use test_utils::test_state;

fn sample_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_owned(),
        password: "correct-horse-battery".to_owned(),
        first_name: "Test".to_owned(),
        last_name: "User".to_owned(),
        phone: "+1 555 0100".to_owned(),
    }
}

#[tokio::test]
async fn register_then_authenticate_succeeds() {
    let state = test_state().await;

    let token = state
        .identity
        .register(&sample_user("alice"))
        .await
        .expect("registration should succeed");
    assert!(!token.is_empty());

    let valid = state
        .identity
        .authenticate("alice", "correct-horse-battery")
        .await
        .expect("authentication should not error");
    assert!(valid);
}

#[tokio::test]
async fn registration_token_is_a_live_session() {
    let state = test_state().await;
    let token = state
        .identity
        .register(&sample_user("alice"))
        .await
        .expect("registration should succeed");

    let claims = state
        .tokens
        .verify(&token)
        .expect("registration token should verify");
    assert_eq!(claims.sub, "alice");
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let state = test_state().await;
    state
        .identity
        .register(&sample_user("bob"))
        .await
        .expect("first registration should succeed");

    let second = state.identity.register(&sample_user("bob")).await;
    assert!(matches!(second, Err(RegistrationError::UsernameTaken)));

    let users = state.identity.list().await.expect("listing should work");
    let bobs = users.iter().filter(|user| user.username == "bob").count();
    assert_eq!(bobs, 1);
}

#[tokio::test]
async fn racing_registrations_leave_exactly_one_user() {
    let state = test_state().await;

    let user_a = sample_user("bob");
    let user_b = sample_user("bob");
    let (first, second) = tokio::join!(
        state.identity.register(&user_a),
        state.identity.register(&user_b),
    );

    let outcomes = [first, second];
    let successes = outcomes.iter().filter(|result| result.is_ok()).count();
    let duplicates = outcomes
        .iter()
        .filter(|result| matches!(result, Err(RegistrationError::UsernameTaken)))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(duplicates, 1);

    let users = state.identity.list().await.expect("listing should work");
    let bobs = users.iter().filter(|user| user.username == "bob").count();
    assert_eq!(bobs, 1);
}

#[tokio::test]
async fn wrong_password_and_unknown_user_are_indistinguishable() {
    let state = test_state().await;
    state
        .identity
        .register(&sample_user("alice"))
        .await
        .expect("registration should succeed");

    let wrong_password = state
        .identity
        .authenticate("alice", "not-her-password")
        .await
        .expect("authentication should not error");
    let unknown_user = state
        .identity
        .authenticate("mallory", "anything-at-all")
        .await
        .expect("authentication should not error");

    assert!(!wrong_password);
    assert!(!unknown_user);
}

#[tokio::test]
async fn login_returns_token_and_advances_login_timestamp() {
    let state = test_state().await;
    state
        .identity
        .register(&sample_user("alice"))
        .await
        .expect("registration should succeed");

    let before = state
        .identity
        .get("alice")
        .await
        .expect("profile should exist")
        .last_login_at;

    let token = state
        .identity
        .login("alice", "correct-horse-battery")
        .await
        .expect("login should succeed");
    assert!(!token.is_empty());

    let after = state
        .identity
        .get("alice")
        .await
        .expect("profile should exist")
        .last_login_at;
    assert!(after > before, "login must advance last_login_at");
}

#[tokio::test]
async fn failed_login_writes_nothing() {
    let state = test_state().await;
    state
        .identity
        .register(&sample_user("alice"))
        .await
        .expect("registration should succeed");

    let before = state
        .identity
        .get("alice")
        .await
        .expect("profile should exist")
        .last_login_at;

    let rejected = state.identity.login("alice", "not-her-password").await;
    assert!(matches!(rejected, Err(LoginError::InvalidCredentials)));

    let after = state
        .identity
        .get("alice")
        .await
        .expect("profile should exist")
        .last_login_at;
    assert_eq!(after, before, "failed login must not touch last_login_at");
}

#[tokio::test]
async fn unknown_user_login_is_invalid_credentials_too() {
    let state = test_state().await;
    let rejected = state.identity.login("nobody", "whatever-at-all").await;
    assert!(matches!(rejected, Err(LoginError::InvalidCredentials)));
}

#[tokio::test]
async fn profile_carries_no_password_material() {
    let state = test_state().await;
    state
        .identity
        .register(&sample_user("alice"))
        .await
        .expect("registration should succeed");

    let profile = state
        .identity
        .get("alice")
        .await
        .expect("profile should exist");
    assert_eq!(profile.username, "alice");
    assert_eq!(profile.first_name, "Test");
    assert_eq!(profile.joined_at, profile.last_login_at);

    let serialized = serde_json::to_value(&profile).expect("profile should serialize");
    let object = serialized.as_object().expect("profile is a JSON object");
    assert!(
        object.keys().all(|key| !key.contains("password")),
        "profile JSON must not contain password material: {object:?}"
    );
}

#[tokio::test]
async fn missing_profile_is_not_found() {
    let state = test_state().await;
    let missing = state.identity.get("nobody").await;
    assert!(matches!(missing, Err(ProfileError::NotFound)));
}

#[tokio::test]
async fn login_timestamp_update_needs_an_existing_user() {
    let state = test_state().await;
    let missing = state
        .repository
        .users
        .update_login_timestamp("nobody")
        .await;
    assert!(matches!(missing, Err(ProfileError::NotFound)));
}

#[tokio::test]
async fn listing_shows_summaries_for_everyone() {
    let state = test_state().await;
    for username in ["alice", "bob", "carol"] {
        state
            .identity
            .register(&sample_user(username))
            .await
            .expect("registration should succeed");
    }

    let mut usernames: Vec<String> = state
        .identity
        .list()
        .await
        .expect("listing should work")
        .into_iter()
        .map(|summary| summary.username)
        .collect();
    usernames.sort();
    assert_eq!(usernames, ["alice", "bob", "carol"]);
}
