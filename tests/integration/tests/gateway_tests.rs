//! End-to-end WebSocket gateway tests
//!
//! Each test spins up a full gateway on an ephemeral port and drives it
//! with real WebSocket clients.

use std::time::Duration;

use anyhow::Result;
use serde_json::json;

use integration_tests::{fast_heartbeat_config, TestClient, TestServer};
use lobby_core::{AppSessionStore, UserId};

#[tokio::test]
async fn session_attach_binds_identity() -> Result<()> {
    let server = TestServer::start().await?;
    let lobby = server.seed_lobby("arena", &["alice", "bob"]);

    let mut client = TestClient::connect(&server).await?;
    let fulfilled = client.attach(&lobby, &lobby.members[0]).await?;

    assert_eq!(fulfilled["user"]["name"], "alice");
    assert_eq!(fulfilled["lobby"]["name"], "arena");
    Ok(())
}

#[tokio::test]
async fn session_attach_rejects_a_stranger() -> Result<()> {
    let server = TestServer::start().await?;
    let lobby = server.seed_lobby("arena", &["alice"]);

    let mut client = TestClient::connect(&server).await?;
    client
        .send(
            "SESSION_ATTACH",
            json!({"token": lobby.token, "user_id": UserId::generate()}),
        )
        .await?;

    let rejection = client.expect_action("SESSION_ATTACH_REJECTED").await?;
    assert_eq!(rejection["code"], "ENOTMEMBER");
    Ok(())
}

#[tokio::test]
async fn observer_join_by_token() -> Result<()> {
    let server = TestServer::start().await?;
    let lobby = server.seed_lobby("arena", &["alice"]);

    let mut observer = TestClient::connect(&server).await?;
    let fulfilled = observer.observe(&lobby.token).await?;
    assert_eq!(fulfilled["lobby"]["name"], "arena");
    Ok(())
}

#[tokio::test]
async fn observer_join_rejects_a_bad_token() -> Result<()> {
    let server = TestServer::start().await?;
    server.seed_lobby("arena", &["alice"]);

    let mut observer = TestClient::connect(&server).await?;
    observer
        .send("OBSERVER_JOIN", json!({"token": "bogus"}))
        .await?;

    let rejection = observer.expect_action("OBSERVER_JOIN_REJECTED").await?;
    assert_eq!(rejection["code"], "ENOLOBBY");
    Ok(())
}

#[tokio::test]
async fn unknown_action_types_are_dropped() -> Result<()> {
    let server = TestServer::start().await?;
    let mut client = TestClient::connect(&server).await?;

    client.send("NO_SUCH_ACTION", json!({})).await?;
    client.send_raw("{definitely not json").await?;
    client.expect_silence(Duration::from_millis(300)).await?;
    Ok(())
}

#[tokio::test]
async fn only_the_leader_can_start_a_duel() -> Result<()> {
    let server = TestServer::start().await?;
    let lobby = server.seed_lobby("arena", &["alice", "bob"]);

    let mut bob = TestClient::connect(&server).await?;
    bob.attach(&lobby, &lobby.members[1]).await?;

    bob.send("DUEL_START", json!({})).await?;
    let rejection = bob.expect_action("DUEL_START_REJECTED").await?;
    assert_eq!(rejection["code"], "ENOTLEADER");
    Ok(())
}

#[tokio::test]
async fn duel_start_requires_two_members() -> Result<()> {
    let server = TestServer::start().await?;
    let lobby = server.seed_lobby("arena", &["alice"]);

    let mut alice = TestClient::connect(&server).await?;
    alice.attach(&lobby, &lobby.members[0]).await?;

    alice.send("DUEL_START", json!({})).await?;
    let rejection = alice.expect_action("DUEL_START_REJECTED").await?;
    assert_eq!(rejection["code"], "EINVLOBBYSIZE");
    Ok(())
}

#[tokio::test]
async fn full_duel_with_early_completion() -> Result<()> {
    let server = TestServer::start().await?;
    let lobby = server.seed_lobby("arena", &["alice", "bob"]);

    let mut alice = TestClient::connect(&server).await?;
    let mut bob = TestClient::connect(&server).await?;
    let mut observer = TestClient::connect(&server).await?;
    alice.attach(&lobby, &lobby.members[0]).await?;
    bob.attach(&lobby, &lobby.members[1]).await?;
    observer.observe(&lobby.token).await?;

    // Leader starts; everyone in the lobby gets the state push, and the
    // payload is the duel store itself.
    alice.send("DUEL_START", json!({})).await?;
    alice.expect_action("DUEL_START_FULFILLED").await?;
    let update = alice.expect_action("APP_UPDATE").await?;
    assert_eq!(update["stage"], "ongoing");
    bob.expect_action("APP_UPDATE").await?;
    let observed = observer.expect_action("APP_UPDATE").await?;
    assert_eq!(observed["stage"], "ongoing");

    // Two straight wins for alice settle a best-of-three early.
    for _ in 0..2 {
        alice.send("DUEL_MOVE", json!({"move": "rock"})).await?;
        alice.expect_action("APP_UPDATE").await?;
        bob.expect_action("APP_UPDATE").await?;
        observer.expect_action("APP_UPDATE").await?;

        bob.send("DUEL_MOVE", json!({"move": "scissors"})).await?;
        alice.expect_action("APP_UPDATE").await?;
        bob.expect_action("APP_UPDATE").await?;
        observer.expect_action("APP_UPDATE").await?;
    }

    let session = server
        .sessions
        .get(lobby.id, "duel")
        .await?
        .expect("duel session persisted");
    assert_eq!(session.store["stage"], "complete");
    assert_eq!(session.store["player1"]["points"], 2);

    // The duel is over; further moves are stage violations.
    bob.send("DUEL_MOVE", json!({"move": "paper"})).await?;
    let rejection = bob.expect_action("DUEL_MOVE_REJECTED").await?;
    assert_eq!(rejection["code"], "EINVSTAGE");
    Ok(())
}

#[tokio::test]
async fn double_move_in_one_round_is_ignored() -> Result<()> {
    let server = TestServer::start().await?;
    let lobby = server.seed_lobby("arena", &["alice", "bob"]);

    let mut alice = TestClient::connect(&server).await?;
    let mut bob = TestClient::connect(&server).await?;
    alice.attach(&lobby, &lobby.members[0]).await?;
    bob.attach(&lobby, &lobby.members[1]).await?;

    alice.send("DUEL_START", json!({})).await?;
    alice.expect_action("DUEL_START_FULFILLED").await?;
    alice.expect_action("APP_UPDATE").await?;
    bob.expect_action("APP_UPDATE").await?;

    alice.send("DUEL_MOVE", json!({"move": "rock"})).await?;
    alice.expect_action("APP_UPDATE").await?;
    bob.expect_action("APP_UPDATE").await?;

    // A second throw before bob answers is dropped, not rejected; the
    // unchanged state is still pushed to the lobby.
    alice.send("DUEL_MOVE", json!({"move": "paper"})).await?;
    let update = alice.expect_action("APP_UPDATE").await?;
    assert_eq!(update["player1"]["moves"], json!(["rock"]));
    bob.expect_action("APP_UPDATE").await?;

    // The round still resolves against the move that counted.
    bob.send("DUEL_MOVE", json!({"move": "scissors"})).await?;
    let update = alice.expect_action("APP_UPDATE").await?;
    assert_eq!(update["player1"]["points"], 1);
    Ok(())
}

#[tokio::test]
async fn silent_connections_are_reaped_by_the_heartbeat() -> Result<()> {
    let server = TestServer::start_with_config(fast_heartbeat_config(100)).await?;

    // Never read from the socket, so the client library never answers pings.
    let _client = TestClient::connect(&server).await?;
    assert_eq!(server.state.connections.count(), 1);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(server.state.connections.count(), 0);
    Ok(())
}
