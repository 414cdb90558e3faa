//! Test helpers for integration tests
//!
//! Provides utilities for spawning gateway servers on ephemeral ports and
//! driving them with real WebSocket clients.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use lobby_common::AppConfig;
use lobby_core::{AppSessionStore, Lobby, LobbyMember, LobbyStore, UserId};
use lobby_gateway::server::{create_app, default_app_registry};
use lobby_gateway::GatewayState;
use lobby_store::{MemoryAppSessionStore, MemoryLobbyStore};

/// How long a test waits for a single expected frame
pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// Gateway instance bound to an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: GatewayState,
    pub lobbies: Arc<MemoryLobbyStore>,
    pub sessions: Arc<MemoryAppSessionStore>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a gateway with default configuration
    pub async fn start() -> Result<Self> {
        Self::start_with_config(AppConfig::default()).await
    }

    /// Start a gateway with custom config (e.g. a fast heartbeat)
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let lobbies = Arc::new(MemoryLobbyStore::new());
        let sessions = Arc::new(MemoryAppSessionStore::new());
        let state = GatewayState::new(
            Arc::clone(&lobbies) as Arc<dyn LobbyStore>,
            Arc::clone(&sessions) as Arc<dyn AppSessionStore>,
            default_app_registry(),
            config,
        );

        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;

        let heartbeat = Duration::from_millis(state.config.heartbeat.interval_ms);
        let _sweep = state.connections.spawn_heartbeat(heartbeat);

        let app = create_app(state.clone());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Give the server a beat to accept connections
        tokio::time::sleep(Duration::from_millis(50)).await;

        Ok(Self {
            addr,
            state,
            lobbies,
            sessions,
            _handle: handle,
        })
    }

    /// WebSocket URL for the gateway endpoint
    pub fn ws_url(&self) -> String {
        format!("ws://{}/gateway", self.addr)
    }

    /// Seed a lobby; the first name becomes the leader
    pub fn seed_lobby(&self, name: &str, member_names: &[&str]) -> Lobby {
        assert!(!member_names.is_empty(), "a lobby needs a leader");
        let leader = LobbyMember::new(UserId::generate(), member_names[0]);
        let mut lobby = self.lobbies.create_lobby(name, leader);
        for member_name in &member_names[1..] {
            let member = LobbyMember::new(UserId::generate(), *member_name);
            self.lobbies
                .add_member(lobby.id, member.clone())
                .expect("lobby was just created");
            lobby.members.push(member);
        }
        lobby
    }
}

/// One WebSocket client connected to a [`TestServer`]
pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl TestClient {
    pub async fn connect(server: &TestServer) -> Result<Self> {
        let (ws, _) = connect_async(server.ws_url())
            .await
            .context("WebSocket connect failed")?;
        Ok(Self { ws })
    }

    /// Send one `{type, payload}` action frame
    pub async fn send(&mut self, action_type: &str, payload: Value) -> Result<()> {
        let frame = json!({"type": action_type, "payload": payload}).to_string();
        self.ws.send(Message::Text(frame)).await?;
        Ok(())
    }

    /// Send a raw text frame, bypassing envelope construction
    pub async fn send_raw(&mut self, text: &str) -> Result<()> {
        self.ws.send(Message::Text(text.to_string())).await?;
        Ok(())
    }

    /// Receive the next action frame, skipping control frames
    pub async fn recv_action(&mut self) -> Result<(String, Value)> {
        loop {
            let message = timeout(RECV_TIMEOUT, self.ws.next())
                .await
                .context("timed out waiting for an action")?
                .ok_or_else(|| anyhow!("connection closed"))??;
            match message {
                Message::Text(text) => {
                    let value: Value = serde_json::from_str(&text)?;
                    let kind = value["type"]
                        .as_str()
                        .ok_or_else(|| anyhow!("frame without a type: {text}"))?
                        .to_string();
                    return Ok((kind, value["payload"].clone()));
                }
                Message::Close(_) => bail!("connection closed by server"),
                // Ping/pong are answered by tungstenite itself.
                _ => continue,
            }
        }
    }

    /// Receive the next action and assert its type
    pub async fn expect_action(&mut self, expected: &str) -> Result<Value> {
        let (kind, payload) = self.recv_action().await?;
        if kind != expected {
            bail!("expected {expected}, got {kind} with payload {payload}");
        }
        Ok(payload)
    }

    /// Assert that no action arrives within the given window
    pub async fn expect_silence(&mut self, window: Duration) -> Result<()> {
        match timeout(window, self.ws.next()).await {
            Err(_) => Ok(()),
            Ok(Some(Ok(Message::Ping(_) | Message::Pong(_)))) => Ok(()),
            Ok(frame) => bail!("expected silence, got {frame:?}"),
        }
    }

    /// Attach a member identity via the lobby token and wait for the
    /// confirmation
    pub async fn attach(&mut self, lobby: &Lobby, member: &LobbyMember) -> Result<Value> {
        self.send(
            "SESSION_ATTACH",
            json!({"token": lobby.token, "user_id": member.id}),
        )
        .await?;
        self.expect_action("SESSION_ATTACH_FULFILLED").await
    }

    /// Join as an observer via the lobby token
    pub async fn observe(&mut self, token: &str) -> Result<Value> {
        self.send("OBSERVER_JOIN", json!({"token": token})).await?;
        self.expect_action("OBSERVER_JOIN_FULFILLED").await
    }
}
