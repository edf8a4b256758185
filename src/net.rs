use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::force_model::InputIntent;
use crate::physics::PhysicsWorld;
use crate::state::SharedGameState;
use crate::vehicle::{SettingsUpdate, VehicleConfig};

#[derive(Error, Debug)]
pub enum NetError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to accept connection: {0}")]
    Accept(#[from] std::io::Error),
    #[error("WebSocket handshake failed: {0}")]
    Handshake(#[from] tokio_tungstenite::tungstenite::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Full five-flag snapshot.
    Input(InputIntent),
    /// Single key edge.
    Key { key: String, pressed: bool },
    Settings(SettingsUpdate),
    Ping,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Welcome { player_id: String, config: VehicleConfig },
    Settings { config: VehicleConfig },
    Pong,
    Error { message: String },
}

impl ServerMessage {
    fn to_json(&self) -> Option<String> {
        serde_json::to_string(self)
            .map_err(|e| warn!("failed to encode server message: {e}"))
            .ok()
    }
}

/// Decode a client frame; a bad frame becomes the `error` reply for the sender.
pub fn parse_client_message(text: &str) -> Result<ClientMessage, ServerMessage> {
    serde_json::from_str(text).map_err(|e| ServerMessage::Error { message: e.to_string() })
}

/// Apply one client message to the player's state. Returns the reply, if any.
pub fn handle_message(
    game: &mut SharedGameState,
    player_id: &str,
    msg: ClientMessage,
) -> Option<ServerMessage> {
    let player = game.players.get_mut(player_id)?;

    match msg {
        ClientMessage::Input(intent) => {
            player.keys.set_intent(intent);
            None
        }
        ClientMessage::Key { key, pressed } => {
            if !player.keys.set_key(&key, pressed) {
                debug!(player = %player_id, %key, "unbound key");
            }
            None
        }
        ClientMessage::Settings(update) => match player.config.apply_update(&update) {
            Ok(()) => {
                info!(player = %player_id, config = ?player.config, "settings updated");
                Some(ServerMessage::Settings { config: player.config })
            }
            Err(e) => {
                warn!(player = %player_id, "rejected settings: {e}");
                Some(ServerMessage::Error { message: e.to_string() })
            }
        },
        ClientMessage::Ping => Some(ServerMessage::Pong),
    }
}

pub async fn start_websocket_server(
    addr: String,
    state: Arc<Mutex<SharedGameState>>,
    physics: Arc<Mutex<PhysicsWorld>>,
) -> Result<(), NetError> {
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| NetError::Bind { addr: addr.clone(), source })?;

    info!("WebSocket listening on ws://{addr}");

    loop {
        let (raw, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("{}", NetError::Accept(e));
                continue;
            }
        };

        let state = Arc::clone(&state);
        let physics = Arc::clone(&physics);

        tokio::spawn(async move {
            if let Err(e) = handle_client(raw, state, physics).await {
                warn!(%peer, "client ended with error: {e}");
            }
        });
    }
}

async fn handle_client(
    raw: TcpStream,
    state: Arc<Mutex<SharedGameState>>,
    physics: Arc<Mutex<PhysicsWorld>>,
) -> Result<(), NetError> {
    let ws = accept_async(raw).await?;
    let (mut write, mut read) = ws.split();

    // Outgoing channel; the sim loop pushes snapshots into it.
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let send_loop = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if write.send(Message::Text(msg)).await.is_err() {
                break;
            }
        }
    });

    let (player_id, config) = {
        let mut game = state.lock().await;
        let id = game.add_player(tx.clone());
        (id, game.defaults)
    };

    info!(player = %player_id, "player connected");

    let welcome = ServerMessage::Welcome {
        player_id: player_id.clone(),
        config,
    };
    if let Some(json) = welcome.to_json() {
        let _ = tx.send(json);
    }

    while let Some(msg) = read.next().await {
        let msg = match msg {
            Ok(m) => m,
            Err(_) => break,
        };

        let text = match msg {
            Message::Text(t) => t,
            Message::Close(_) => break,
            _ => continue,
        };

        let reply = match parse_client_message(&text) {
            Ok(parsed) => {
                let mut game = state.lock().await;
                handle_message(&mut game, &player_id, parsed)
            }
            Err(reply) => {
                debug!(player = %player_id, "malformed message: {text}");
                Some(reply)
            }
        };

        if let Some(json) = reply.and_then(|r| r.to_json()) {
            let _ = tx.send(json);
        }
    }

    info!(player = %player_id, "player disconnected");

    // Same lock order as the sim loop: physics, then state.
    {
        let mut phys = physics.lock().await;
        let mut game = state.lock().await;
        game.remove_player(&player_id, &mut phys);
    }

    send_loop.abort();
    Ok(())
}
