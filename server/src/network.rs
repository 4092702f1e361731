//! WebSocket gateway: connection lifecycle and broadcast fan-out
//!
//! One tokio task per accepted connection handles inbound frames, plus one
//! sender task per connection bridging an unbounded channel to the socket
//! sink. Broadcasting pushes into those channels and never waits on a peer's
//! socket, so one slow or dead client cannot stall delivery to the rest.
//!
//! Every broadcast goes to all live connections, including the one that
//! caused it. Clients merge updates about themselves idempotently, which
//! keeps the server free of per-recipient filtering.

use crate::registry::PlayerRegistry;
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use shared::protocol::{ClientMessage, ServerMessage};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, RwLock};
use tokio_tungstenite::{accept_async, tungstenite::Message};

/// Handles to every live connection's sender task, keyed by player id.
type PeerMap = Arc<RwLock<HashMap<String, mpsc::UnboundedSender<Message>>>>;

/// WebSocket sync server owning the registry and the live connection set.
pub struct Server {
    listener: TcpListener,
    registry: Arc<RwLock<PlayerRegistry>>,
    peers: PeerMap,
}

impl Server {
    /// Binds the listener. The registry is created here and torn down with
    /// the server; connection handlers only ever borrow it.
    pub async fn bind(addr: &str) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            registry: Arc::new(RwLock::new(PlayerRegistry::new())),
            peers: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Address the listener actually bound, for callers that asked for port 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept loop. A failed accept is logged and never stops the listener;
    /// every accepted stream gets its own handler task.
    pub async fn run(self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let registry = Arc::clone(&self.registry);
                    let peers = Arc::clone(&self.peers);

                    tokio::spawn(async move {
                        handle_connection(stream, addr, registry, peers).await;
                    });
                }
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                }
            }
        }
    }
}

/// Drives one connection from handshake to cleanup.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    registry: Arc<RwLock<PlayerRegistry>>,
    peers: PeerMap,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake failed for {}: {}", addr, e);
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    // Register and snapshot in one critical section so the init table and
    // the join broadcast cannot interleave with a concurrent accept.
    let (player, players) = {
        let mut registry = registry.write().await;
        let player = registry.register();
        let players = registry.snapshot();
        (player, players)
    };
    let id = player.id.clone();
    info!("Player {} connected from {}", id, addr);

    peers.write().await.insert(id.clone(), tx.clone());

    send_to(
        &tx,
        &ServerMessage::Init {
            id: id.clone(),
            players,
        },
    );
    broadcast(&peers, &ServerMessage::PlayerJoined { player }).await;

    // All outbound traffic for this connection funnels through one task.
    let sender_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if ws_sender.send(message).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = ws_receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                handle_frame(&id, &text, &registry, &peers).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {
                // Binary, ping and pong frames are not part of the protocol.
            }
            Err(e) => {
                // Abnormal termination is handled exactly like a close.
                debug!("Connection error for {}: {}", id, e);
                break;
            }
        }
    }

    sender_task.abort();
    peers.write().await.remove(&id);

    // A second close signal for the same connection finds the entry gone and
    // broadcasts nothing.
    let removed = registry.write().await.remove(&id);
    if removed {
        info!("Player {} disconnected", id);
        broadcast(&peers, &ServerMessage::PlayerLeft { id }).await;
    }
}

/// Parses and applies one inbound text frame from the connection owning `id`.
async fn handle_frame(
    id: &str,
    text: &str,
    registry: &Arc<RwLock<PlayerRegistry>>,
    peers: &PeerMap,
) {
    let message: ClientMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            warn!("Ignoring malformed message from {}: {}", id, e);
            return;
        }
    };

    match message {
        ClientMessage::Update { data } => {
            if let Err(reason) = data.validate() {
                warn!("Rejecting update from {}: {}", id, reason);
                return;
            }

            // An empty update merges nothing; don't wake every client for it.
            if data.is_empty() {
                return;
            }

            let applied = registry.write().await.apply_update(id, &data);
            if applied {
                broadcast(
                    peers,
                    &ServerMessage::PlayerUpdated {
                        id: id.to_string(),
                        data,
                    },
                )
                .await;
            }
        }
    }
}

/// Queues a message for one connection. Best-effort: a closed channel means
/// the peer is already tearing down.
fn send_to(tx: &mpsc::UnboundedSender<Message>, message: &ServerMessage) {
    match serde_json::to_string(message) {
        Ok(text) => {
            let _ = tx.send(Message::Text(text));
        }
        Err(e) => error!("Failed to serialize message: {}", e),
    }
}

/// Fans one message out to every live connection. Serializes once; a peer
/// that closed mid-iteration is skipped without affecting the rest.
async fn broadcast(peers: &PeerMap, message: &ServerMessage) {
    let text = match serde_json::to_string(message) {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to serialize broadcast: {}", e);
            return;
        }
    };

    let senders: Vec<(String, mpsc::UnboundedSender<Message>)> = {
        let peers = peers.read().await;
        peers
            .iter()
            .map(|(id, tx)| (id.clone(), tx.clone()))
            .collect()
    };

    for (id, tx) in senders {
        if tx.send(Message::Text(text.clone())).is_err() {
            debug!("Skipping closed connection {}", id);
        }
    }
}
