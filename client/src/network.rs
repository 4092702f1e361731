//! WebSocket sync client: applies inbound state, streams local updates

use crate::game::ViewState;
use crate::input::ControlSource;
use futures_util::{SinkExt, StreamExt};
use log::{debug, info, warn};
use shared::protocol::{ClientMessage, ServerMessage};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tokio::time::{interval, MissedTickBehavior};
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// Frame cadence of the local simulation loop (~60 Hz).
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// One persistent connection plus the view it keeps in sync.
pub struct SyncClient {
    url: String,
    view: Arc<RwLock<ViewState>>,
}

impl SyncClient {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            view: Arc::new(RwLock::new(ViewState::new())),
        }
    }

    /// Shared handle to the reconstructed view, for renderers and probes.
    pub fn view(&self) -> Arc<RwLock<ViewState>> {
        Arc::clone(&self.view)
    }

    /// Connects and runs until the server goes away.
    ///
    /// Every frame tick samples the controls, advances the local car through
    /// the physics step, applies the result to the view immediately, and
    /// sends the full kinematic state upstream. Sends are fire-and-forget:
    /// once the socket is gone updates are dropped, never queued, and the
    /// loop ends. A client that reconnects later starts over as a brand-new
    /// participant.
    pub async fn run<C: ControlSource>(
        self,
        mut controls: C,
    ) -> Result<(), tokio_tungstenite::tungstenite::Error> {
        let (ws_stream, _) = connect_async(self.url.as_str()).await?;
        info!("Connected to {}", self.url);

        let (mut ws_sender, mut ws_receiver) = ws_stream.split();

        // Outbound writer task, same shape as the server side: the frame
        // loop pushes into a channel and never waits on the socket.
        let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
        let sender_task = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                if ws_sender.send(message).await.is_err() {
                    break;
                }
            }
        });

        let mut frame_interval = interval(FRAME_INTERVAL);
        frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                frame = ws_receiver.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            match serde_json::from_str::<ServerMessage>(&text) {
                                Ok(message) => self.view.write().await.apply_message(message),
                                Err(e) => warn!("Ignoring malformed server message: {}", e),
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            info!("Server closed the connection");
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            // Abnormal termination ends the session the same
                            // way a graceful close does.
                            warn!("Connection lost: {}", e);
                            break;
                        }
                    }
                }

                _ = frame_interval.tick() => {
                    let update = {
                        let mut view = self.view.write().await;
                        view.advance_local(&controls.sample())
                    };

                    // Nothing to send before init names our car.
                    if let Some(data) = update {
                        match serde_json::to_string(&ClientMessage::Update { data }) {
                            Ok(text) => {
                                if tx.send(Message::Text(text)).is_err() {
                                    debug!("Dropped update, connection closing");
                                }
                            }
                            Err(e) => warn!("Failed to serialize update: {}", e),
                        }
                    }
                }
            }
        }

        sender_task.abort();
        Ok(())
    }
}
