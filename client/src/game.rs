//! Client-side view state and the frame-driven simulation loop
//!
//! The view is a derived, eventually-stale copy of the server's table,
//! rebuilt entirely from protocol messages applied in receipt order. It never
//! survives a reconnect. Locally-controlled cars additionally advance through
//! the shared physics step once per frame; the networked car's result is
//! forwarded upstream by the sync client, a couch car's result stays local.

use shared::protocol::ServerMessage;
use shared::{step, Controls, PlayerState, StateUpdate};
use std::collections::HashMap;

/// Fixed identifiers for the two cars in same-keyboard mode.
pub const COUCH_P1: &str = "couch_p1";
pub const COUCH_P2: &str = "couch_p2";

/// All players as this client currently believes them to be.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    players: HashMap<String, PlayerState>,
    local_id: Option<String>,
}

impl ViewState {
    /// Empty view for networked play; `init` fills it in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded view for same-keyboard play: two fixed cars, no network.
    pub fn couch() -> Self {
        let mut players = HashMap::new();
        players.insert(
            COUCH_P1.to_string(),
            PlayerState::new(
                COUCH_P1.to_string(),
                300.0,
                400.0,
                "#10b981".to_string(),
                "Player 1".to_string(),
            ),
        );
        players.insert(
            COUCH_P2.to_string(),
            PlayerState::new(
                COUCH_P2.to_string(),
                500.0,
                400.0,
                "#3b82f6".to_string(),
                "Player 2".to_string(),
            ),
        );

        Self {
            players,
            local_id: Some(COUCH_P1.to_string()),
        }
    }

    pub fn local_id(&self) -> Option<&str> {
        self.local_id.as_deref()
    }

    pub fn get(&self, id: &str) -> Option<&PlayerState> {
        self.players.get(id)
    }

    pub fn players(&self) -> &HashMap<String, PlayerState> {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Applies one inbound protocol message.
    ///
    /// Updates about our own car arrive too (broadcasts include the sender)
    /// and merge idempotently over the values we already applied locally.
    pub fn apply_message(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::Init { id, players } => {
                self.players = players;
                self.local_id = Some(id);
            }
            ServerMessage::PlayerJoined { player } => {
                self.players.insert(player.id.clone(), player);
            }
            ServerMessage::PlayerUpdated { id, data } => {
                // Absent entry means the player already left; drop silently.
                if let Some(player) = self.players.get_mut(&id) {
                    player.apply_update(&data);
                }
            }
            ServerMessage::PlayerLeft { id } => {
                self.players.remove(&id);
            }
        }
    }

    /// Advances one locally-controlled car a single frame and merges the
    /// result into the view. Returns the full-state update for the caller to
    /// forward upstream, or None when the car is not in the view.
    pub fn advance_actor(&mut self, id: &str, controls: &Controls) -> Option<StateUpdate> {
        let player = self.players.get_mut(id)?;
        let next = step(&player.kinematics(), controls);
        let update = StateUpdate::from_kinematics(&next);
        player.apply_update(&update);
        Some(update)
    }

    /// Advances the network-registered car, once the server has named it.
    pub fn advance_local(&mut self, controls: &Controls) -> Option<StateUpdate> {
        let id = self.local_id.clone()?;
        self.advance_actor(&id, controls)
    }
}
