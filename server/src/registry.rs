//! Session registry: the authoritative table of connected players
//!
//! One entry per live connection, keyed by the identifier the registry hands
//! out at registration time. The registry owns identity assignment and player
//! lifecycle; it knows nothing about sockets. The gateway wraps it in a lock
//! and is the only writer, which keeps the registry itself a plain synchronous
//! structure that tests can drive without any transport.

use log::info;
use rand::Rng;
use shared::{PlayerState, StateUpdate, SPAWN_X, SPAWN_Y};
use std::collections::HashMap;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 7;

/// Authoritative player table for the current server process.
pub struct PlayerRegistry {
    players: HashMap<String, PlayerState>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self {
            players: HashMap::new(),
        }
    }

    /// Registers a new player: fresh identifier, default spawn, random hue.
    ///
    /// The identifier is guaranteed not to collide with any currently
    /// registered player. Returns a copy of the stored state for the gateway
    /// to announce.
    pub fn register(&mut self) -> PlayerState {
        let id = self.allocate_id();
        let mut rng = rand::thread_rng();
        let color = format!("hsl({}, 70%, 50%)", rng.gen_range(0..360));
        let name = format!("Player {}", &id[..3]);

        let player = PlayerState::new(id.clone(), SPAWN_X, SPAWN_Y, color, name);
        info!("Player {} registered", id);
        self.players.insert(id, player.clone());

        player
    }

    /// Merges a validated partial update into an existing entry.
    ///
    /// Returns false without logging when the id is unknown: an update racing
    /// a disconnect is expected traffic, not an error.
    pub fn apply_update(&mut self, id: &str, update: &StateUpdate) -> bool {
        match self.players.get_mut(id) {
            Some(player) => {
                player.apply_update(update);
                true
            }
            None => false,
        }
    }

    /// Deletes an entry. Idempotent: a second removal reports false.
    pub fn remove(&mut self, id: &str) -> bool {
        if self.players.remove(id).is_some() {
            info!("Player {} removed", id);
            true
        } else {
            false
        }
    }

    /// Full copy of the current table, taken at connection accept.
    pub fn snapshot(&self) -> HashMap<String, PlayerState> {
        self.players.clone()
    }

    pub fn get(&self, id: &str) -> Option<&PlayerState> {
        self.players.get(id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    fn allocate_id(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let id: String = (0..ID_LEN)
                .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
                .collect();
            if !self.players.contains_key(&id) {
                return id;
            }
        }
    }
}

impl Default for PlayerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
