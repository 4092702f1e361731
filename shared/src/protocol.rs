//! Wire protocol between the sync server and its clients
//!
//! Every frame on the wire is a UTF-8 JSON object tagged by a `type` field.
//! Server-to-client traffic fans out to every open connection, including the
//! one that triggered the message; clients absorb updates about themselves
//! idempotently. Client-to-server traffic is a single message kind whose
//! sender is identified by the connection, never by the payload.

use crate::{PlayerState, StateUpdate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Messages the server emits.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once, to the accepting connection only, immediately after its
    /// player is registered. The table already contains the new player.
    Init {
        id: String,
        players: HashMap<String, PlayerState>,
    },
    /// Broadcast after a registration.
    PlayerJoined { player: PlayerState },
    /// Broadcast after an accepted inbound update.
    PlayerUpdated { id: String, data: StateUpdate },
    /// Broadcast after a connection closes, gracefully or not.
    PlayerLeft { id: String },
}

/// Messages a client sends.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Update { data: StateUpdate },
}
