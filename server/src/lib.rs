//! # Sync Server Library
//!
//! Server side of the racing game's real-time state synchronization. The
//! server is a relay, not a simulator: clients run their own physics and
//! stream kinematic updates upstream; the server keeps the authoritative
//! roster of who is connected and fans every mutation out to everyone.
//!
//! ## Core Responsibilities
//!
//! ### Session Registry
//! One [`registry::PlayerRegistry`] entry per live connection, keyed by the
//! identifier assigned at accept time. The registry owns identity assignment
//! (ids, spawn position, color, display name) and is deliberately transport-
//! free so it can be unit tested on its own.
//!
//! ### Broadcast Protocol
//! Registry mutations are serialized into the typed JSON messages defined in
//! `shared::protocol` and delivered to every open connection, including the
//! originator. Per-peer delivery is best-effort; a dead peer never stalls or
//! fails a broadcast.
//!
//! ### Connection Gateway
//! [`network::Server`] accepts WebSocket connections and runs one handler
//! task per connection: register, unicast `init`, broadcast `player_joined`,
//! relay validated `update`s, and on any close or error broadcast
//! `player_left` exactly once.
//!
//! ## Concurrency Model
//!
//! Handlers run concurrently on the tokio runtime. The registry and the
//! live-connection table each sit behind an `RwLock`; every read-modify-write
//! takes the write lock, which is what upholds the one-player-per-connection
//! invariant under simultaneous accepts and closes. Outbound traffic goes
//! through an unbounded channel per connection so the broadcaster never
//! blocks on a socket.
//!
//! There are no fatal error paths in this crate: malformed frames are logged
//! and dropped, updates racing a disconnect are benign no-ops, and the
//! process keeps serving regardless of any single connection's behavior.

pub mod network;
pub mod registry;
