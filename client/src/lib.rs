//! # Sync Client Library
//!
//! Client side of the racing game's state synchronization. The client is
//! authoritative for its own car: it runs the shared physics step locally
//! every frame, shows the result immediately, and streams it to the server,
//! which relays it to everyone else. Remote cars are whatever the last
//! protocol message said they were.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! [`game::ViewState`] holds the id-to-player mapping rebuilt from protocol
//! messages in receipt order, plus the frame-driven advance for locally
//! controlled cars. The same advance serves the networked car and the two
//! fixed cars of same-keyboard couch mode; only the routing of the produced
//! update differs.
//!
//! ### Input Module (`input`)
//! Maps a held-key set to the four control impulses through per-car
//! [`input::KeyBindings`] (WASD and arrows are disjoint so two cars can share
//! one keyboard). [`input::ControlSource`] is the seam between the simulation
//! loop and whatever produces input: a window's key events or a script.
//!
//! ### Network Module (`network`)
//! [`network::SyncClient`] owns the WebSocket connection and the select loop
//! interleaving inbound message application with the ~60 Hz frame tick.
//! Outbound updates carry the full kinematic state and are fire-and-forget;
//! a lost connection drops them rather than queueing.
//!
//! Rendering is deliberately absent: a renderer is a collaborator that reads
//! the view through [`network::SyncClient::view`] and feeds key events into a
//! shared [`input::HeldKeys`].

pub mod game;
pub mod input;
pub mod network;
