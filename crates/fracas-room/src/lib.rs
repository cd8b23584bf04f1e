//! Room engine for the fracas duel server.
//!
//! Each room runs as an isolated Tokio task (actor model) owning its own
//! game state and subscriber list; all operations on one room are
//! linearized through the actor's command channel, so two concurrent move
//! submissions can never observe an inconsistent "both moves present".
//!
//! # Key types
//!
//! - [`SessionEngine`] — the facade the boundary layer calls
//!   (join / submit_move / submit_action / subscribe)
//! - [`RoomRegistry`] — one live room per string key, created lazily
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`rules`] — the pure move-comparison and follow-up scoring functions
//! - [`RoomError`] — turn violations, terminal rooms, dead actors

mod engine;
mod error;
mod registry;
mod room;
pub mod rules;
mod state;

pub use engine::SessionEngine;
pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::{RoomHandle, RoomInfo, SnapshotReceiver};
pub use state::ParticipantState;
