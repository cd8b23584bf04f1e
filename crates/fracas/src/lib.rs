//! # fracas
//!
//! A real-time server for a two-player turn-based contest: both sides pick
//! a move, the server resolves the round, the winner lands a follow-up
//! action that shifts both players' mood attributes and scores points, and
//! the first score past the threshold ends the game.
//!
//! The server is the single source of truth. Clients talk JSON over
//! websockets; every room mutation is fanned out to all of the room's
//! subscribers as a full state snapshot.
//!
//! ```rust,no_run
//! use fracas::FracasServerBuilder;
//!
//! # async fn run() -> Result<(), fracas::FracasError> {
//! let server = FracasServerBuilder::new().bind("0.0.0.0:8080").build().await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;
mod websocket;

pub use error::FracasError;
pub use server::{FracasServer, FracasServerBuilder};
pub use websocket::{WsConnection, WsListener, WsWriter};
