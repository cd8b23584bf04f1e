//! Wire protocol for the fracas duel server.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`ClientRequest`], [`ServerMessage`], [`StateSnapshot`],
//!   the [`Slot`]/[`Move`]/[`RoundOutcome`] sums) — the structures that
//!   travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while doing so.
//!
//! The protocol layer sits between transport (raw websocket frames) and the
//! room engine. It knows nothing about connections, rooms, or scoring — it
//! only knows message shapes.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientRequest, Move, ParticipantSnapshot, RoundOutcome, ServerMessage,
    Slot, StateSnapshot,
};
