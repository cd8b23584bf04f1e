//! Error types for the room layer.

use fracas_protocol::Slot;

/// Errors that can occur during room operations.
///
/// A failing operation affects only its own room and its own caller;
/// nothing here is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// A follow-up action arrived from a slot that is not the pending
    /// actor (or while no round is awaiting an action). The room is left
    /// untouched and nothing is broadcast.
    #[error("slot {slot} may not act in room {room} right now")]
    NotYourTurn { room: String, slot: Slot },

    /// The room has reached its score threshold. No further moves or
    /// actions are accepted; continuing requires a fresh room.
    #[error("room {0} is already decided")]
    GameOver(String),

    /// The room's command channel is closed — its actor is gone.
    #[error("room {0} is unavailable")]
    Unavailable(String),
}
