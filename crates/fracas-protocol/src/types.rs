//! Message types for the fracas wire protocol.
//!
//! Everything here is serialized as JSON. The snapshot shape is the contract
//! with client UIs, so field names are fixed (camelCase) and covered by
//! tests — a mismatch means the client can't render the game.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// One of the two fixed participant positions in a room.
///
/// A closed sum instead of a string sentinel: the compiler guarantees there
/// is no third participant and no "B " typo anywhere in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    /// Returns the opposing slot.
    pub fn other(self) -> Slot {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }

    /// Canonical display name for this slot ("Player A" / "Player B").
    pub fn display_name(self) -> &'static str {
        match self {
            Slot::A => "Player A",
            Slot::B => "Player B",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::A => write!(f, "A"),
            Slot::B => write!(f, "B"),
        }
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// A round move. The only three legal tokens are `rock`, `paper`,
/// and `scissors`; anything else is rejected at the boundary with
/// [`ProtocolError::InvalidMove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    /// The wire token for this move.
    pub fn as_str(self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
        }
    }
}

impl FromStr for Move {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rock" => Ok(Move::Rock),
            "paper" => Ok(Move::Paper),
            "scissors" => Ok(Move::Scissors),
            other => Err(ProtocolError::InvalidMove(other.to_string())),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RoundOutcome
// ---------------------------------------------------------------------------

/// The result of comparing both slots' moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundOutcome {
    AWins,
    BWins,
    Draw,
}

impl RoundOutcome {
    /// The winning slot, or `None` on a draw.
    pub fn winner(self) -> Option<Slot> {
        match self {
            RoundOutcome::AWins => Some(Slot::A),
            RoundOutcome::BWins => Some(Slot::B),
            RoundOutcome::Draw => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// One participant's public state as serialized in every snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSnapshot {
    /// Display name ("Player A" unless a join hint renamed it).
    pub name: String,
    /// Cumulative score. Never decreases; the game ends at 50.
    pub score: u32,
    /// Mood attribute, clamped to [0, 100].
    pub pressure: i32,
    /// Mood attribute, clamped to [0, 100].
    pub resolve: i32,
    /// Mood attribute, clamped to [0, 100].
    pub poise: i32,
}

/// The full room state pushed to every subscriber after each mutation.
///
/// The trailing optional fields are *transient*: they describe the event
/// that triggered this snapshot and are serialized only when present.
/// Consumers must treat an absent field as "no event of that kind this
/// update", not as zero/false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    /// Round counter, starts at 1.
    pub round: u32,
    pub slot_a: ParticipantSnapshot,
    pub slot_b: ParticipantSnapshot,
    /// Slot A's submitted move token, or `""` when not yet submitted.
    pub move_a: String,
    /// Slot B's submitted move token, or `""` when not yet submitted.
    pub move_b: String,
    /// The current round's outcome, once both moves have been compared.
    pub result: Option<RoundOutcome>,
    /// The slot authorized to submit the next follow-up action.
    pub pending_actor: Option<Slot>,

    /// Informational note ("joined", "init").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The follow-up action just taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_action: Option<String>,
    /// The slot that took it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<Slot>,
    /// Display name of the round winner who acted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_name: Option<String>,
    /// Present (and true) only on the snapshot that ends the game.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_over: Option<bool>,
}

// ---------------------------------------------------------------------------
// Requests and replies
// ---------------------------------------------------------------------------

/// Messages clients send to the server, one JSON object per frame.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON, e.g.
/// `{ "type": "SubmitMove", "room": "r1", "slot": "A", "move": "rock" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientRequest {
    /// Enter a room (creating it on first reference), optionally hinting
    /// a display name for a slot.
    Join {
        room: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },

    /// Submit this round's move for a slot. The move travels as a raw
    /// token so the server owns validation.
    SubmitMove {
        room: String,
        slot: Slot,
        #[serde(rename = "move")]
        mv: String,
    },

    /// Submit the follow-up action for the round's winning slot.
    SubmitAction {
        room: String,
        slot: Slot,
        action: String,
    },

    /// Open a long-lived snapshot stream for a room on this connection.
    Subscribe { room: String },
}

/// Messages the server sends back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// The request was accepted. The resulting state arrives via the
    /// snapshot stream, not in this reply.
    Ack,

    /// A full state snapshot (join reply, or a subscription push).
    State { snapshot: StateSnapshot },

    /// The request was rejected. `code` follows HTTP conventions
    /// (400 malformed, 403 not your turn, 409 game over).
    Error { code: u16, message: String },
}

// =========================================================================
// Tests
// =========================================================================
