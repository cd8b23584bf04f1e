//! Per-room mutable state: two participants, pending moves, the turn gate.
//!
//! `Room` is plain data. It is owned by exactly one room actor and only
//! ever mutated there, so nothing here needs synchronization.

use fracas_protocol::{Move, ParticipantSnapshot, RoundOutcome, Slot, StateSnapshot};

fn clamp100(v: i32) -> i32 {
    v.clamp(0, 100)
}

/// One participant: display name, cumulative score, and the three bounded
/// mood attributes. Every attribute write goes through a clamping adder,
/// so values outside [0, 100] cannot exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantState {
    pub name: String,
    pub score: u32,
    pub pressure: i32,
    pub resolve: i32,
    pub poise: i32,
}

impl ParticipantState {
    /// A fresh participant: score 0, pressure 50, resolve 25, poise 0.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            score: 0,
            pressure: 50,
            resolve: 25,
            poise: 0,
        }
    }

    pub fn add_pressure(&mut self, delta: i32) {
        self.pressure = clamp100(self.pressure + delta);
    }

    pub fn add_resolve(&mut self, delta: i32) {
        self.resolve = clamp100(self.resolve + delta);
    }

    pub fn add_poise(&mut self, delta: i32) {
        self.poise = clamp100(self.poise + delta);
    }

    fn snapshot(&self) -> ParticipantSnapshot {
        ParticipantSnapshot {
            name: self.name.clone(),
            score: self.score,
            pressure: self.pressure,
            resolve: self.resolve,
            poise: self.poise,
        }
    }
}

/// The mutable record for one room.
///
/// Invariants, upheld by the actor in `room.rs`:
/// - `pending_actor` is non-`None` only while a resolved round awaits its
///   winner's follow-up; it clears together with the moves.
/// - `result` latches the current round's outcome so resolution fires
///   exactly once per round, no matter how many times moves are re-sent.
/// - once `game_over` is set the room rejects every further operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Room {
    pub(crate) slot_a: ParticipantState,
    pub(crate) slot_b: ParticipantState,
    pub(crate) move_a: Option<Move>,
    pub(crate) move_b: Option<Move>,
    pub(crate) round: u32,
    pub(crate) result: Option<RoundOutcome>,
    pub(crate) pending_actor: Option<Slot>,
    pub(crate) game_over: bool,
}

impl Room {
    pub(crate) fn new() -> Self {
        Self {
            slot_a: ParticipantState::new(Slot::A.display_name()),
            slot_b: ParticipantState::new(Slot::B.display_name()),
            move_a: None,
            move_b: None,
            round: 1,
            result: None,
            pending_actor: None,
            game_over: false,
        }
    }

    pub(crate) fn participant(&self, slot: Slot) -> &ParticipantState {
        match slot {
            Slot::A => &self.slot_a,
            Slot::B => &self.slot_b,
        }
    }

    /// Mutable access to (winner, loser) for a follow-up.
    pub(crate) fn pair_mut(
        &mut self,
        winner: Slot,
    ) -> (&mut ParticipantState, &mut ParticipantState) {
        match winner {
            Slot::A => (&mut self.slot_a, &mut self.slot_b),
            Slot::B => (&mut self.slot_b, &mut self.slot_a),
        }
    }

    pub(crate) fn move_for(&self, slot: Slot) -> Option<Move> {
        match slot {
            Slot::A => self.move_a,
            Slot::B => self.move_b,
        }
    }

    pub(crate) fn set_move(&mut self, slot: Slot, mv: Move) {
        match slot {
            Slot::A => self.move_a = Some(mv),
            Slot::B => self.move_b = Some(mv),
        }
    }

    /// Clears the current exchange: both moves and the latched outcome.
    pub(crate) fn clear_exchange(&mut self) {
        self.move_a = None;
        self.move_b = None;
        self.result = None;
    }

    /// Normalizes a slot's display name when the join hint matches a
    /// recognized label. Unrecognized hints are ignored.
    pub(crate) fn note_join(&mut self, hint: Option<&str>) {
        let Some(hint) = hint else { return };
        for slot in [Slot::A, Slot::B] {
            if hint.eq_ignore_ascii_case(slot.display_name()) {
                match slot {
                    Slot::A => self.slot_a.name = slot.display_name().to_string(),
                    Slot::B => self.slot_b.name = slot.display_name().to_string(),
                }
            }
        }
    }

    /// Builds a full snapshot of the current state, transient event
    /// fields unset (the actor fills those per operation).
    pub(crate) fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            round: self.round,
            slot_a: self.slot_a.snapshot(),
            slot_b: self.slot_b.snapshot(),
            move_a: self.move_a.map(Move::as_str).unwrap_or("").to_string(),
            move_b: self.move_b.map(Move::as_str).unwrap_or("").to_string(),
            result: self.result,
            pending_actor: self.pending_actor,
            message: None,
            last_action: None,
            actor: None,
            winner_name: None,
            game_over: None,
        }
    }
}
