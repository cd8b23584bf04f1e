//! The rules engine: pure functions over participant state.
//!
//! Nothing in here touches shared state or does I/O — the room actor owns
//! the mutation discipline and calls in with exclusive references.

use fracas_protocol::{Move, RoundOutcome};

use crate::state::ParticipantState;

/// A participant whose score reaches this ends the game.
pub const WIN_THRESHOLD: u32 = 50;

/// Compares both slots' moves. Total over the 3×3 legal space; illegal
/// tokens never get this far (rejected at the boundary).
pub fn compare_moves(a: Move, b: Move) -> RoundOutcome {
    use Move::*;
    if a == b {
        return RoundOutcome::Draw;
    }
    match (a, b) {
        (Rock, Scissors) | (Scissors, Paper) | (Paper, Rock) => RoundOutcome::AWins,
        _ => RoundOutcome::BWins,
    }
}

/// Integer ceiling of `value * factor`, the way the scoring formulas
/// want it (stats are non-negative, so `f64::ceil` is exact here).
fn ceil_of(value: i32, factor: f64) -> i32 {
    (f64::from(value) * factor).ceil() as i32
}

/// Applies a follow-up action by the round winner and returns the score
/// gain (never negative; the winner's score only ever grows).
///
/// Every follow-up starts with the same baseline shift, all writes
/// clamped to [0, 100]: the winner gains poise and resolve and sheds
/// pressure, the loser mirrors it. The bonus term reads the winner's
/// post-baseline stats, before the action-specific deltas land.
///
/// An unrecognized action name keeps the baseline and scores nothing —
/// a deliberate no-op, not an error.
pub fn apply_followup(
    action: &str,
    winner: &mut ParticipantState,
    loser: &mut ParticipantState,
) -> u32 {
    winner.add_poise(10);
    winner.add_resolve(5);
    winner.add_pressure(-10);

    loser.add_poise(-10);
    loser.add_resolve(-5);
    loser.add_pressure(10);

    let mut bonus = ceil_of(winner.pressure, 0.05)
        - ceil_of(winner.resolve, 0.025)
        - ceil_of(winner.poise, 0.01);

    let base = match action {
        "Slap" => {
            winner.add_resolve(15);
            loser.add_poise(-15);
            1
        }
        "Punch" => {
            winner.add_poise(10);
            loser.add_pressure(15);
            loser.add_resolve(-10);
            2
        }
        "Kick" => {
            loser.add_pressure(25);
            loser.add_resolve(-10);
            // Kick scores off a gentler pressure factor.
            bonus = ceil_of(winner.pressure, 0.035)
                - ceil_of(winner.resolve, 0.025)
                - ceil_of(winner.poise, 0.01);
            3
        }
        _ => return 0,
    };

    (base + bonus).max(0) as u32
}
