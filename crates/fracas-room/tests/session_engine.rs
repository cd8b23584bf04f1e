//! Integration tests for the session engine: turn gating, scoring,
//! broadcasting, and room isolation.

use std::time::Duration;

use fracas_protocol::{Move, RoundOutcome, Slot, StateSnapshot};
use fracas_room::{RoomError, SessionEngine, SnapshotReceiver};
use tokio::time::timeout;

// =========================================================================
// Helpers
// =========================================================================

async fn next_snapshot(rx: &mut SnapshotReceiver) -> StateSnapshot {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for snapshot")
        .expect("snapshot stream ended")
}

async fn assert_no_snapshot(rx: &mut SnapshotReceiver) {
    assert!(
        timeout(Duration::from_millis(100), rx.recv()).await.is_err(),
        "unexpected snapshot was broadcast"
    );
}

/// Drives a full round: both moves, then the winner's follow-up.
async fn play_round(engine: &SessionEngine, room: &str, winner: Slot, action: &str) {
    // The winner's move beats the loser's.
    let (move_a, move_b) = match winner {
        Slot::A => (Move::Rock, Move::Scissors),
        Slot::B => (Move::Scissors, Move::Rock),
    };
    engine.submit_move(room, Slot::A, move_a).await.unwrap();
    engine.submit_move(room, Slot::B, move_b).await.unwrap();
    engine.submit_action(room, winner, action).await.unwrap();
}

// =========================================================================
// Join
// =========================================================================

#[tokio::test]
async fn test_join_creates_room_and_returns_initial_snapshot() {
    let engine = SessionEngine::new();
    let snap = engine.join("r1", None).await.unwrap();

    assert_eq!(snap.round, 1);
    assert_eq!(snap.message.as_deref(), Some("joined"));
    assert_eq!(snap.slot_a.score, 0);
    assert_eq!(
        (snap.slot_a.pressure, snap.slot_a.resolve, snap.slot_a.poise),
        (50, 25, 0)
    );
    assert_eq!(snap.move_a, "");
    assert_eq!(snap.result, None);
    assert_eq!(snap.pending_actor, None);
    assert_eq!(engine.registry().room_count().await, 1);
}

#[tokio::test]
async fn test_join_is_broadcast_to_subscribers() {
    let engine = SessionEngine::new();
    let mut rx = engine.subscribe("r1").await.unwrap();
    let init = next_snapshot(&mut rx).await;
    assert_eq!(init.message.as_deref(), Some("init"));

    engine.join("r1", Some("Player B")).await.unwrap();
    let snap = next_snapshot(&mut rx).await;
    assert_eq!(snap.message.as_deref(), Some("joined"));
    assert_eq!(snap.slot_b.name, "Player B");
}

// =========================================================================
// Moves and resolution
// =========================================================================

#[tokio::test]
async fn test_round_resolves_when_both_moves_present() {
    let engine = SessionEngine::new();
    let mut rx = engine.subscribe("r1").await.unwrap();
    let _ = next_snapshot(&mut rx).await;

    engine.submit_move("r1", Slot::A, Move::Rock).await.unwrap();
    let snap = next_snapshot(&mut rx).await;
    assert_eq!(snap.move_a, "rock");
    assert_eq!(snap.result, None);
    assert_eq!(snap.pending_actor, None);

    engine
        .submit_move("r1", Slot::B, Move::Scissors)
        .await
        .unwrap();
    let snap = next_snapshot(&mut rx).await;
    assert_eq!(snap.move_a, "rock");
    assert_eq!(snap.move_b, "scissors");
    assert_eq!(snap.result, Some(RoundOutcome::AWins));
    assert_eq!(snap.pending_actor, Some(Slot::A));
}

#[tokio::test]
async fn test_first_move_write_wins() {
    let engine = SessionEngine::new();
    engine.submit_move("r1", Slot::A, Move::Rock).await.unwrap();
    // Second submission for the same slot is ignored, not an error.
    engine
        .submit_move("r1", Slot::A, Move::Paper)
        .await
        .unwrap();
    engine
        .submit_move("r1", Slot::B, Move::Scissors)
        .await
        .unwrap();

    let mut rx = engine.subscribe("r1").await.unwrap();
    let snap = next_snapshot(&mut rx).await;
    assert_eq!(snap.move_a, "rock");
    assert_eq!(snap.result, Some(RoundOutcome::AWins));
}

#[tokio::test]
async fn test_draw_shows_moves_then_clears_them() {
    let engine = SessionEngine::new();
    let mut rx = engine.subscribe("r1").await.unwrap();
    let _ = next_snapshot(&mut rx).await;

    engine.submit_move("r1", Slot::A, Move::Rock).await.unwrap();
    engine.submit_move("r1", Slot::B, Move::Rock).await.unwrap();
    let _ = next_snapshot(&mut rx).await;
    let snap = next_snapshot(&mut rx).await;

    // The draw snapshot still displays both moves.
    assert_eq!(snap.result, Some(RoundOutcome::Draw));
    assert_eq!(snap.move_a, "rock");
    assert_eq!(snap.move_b, "rock");
    assert_eq!(snap.pending_actor, None);

    // But the room itself is reset: a fresh exchange resolves normally.
    engine
        .submit_move("r1", Slot::A, Move::Paper)
        .await
        .unwrap();
    engine.submit_move("r1", Slot::B, Move::Rock).await.unwrap();
    let snap = next_snapshot(&mut rx).await;
    assert_eq!(snap.move_a, "paper");
    let snap = next_snapshot(&mut rx).await;
    assert_eq!(snap.result, Some(RoundOutcome::AWins));
    assert_eq!(snap.pending_actor, Some(Slot::A));
}

#[tokio::test]
async fn test_concurrent_moves_resolve_exactly_once() {
    let engine = std::sync::Arc::new(SessionEngine::new());
    let mut rx = engine.subscribe("r1").await.unwrap();
    let _ = next_snapshot(&mut rx).await;

    let e1 = std::sync::Arc::clone(&engine);
    let e2 = std::sync::Arc::clone(&engine);
    let (ra, rb) = tokio::join!(
        tokio::spawn(async move { e1.submit_move("r1", Slot::A, Move::Paper).await }),
        tokio::spawn(async move { e2.submit_move("r1", Slot::B, Move::Rock).await }),
    );
    ra.unwrap().unwrap();
    rb.unwrap().unwrap();

    // Two move snapshots, exactly one carrying the resolution,
    // regardless of arrival order.
    let first = next_snapshot(&mut rx).await;
    let second = next_snapshot(&mut rx).await;
    let resolved: Vec<_> = [&first, &second]
        .into_iter()
        .filter(|s| s.result.is_some())
        .collect();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].result, Some(RoundOutcome::AWins));
    assert_eq!(resolved[0].pending_actor, Some(Slot::A));
}

// =========================================================================
// Follow-up actions
// =========================================================================

#[tokio::test]
async fn test_punch_scenario_from_fresh_room() {
    let engine = SessionEngine::new();
    let mut rx = engine.subscribe("r1").await.unwrap();
    let _ = next_snapshot(&mut rx).await;

    engine.submit_move("r1", Slot::A, Move::Rock).await.unwrap();
    engine
        .submit_move("r1", Slot::B, Move::Scissors)
        .await
        .unwrap();
    let _ = next_snapshot(&mut rx).await;
    let resolved = next_snapshot(&mut rx).await;
    assert_eq!(resolved.result, Some(RoundOutcome::AWins));
    assert_eq!(resolved.pending_actor, Some(Slot::A));

    engine.submit_action("r1", Slot::A, "Punch").await.unwrap();
    let snap = next_snapshot(&mut rx).await;

    // Baseline then Punch: poise 0 → 20, resolve 25 → 30, pressure 50 → 40;
    // gain = max(0, 2 + ceil(40*.05) - ceil(30*.025) - ceil(20*.01)) = 2.
    assert_eq!(
        (snap.slot_a.pressure, snap.slot_a.resolve, snap.slot_a.poise),
        (40, 30, 20)
    );
    assert_eq!(snap.slot_a.score, 2);
    assert_eq!(snap.round, 2);
    assert_eq!(snap.move_a, "");
    assert_eq!(snap.move_b, "");
    assert_eq!(snap.result, None);
    assert_eq!(snap.pending_actor, None);
    assert_eq!(snap.last_action.as_deref(), Some("Punch"));
    assert_eq!(snap.actor, Some(Slot::A));
    assert_eq!(snap.winner_name.as_deref(), Some("Player A"));
    assert_eq!(snap.game_over, Some(false));
}

#[tokio::test]
async fn test_action_without_pending_actor_is_rejected_without_mutation() {
    let engine = SessionEngine::new();
    let before = engine.join("r1", None).await.unwrap();

    let err = engine.submit_action("r1", Slot::A, "Slap").await.unwrap_err();
    assert!(matches!(
        err,
        RoomError::NotYourTurn { slot: Slot::A, .. }
    ));

    // Byte-for-byte unchanged state (the join note aside, snapshots from
    // identical state are identical).
    let after = engine.join("r1", None).await.unwrap();
    assert_eq!(
        serde_json::to_vec(&before).unwrap(),
        serde_json::to_vec(&after).unwrap()
    );
}

#[tokio::test]
async fn test_action_from_wrong_slot_is_rejected_and_not_broadcast() {
    let engine = SessionEngine::new();
    engine.submit_move("r1", Slot::A, Move::Rock).await.unwrap();
    engine
        .submit_move("r1", Slot::B, Move::Scissors)
        .await
        .unwrap();

    let mut rx = engine.subscribe("r1").await.unwrap();
    let init = next_snapshot(&mut rx).await;
    assert_eq!(init.pending_actor, Some(Slot::A));

    let err = engine.submit_action("r1", Slot::B, "Kick").await.unwrap_err();
    assert!(matches!(err, RoomError::NotYourTurn { slot: Slot::B, .. }));
    assert_no_snapshot(&mut rx).await;

    // The rightful actor still can act.
    engine.submit_action("r1", Slot::A, "Kick").await.unwrap();
    let snap = next_snapshot(&mut rx).await;
    assert_eq!(snap.actor, Some(Slot::A));
    assert_eq!(snap.slot_a.score, 3);
}

#[tokio::test]
async fn test_unrecognized_action_is_a_scoreless_no_op_followup() {
    let engine = SessionEngine::new();
    engine.submit_move("r1", Slot::A, Move::Rock).await.unwrap();
    engine
        .submit_move("r1", Slot::B, Move::Scissors)
        .await
        .unwrap();
    engine
        .submit_action("r1", Slot::A, "Headbutt")
        .await
        .unwrap();

    let mut rx = engine.subscribe("r1").await.unwrap();
    let snap = next_snapshot(&mut rx).await;
    // Baseline applied, nothing scored, round advanced.
    assert_eq!(snap.slot_a.score, 0);
    assert_eq!(
        (snap.slot_a.pressure, snap.slot_a.resolve, snap.slot_a.poise),
        (40, 30, 10)
    );
    assert_eq!(snap.round, 2);
}

#[tokio::test]
async fn test_mood_attributes_stay_bounded_across_many_rounds() {
    let engine = SessionEngine::new();
    for i in 0..40 {
        let winner = if i % 2 == 0 { Slot::A } else { Slot::B };
        let action = ["Slap", "Punch", "Kick"][i % 3];
        play_round(&engine, "r1", winner, action).await;
        let info = engine.room_info("r1").await.unwrap();
        if info.game_over {
            break;
        }
    }

    let snap = engine.join("r1", None).await.unwrap();
    for p in [&snap.slot_a, &snap.slot_b] {
        assert!((0..=100).contains(&p.pressure), "pressure {}", p.pressure);
        assert!((0..=100).contains(&p.resolve), "resolve {}", p.resolve);
        assert!((0..=100).contains(&p.poise), "poise {}", p.poise);
    }
}

// =========================================================================
// Game over
// =========================================================================

#[tokio::test]
async fn test_reaching_threshold_latches_game_over_and_rejects_everything() {
    let engine = SessionEngine::new();
    let mut rx = engine.subscribe("grudge").await.unwrap();
    let _ = next_snapshot(&mut rx).await;

    // Trade Kicks until someone crosses 50. Alternating winners keeps the
    // kicker's pressure (and so the gain) from decaying to zero.
    let mut final_round = 0;
    'game: for i in 0..300 {
        let winner = if i % 2 == 0 { Slot::A } else { Slot::B };
        let (move_a, move_b) = match winner {
            Slot::A => (Move::Rock, Move::Scissors),
            Slot::B => (Move::Scissors, Move::Rock),
        };
        engine.submit_move("grudge", Slot::A, move_a).await.unwrap();
        engine.submit_move("grudge", Slot::B, move_b).await.unwrap();
        engine.submit_action("grudge", winner, "Kick").await.unwrap();

        // Drain this round's three snapshots; the action one ends the game.
        let _ = next_snapshot(&mut rx).await;
        let _ = next_snapshot(&mut rx).await;
        let snap = next_snapshot(&mut rx).await;
        assert!(snap.last_action.is_some());
        if snap.game_over == Some(true) {
            let winner_snap = match winner {
                Slot::A => &snap.slot_a,
                Slot::B => &snap.slot_b,
            };
            assert!(winner_snap.score >= 50);
            final_round = snap.round;
            break 'game;
        }
    }
    assert!(final_round > 0, "game never terminated");

    // Terminal room: everything is rejected, nothing mutates, nothing
    // is broadcast.
    let err = engine
        .submit_move("grudge", Slot::A, Move::Rock)
        .await
        .unwrap_err();
    assert!(matches!(err, RoomError::GameOver(_)));
    let err = engine
        .submit_action("grudge", Slot::A, "Kick")
        .await
        .unwrap_err();
    assert!(matches!(err, RoomError::GameOver(_)));
    assert_no_snapshot(&mut rx).await;

    let info = engine.room_info("grudge").await.unwrap();
    assert!(info.game_over);
    assert_eq!(info.round, final_round);
}

// =========================================================================
// Broadcasting and isolation
// =========================================================================

#[tokio::test]
async fn test_dead_subscriber_is_pruned_without_disturbing_the_rest() {
    let engine = SessionEngine::new();
    let mut alive = engine.subscribe("r1").await.unwrap();
    let dead = engine.subscribe("r1").await.unwrap();
    let _ = next_snapshot(&mut alive).await;
    let _ = next_snapshot(&mut alive).await;
    drop(dead);

    // The next publish hits the dead channel, prunes it, and still
    // reaches the live subscriber.
    engine.join("r1", None).await.unwrap();
    let snap = next_snapshot(&mut alive).await;
    assert_eq!(snap.message.as_deref(), Some("joined"));

    let info = engine.room_info("r1").await.unwrap();
    assert_eq!(info.subscribers, 1);
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    let engine = SessionEngine::new();
    let mut rx2 = engine.subscribe("r2").await.unwrap();
    let _ = next_snapshot(&mut rx2).await;

    play_round(&engine, "r1", Slot::A, "Punch").await;

    // r2 saw none of r1's traffic.
    assert_no_snapshot(&mut rx2).await;
    let snap = engine.join("r2", None).await.unwrap();
    assert_eq!(snap.round, 1);
    assert_eq!(snap.slot_a.score, 0);
    assert_eq!(engine.registry().room_count().await, 2);
}

#[tokio::test]
async fn test_registry_returns_the_same_room_per_key() {
    let engine = SessionEngine::new();
    engine.submit_move("r1", Slot::A, Move::Rock).await.unwrap();

    // A later operation under the same key sees the earlier write.
    let mut rx = engine.subscribe("r1").await.unwrap();
    let snap = next_snapshot(&mut rx).await;
    assert_eq!(snap.move_a, "rock");
    assert_eq!(engine.registry().room_count().await, 1);
}
