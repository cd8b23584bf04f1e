//! Room actor: an isolated Tokio task that owns one room's state and its
//! subscriber list.
//!
//! Every operation on a room travels through the actor's mpsc channel, so
//! mutate → snapshot → broadcast executes as one indivisible sequence and
//! operations on the same room can never interleave. The broadcast step
//! only enqueues onto per-subscriber channels — actual socket I/O happens
//! in the subscribers' own tasks, so a stalled viewer never blocks the
//! game for anyone else.

use fracas_protocol::{Move, RoundOutcome, Slot, StateSnapshot};
use tokio::sync::{mpsc, oneshot};

use crate::state::Room;
use crate::{RoomError, rules};

/// Command channel size for room actors.
const CHANNEL_SIZE: usize = 64;

/// Receiving end of a room's snapshot stream. The first item is a
/// synchronization snapshot; each subsequent item follows a mutation.
pub type SnapshotReceiver = mpsc::UnboundedReceiver<StateSnapshot>;

/// Commands sent to a room actor. Variants with a `oneshot::Sender` are
/// request/reply; the caller awaits the response on that channel.
pub(crate) enum RoomCommand {
    Join {
        name_hint: Option<String>,
        reply: oneshot::Sender<StateSnapshot>,
    },
    SubmitMove {
        slot: Slot,
        mv: Move,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    SubmitAction {
        slot: Slot,
        action: String,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Subscribe {
        reply: oneshot::Sender<SnapshotReceiver>,
    },
    Info {
        reply: oneshot::Sender<RoomInfo>,
    },
}

/// A snapshot of room metadata (not the game state itself).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub key: String,
    pub round: u32,
    pub subscribers: usize,
    pub game_over: bool,
}

/// Handle to a running room actor. Cheap to clone — an `mpsc::Sender`
/// plus the room key.
#[derive(Clone)]
pub struct RoomHandle {
    key: String,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// The external identifier this room was created under.
    pub fn key(&self) -> &str {
        &self.key
    }

    fn unavailable(&self) -> RoomError {
        RoomError::Unavailable(self.key.clone())
    }

    /// Registers a join: optionally normalizes a slot name, broadcasts a
    /// "joined" snapshot, and returns that snapshot to the caller.
    pub async fn join(
        &self,
        name_hint: Option<&str>,
    ) -> Result<StateSnapshot, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                name_hint: name_hint.map(str::to_string),
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    /// Submits a round move for a slot.
    pub async fn submit_move(&self, slot: Slot, mv: Move) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::SubmitMove {
                slot,
                mv,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())?
    }

    /// Submits the winner's follow-up action.
    pub async fn submit_action(
        &self,
        slot: Slot,
        action: &str,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::SubmitAction {
                slot,
                action: action.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())?
    }

    /// Registers a new subscriber and returns its snapshot stream.
    pub async fn subscribe(&self) -> Result<SnapshotReceiver, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Subscribe { reply: reply_tx })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    /// Requests current room metadata.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())
    }
}

/// The internal room actor. Runs inside a Tokio task.
struct RoomActor {
    key: String,
    room: Room,
    subscribers: Vec<mpsc::UnboundedSender<StateSnapshot>>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(room = %self.key, "room opened");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join { name_hint, reply } => {
                    let snapshot = self.handle_join(name_hint.as_deref());
                    let _ = reply.send(snapshot);
                }
                RoomCommand::SubmitMove { slot, mv, reply } => {
                    let _ = reply.send(self.handle_submit_move(slot, mv));
                }
                RoomCommand::SubmitAction { slot, action, reply } => {
                    let _ = reply.send(self.handle_submit_action(slot, &action));
                }
                RoomCommand::Subscribe { reply } => {
                    let _ = reply.send(self.handle_subscribe());
                }
                RoomCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }
            }
        }

        tracing::info!(room = %self.key, "room closed");
    }

    fn handle_join(&mut self, name_hint: Option<&str>) -> StateSnapshot {
        self.room.note_join(name_hint);
        tracing::info!(room = %self.key, hint = ?name_hint, "participant joined");

        let mut snapshot = self.room.snapshot();
        snapshot.message = Some("joined".to_string());
        self.broadcast(snapshot.clone());
        snapshot
    }

    fn handle_submit_move(&mut self, slot: Slot, mv: Move) -> Result<(), RoomError> {
        if self.room.game_over {
            return Err(RoomError::GameOver(self.key.clone()));
        }

        // First write wins; repeats before resolution are ignored.
        if self.room.move_for(slot).is_none() {
            self.room.set_move(slot, mv);
            tracing::debug!(room = %self.key, %slot, %mv, "move recorded");
        }

        // Resolve exactly once per round, when both moves are in.
        if self.room.result.is_none() {
            if let (Some(a), Some(b)) = (self.room.move_a, self.room.move_b) {
                let outcome = rules::compare_moves(a, b);
                self.room.result = Some(outcome);
                self.room.pending_actor = outcome.winner();
                tracing::info!(
                    room = %self.key,
                    round = self.room.round,
                    ?outcome,
                    "round resolved"
                );
            }
        }

        // The snapshot keeps the moves visible even on a draw; the state
        // itself clears right after so a fresh exchange can begin.
        let snapshot = self.room.snapshot();
        if self.room.result == Some(RoundOutcome::Draw) {
            self.room.clear_exchange();
        }
        self.broadcast(snapshot);
        Ok(())
    }

    fn handle_submit_action(&mut self, slot: Slot, action: &str) -> Result<(), RoomError> {
        if self.room.game_over {
            return Err(RoomError::GameOver(self.key.clone()));
        }
        if self.room.pending_actor != Some(slot) {
            return Err(RoomError::NotYourTurn {
                room: self.key.clone(),
                slot,
            });
        }

        let (winner, loser) = self.room.pair_mut(slot);
        let gain = rules::apply_followup(action, winner, loser);
        winner.score += gain;
        let winner_name = winner.name.clone();
        // Threshold check against the acting slot only; the other score
        // cannot have changed here.
        let game_over = winner.score >= rules::WIN_THRESHOLD;

        self.room.round += 1;
        self.room.clear_exchange();
        self.room.pending_actor = None;
        self.room.game_over = game_over;

        tracing::info!(
            room = %self.key,
            %slot,
            action,
            gain,
            score = self.room.participant(slot).score,
            game_over,
            "follow-up applied"
        );

        let mut snapshot = self.room.snapshot();
        snapshot.last_action = Some(action.to_string());
        snapshot.actor = Some(slot);
        snapshot.winner_name = Some(winner_name);
        snapshot.game_over = Some(game_over);
        self.broadcast(snapshot);
        Ok(())
    }

    fn handle_subscribe(&mut self) -> SnapshotReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        tracing::debug!(
            room = %self.key,
            subscribers = self.subscribers.len(),
            "subscriber added"
        );

        // Fresh sync snapshot for everyone, the new subscriber included.
        let mut snapshot = self.room.snapshot();
        snapshot.message = Some("init".to_string());
        self.broadcast(snapshot);
        rx
    }

    /// Delivers a snapshot to every live subscriber. A failed send means
    /// the receiver is gone; that subscriber is dropped silently and the
    /// rest still get the snapshot.
    fn broadcast(&mut self, snapshot: StateSnapshot) {
        let before = self.subscribers.len();
        self.subscribers
            .retain(|sub| sub.send(snapshot.clone()).is_ok());
        let pruned = before - self.subscribers.len();
        if pruned > 0 {
            tracing::debug!(room = %self.key, pruned, "dropped dead subscribers");
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            key: self.key.clone(),
            round: self.room.round,
            subscribers: self.subscribers.len(),
            game_over: self.room.game_over,
        }
    }
}

/// Spawns a new room actor task and returns a handle to it.
pub(crate) fn spawn_room(key: &str) -> RoomHandle {
    let (tx, rx) = mpsc::channel(CHANNEL_SIZE);

    let actor = RoomActor {
        key: key.to_string(),
        room: Room::new(),
        subscribers: Vec::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        key: key.to_string(),
        sender: tx,
    }
}
