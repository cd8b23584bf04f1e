//! The session engine: the operations the boundary layer calls.
//!
//! Each operation resolves the target room through the registry (creating
//! it on first reference) and then
//! runs against that room's actor, which serializes it with every other
//! operation on the same room. Different rooms never contend.

use fracas_protocol::{Move, Slot, StateSnapshot};

use crate::room::SnapshotReceiver;
use crate::{RoomError, RoomInfo, RoomRegistry};

/// Orchestrates the client-triggered operations against rooms.
///
/// Stateless apart from the injected registry; clone-free because callers
/// share it behind an `Arc`.
pub struct SessionEngine {
    registry: RoomRegistry,
}

impl SessionEngine {
    /// Creates an engine with a fresh registry.
    pub fn new() -> Self {
        Self {
            registry: RoomRegistry::new(),
        }
    }

    /// The underlying registry (mainly for introspection).
    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Enters a room, optionally normalizing a slot display name, and
    /// returns the broadcast "joined" snapshot to the caller.
    pub async fn join(
        &self,
        room: &str,
        name_hint: Option<&str>,
    ) -> Result<StateSnapshot, RoomError> {
        self.registry.get_or_create(room).await.join(name_hint).await
    }

    /// Submits a round move for a slot. Repeat submissions before the
    /// round resolves are ignored, not errors.
    pub async fn submit_move(
        &self,
        room: &str,
        slot: Slot,
        mv: Move,
    ) -> Result<(), RoomError> {
        self.registry
            .get_or_create(room)
            .await
            .submit_move(slot, mv)
            .await
    }

    /// Submits the round winner's follow-up action. Fails with
    /// [`RoomError::NotYourTurn`] unless `slot` is the pending actor.
    pub async fn submit_action(
        &self,
        room: &str,
        slot: Slot,
        action: &str,
    ) -> Result<(), RoomError> {
        self.registry
            .get_or_create(room)
            .await
            .submit_action(slot, action)
            .await
    }

    /// Opens a snapshot stream for a room. The first item synchronizes
    /// the subscriber with the current state.
    pub async fn subscribe(&self, room: &str) -> Result<SnapshotReceiver, RoomError> {
        self.registry.get_or_create(room).await.subscribe().await
    }

    /// Metadata for an existing room, if any.
    pub async fn room_info(&self, room: &str) -> Option<RoomInfo> {
        match self.registry.get(room).await {
            Some(handle) => handle.info().await.ok(),
            None => None,
        }
    }
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new()
    }
}
