//! Room registry: exactly one live room per external identifier.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::RoomHandle;
use crate::room::spawn_room;

/// Creates rooms lazily and hands out handles to them.
///
/// The map is guarded by its own mutex, so arbitrary concurrent callers
/// racing on the same key still observe a single room instance. Rooms
/// live for the process lifetime — there is no teardown path.
pub struct RoomRegistry {
    rooms: Mutex<HashMap<String, RoomHandle>>,
}

impl RoomRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the room for `key`, spawning its actor on first reference.
    pub async fn get_or_create(&self, key: &str) -> RoomHandle {
        let mut rooms = self.rooms.lock().await;
        rooms
            .entry(key.to_string())
            .or_insert_with(|| spawn_room(key))
            .clone()
    }

    /// Returns the room for `key` only if it already exists.
    pub async fn get(&self, key: &str) -> Option<RoomHandle> {
        self.rooms.lock().await.get(key).cloned()
    }

    /// Number of rooms created so far.
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
