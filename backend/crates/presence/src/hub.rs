//! Presence hub
//!
//! The registry plus the channels events travel on: one broadcast channel
//! every socket listens to, and one room per online user (`user-{id}`)
//! for events aimed at that user alone.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use crate::event::PresenceEvent;
use crate::registry::PresenceRegistry;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

pub fn room_name(user_id: &str) -> String {
    format!("user-{}", user_id)
}

/// Receivers handed to a freshly joined socket
pub struct Membership {
    /// Events for everyone
    pub events: broadcast::Receiver<PresenceEvent>,
    /// Events for this user's room
    pub room: broadcast::Receiver<PresenceEvent>,
}

pub struct PresenceHub {
    registry: PresenceRegistry,
    events: broadcast::Sender<PresenceEvent>,
    rooms: Mutex<HashMap<String, broadcast::Sender<PresenceEvent>>>,
    capacity: usize,
}

impl Default for PresenceHub {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl PresenceHub {
    pub fn new(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity);
        Self {
            registry: PresenceRegistry::new(),
            events,
            rooms: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    pub fn registry(&self) -> &PresenceRegistry {
        &self.registry
    }

    fn rooms(&self) -> MutexGuard<'_, HashMap<String, broadcast::Sender<PresenceEvent>>> {
        self.rooms.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a socket of `user_id`, then tell everyone, the new socket
    /// included
    pub fn join(&self, user_id: &str) -> Membership {
        let events = self.events.subscribe();

        // Snapshots go out under the rooms lock so listeners see them in
        // registry order
        let mut rooms = self.rooms();
        let room = rooms
            .entry(room_name(user_id))
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe();
        let online = self.registry.connect(user_id);

        self.broadcast(PresenceEvent::RoomJoined);
        self.broadcast(PresenceEvent::GetOnlineUsers(online));
        drop(rooms);

        Membership { events, room }
    }

    /// Unregister a socket of `user_id`. The room closes with the last
    /// socket. Unknown users change nothing and broadcast nothing.
    pub fn leave(&self, user_id: &str) {
        let mut rooms = self.rooms();
        let Some(online) = self.registry.disconnect(user_id) else {
            return;
        };
        if self.registry.count(user_id) == 0 {
            rooms.remove(&room_name(user_id));
        }

        self.broadcast(PresenceEvent::GetOnlineUsers(online));
    }

    /// Send to every socket; returns how many receivers got it
    pub fn broadcast(&self, event: PresenceEvent) -> usize {
        match self.events.send(event) {
            Ok(receivers) => receivers,
            Err(e) => {
                tracing::debug!(event = e.0.name(), "No socket listening");
                0
            }
        }
    }

    /// Send to every socket of `user_id`
    pub fn send_to_user(&self, user_id: &str, event: PresenceEvent) -> usize {
        let rooms = self.rooms();
        rooms
            .get(&room_name(user_id))
            .and_then(|room| room.send(event).ok())
            .unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PresenceEvent> {
        self.events.subscribe()
    }
}
