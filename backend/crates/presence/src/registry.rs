//! Online user registry
//!
//! One user may hold several sockets (tabs, devices). The registry counts
//! them and only forgets a user once the last one closes.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
pub struct PresenceRegistry {
    connections: Mutex<HashMap<String, usize>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, usize>> {
        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Count one more socket for `user_id`; returns the online users
    pub fn connect(&self, user_id: &str) -> Vec<String> {
        let mut connections = self.lock();
        *connections.entry(user_id.to_string()).or_insert(0) += 1;
        sorted_ids(&connections)
    }

    /// Count one socket less; `None` when `user_id` was not online
    pub fn disconnect(&self, user_id: &str) -> Option<Vec<String>> {
        let mut connections = self.lock();
        let count = connections.get_mut(user_id)?;

        *count = count.saturating_sub(1);
        if *count == 0 {
            connections.remove(user_id);
        }
        Some(sorted_ids(&connections))
    }

    pub fn online_users(&self) -> Vec<String> {
        sorted_ids(&self.lock())
    }

    /// Open sockets of `user_id`
    pub fn count(&self, user_id: &str) -> usize {
        self.lock().get(user_id).copied().unwrap_or(0)
    }
}

fn sorted_ids(connections: &HashMap<String, usize>) -> Vec<String> {
    let mut ids: Vec<String> = connections.keys().cloned().collect();
    ids.sort();
    ids
}
