//! Events pushed to sockets
//!
//! Serialized as `{"event": ..., "data": ...}`; events without payload
//! omit `data`.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum PresenceEvent {
    /// Someone opened a socket
    RoomJoined,
    /// Sorted ids of every online user
    GetOnlineUsers(Vec<String>),
}

impl PresenceEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PresenceEvent::RoomJoined => "roomJoined",
            PresenceEvent::GetOnlineUsers(_) => "getOnlineUsers",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_format() {
        assert_eq!(
            serde_json::to_value(PresenceEvent::RoomJoined).unwrap(),
            json!({ "event": "roomJoined" })
        );
        assert_eq!(
            serde_json::to_value(PresenceEvent::GetOnlineUsers(vec!["a".into(), "b".into()]))
                .unwrap(),
            json!({ "event": "getOnlineUsers", "data": ["a", "b"] })
        );
    }
}
