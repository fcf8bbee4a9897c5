//! Presence Backend Module
//!
//! Tracks who is online through WebSocket connections and pushes the
//! online list to every connected client.
//!
//! - `registry` - connection counts per user
//! - `hub` - registry plus broadcast channel and per-user rooms
//! - `event` - wire format of pushed events
//! - `socket` - the `/socket` endpoint

pub mod error;
pub mod event;
pub mod hub;
pub mod registry;
pub mod socket;


pub use error::{PresenceError, PresenceResult};
pub use event::PresenceEvent;
pub use hub::{Membership, PresenceHub};
pub use registry::PresenceRegistry;
pub use socket::{SocketQuery, presence_router};
