//! WebSocket endpoint
//!
//! `GET /socket?id=<userId>`. The id is taken as given; sockets without
//! one are closed right after the upgrade.

use std::sync::Arc;

use axum::Router;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use axum::routing::get;
use futures_util::{Sink, SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;

use crate::error::{PresenceError, PresenceResult};
use crate::event::PresenceEvent;
use crate::hub::{Membership, PresenceHub};

#[derive(Debug, Default, Deserialize)]
pub struct SocketQuery {
    pub id: Option<String>,
}

impl SocketQuery {
    /// Trimmed, non-empty id
    pub fn user_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

/// GET /socket
pub async fn presence_socket(
    State(hub): State<Arc<PresenceHub>>,
    Query(query): Query<SocketQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    let user_id = query.user_id().map(str::to_string);

    ws.on_upgrade(move |socket| async move {
        match user_id {
            Some(user_id) => run_session(socket, hub, user_id).await,
            None => reject(socket).await,
        }
    })
}

async fn reject(mut socket: WebSocket) {
    PresenceError::MissingUserId.log();
    // The peer may already be gone
    let _ = socket.send(Message::Close(None)).await;
}

async fn run_session(socket: WebSocket, hub: Arc<PresenceHub>, user_id: String) {
    let Membership {
        mut events,
        mut room,
    } = hub.join(&user_id);
    tracing::info!(user_id = %user_id, "User online");

    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                event = events.recv() => event,
                event = room.recv() => event,
            };
            match event {
                Ok(event) => {
                    if let Err(e) = forward(&mut sender, &event).await {
                        e.log();
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Presence socket lagging behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Clients only listen; incoming frames matter for close detection
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            if matches!(message, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    hub.leave(&user_id);
    tracing::info!(user_id = %user_id, "User offline");
}

async fn forward<S>(sender: &mut S, event: &PresenceEvent) -> PresenceResult<()>
where
    S: Sink<Message, Error = axum::Error> + Unpin,
{
    let text = serde_json::to_string(event)?;
    sender.send(Message::Text(text.into())).await?;
    Ok(())
}

/// `/socket`
pub fn presence_router(hub: Arc<PresenceHub>) -> Router {
    Router::new()
        .route("/", get(presence_socket))
        .with_state(hub)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_user_id() {
        let query = SocketQuery {
            id: Some("  42 ".to_string()),
        };
        assert_eq!(query.user_id(), Some("42"));

        let blank = SocketQuery {
            id: Some("   ".to_string()),
        };
        assert_eq!(blank.user_id(), None);
        assert_eq!(SocketQuery::default().user_id(), None);
    }
}
