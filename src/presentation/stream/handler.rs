//! Stream Join Handler
//!
//! Upgrades the join call to a WebSocket and parks the connection task in
//! [`RoomHub::subscribe`] until the client disconnects or the room closes.
//! Messages are sent through the unary RPC; inbound frames on the stream are
//! ignored except for detecting disconnect.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::application::dto::MessageResponse;
use crate::domain::ChatMessage;
use crate::shared::error::AppError;
use crate::startup::AppState;

use super::hub::RoomHub;

/// Join parameters carried in the query string.
#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    pub username: String,
}

/// `GET /api/v1/chats/{chat_id}/connect?username=...`
pub async fn connect_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<i64>,
    Query(params): Query<ConnectParams>,
    ws: WebSocketUpgrade,
) -> Result<Response, AppError> {
    if params.username.trim().is_empty() {
        return Err(AppError::Validation("username must not be empty".into()));
    }

    // Reject joins to unknown chats before upgrading.
    state.chat_service.chat_exists(chat_id).await?;

    Ok(ws.on_upgrade(move |socket| {
        handle_socket(socket, state.hub.clone(), chat_id, params.username)
    }))
}

async fn handle_socket(
    socket: WebSocket,
    hub: std::sync::Arc<RoomHub>,
    chat_id: i64,
    username: String,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (sink_tx, mut sink_rx) = mpsc::unbounded_channel::<ChatMessage>();
    let cancel = CancellationToken::new();

    // Forward fanned-out messages to the socket.
    let writer = tokio::spawn(async move {
        while let Some(message) = sink_rx.recv().await {
            let text = match serde_json::to_string(&MessageResponse::from(&message)) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize message");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Watch the inbound side for disconnect.
    let reader_cancel = cancel.clone();
    let reader = tokio::spawn(async move {
        while let Some(frame) = ws_rx.next().await {
            match frame {
                Ok(Message::Close(_)) | Err(_) => break,
                _ => {}
            }
        }
        reader_cancel.cancel();
    });

    tracing::info!(chat_id, username = %username, "Subscriber connected");

    // Blocks until the client disconnects or the room is closed.
    hub.subscribe(chat_id, &username, sink_tx, cancel.clone()).await;

    cancel.cancel();
    writer.abort();
    reader.abort();

    tracing::info!(chat_id, username = %username, "Subscriber disconnected");
}
