//! WebSocket room subscription handler.

use std::sync::Arc;

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use typerace_core::domain::{RoomId, RoomStore, RoomSubscription};

use crate::{error::ApiError, infrastructure::dto::websocket::RoomFrame, ui::state::AppState};

/// Upgrade to a WebSocket that streams snapshots of one room.
///
/// The subscription is opened before the upgrade so an unknown room is
/// answered with a plain 404.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = RoomId::parse(&room_id)?;
    let subscription = state.store.subscribe(&id).await?;
    tracing::info!("Subscriber attached to room {}", id);
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, id, subscription)))
}

async fn handle_socket(socket: WebSocket, room_id: RoomId, mut subscription: RoomSubscription) {
    let (mut sender, mut receiver) = socket.split();

    // Forward every committed snapshot; announce the end of the room when the stream closes
    let closed_id = room_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(room) = subscription.recv().await {
            if !send_frame(&mut sender, &RoomFrame::Snapshot { room }).await {
                return;
            }
        }
        let frame = RoomFrame::RoomClosed { room_id: closed_id };
        if send_frame(&mut sender, &frame).await {
            let _ = sender.send(Message::Close(None)).await;
        }
    });

    // Subscribers only listen; drain until the peer goes away
    let peer_id = room_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    tracing::debug!("Subscriber of room {} requested close", peer_id);
                    break;
                }
                Ok(Message::Text(text)) => {
                    tracing::debug!("Ignoring text from subscriber of {}: {}", peer_id, text);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("WebSocket error on room {}: {}", peer_id, e);
                    break;
                }
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    tracing::info!("Subscriber detached from room {}", room_id);
}

async fn send_frame<S>(sender: &mut S, frame: &RoomFrame) -> bool
where
    S: SinkExt<Message> + Unpin,
{
    let json = match serde_json::to_string(frame) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to encode room frame: {}", e);
            return false;
        }
    };
    sender.send(Message::Text(json.into())).await.is_ok()
}
