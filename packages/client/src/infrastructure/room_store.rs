//! Room store backed by the remote room host.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite};
use tracing::{debug, info, warn};
use typerace_core::domain::{Room, RoomId, RoomPatch, RoomStore, RoomSubscription, StoreError};
use typerace_server::infrastructure::dto::websocket::RoomFrame;

use super::http::{ApiClient, check, transport_error};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct RemoteRoomStore {
    api: ApiClient,
}

impl RemoteRoomStore {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl RoomStore for RemoteRoomStore {
    async fn create(&self, room: Room) -> Result<(), StoreError> {
        let response = self
            .api
            .http()
            .post(self.api.api("/rooms"))
            .json(&room)
            .send()
            .await
            .map_err(transport_error)?;
        check(response, Some(&room.id)).await?;
        Ok(())
    }

    async fn get(&self, id: &RoomId) -> Result<Room, StoreError> {
        let response = self
            .api
            .http()
            .get(self.api.api(&format!("/rooms/{id}")))
            .send()
            .await
            .map_err(transport_error)?;
        check(response, Some(id))
            .await?
            .json()
            .await
            .map_err(transport_error)
    }

    async fn subscribe(&self, id: &RoomId) -> Result<RoomSubscription, StoreError> {
        let socket = match connect_async(self.api.room_socket(id)).await {
            Ok((socket, _)) => socket,
            Err(tungstenite::Error::Http(response)) if response.status().as_u16() == 404 => {
                return Err(StoreError::NotFound(id.clone()));
            }
            Err(e) => return Err(StoreError::Unavailable(e.to_string())),
        };
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(forward_snapshots(socket, tx, id.clone()));
        debug!("Subscribed to room {}", id);
        Ok(rx)
    }

    async fn merge_update(&self, id: &RoomId, patch: RoomPatch) -> Result<(), StoreError> {
        let response = self
            .api
            .http()
            .patch(self.api.api(&format!("/rooms/{id}")))
            .json(&patch)
            .send()
            .await
            .map_err(transport_error)?;
        check(response, Some(id)).await?;
        Ok(())
    }
}

/// Pump snapshot frames into the subscription until either side goes away.
///
/// Dropping `tx` ends the subscription stream, which is how the room's
/// disappearance reaches the session.
async fn forward_snapshots(mut socket: Socket, tx: mpsc::UnboundedSender<Room>, id: RoomId) {
    loop {
        tokio::select! {
            _ = tx.closed() => {
                debug!("Subscription to room {} dropped", id);
                let _ = socket.close(None).await;
                return;
            }
            msg = socket.next() => match msg {
                Some(Ok(tungstenite::Message::Text(text))) => {
                    match serde_json::from_str::<RoomFrame>(text.as_str()) {
                        Ok(RoomFrame::Snapshot { room }) => {
                            if tx.send(room).is_err() {
                                return;
                            }
                        }
                        Ok(RoomFrame::RoomClosed { room_id }) => {
                            info!("Room {} closed by the host", room_id);
                            return;
                        }
                        Err(e) => warn!("Ignoring malformed frame on room {}: {}", id, e),
                    }
                }
                Some(Ok(tungstenite::Message::Close(_))) | None => {
                    info!("Connection for room {} closed", id);
                    return;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("WebSocket error on room {}: {}", id, e);
                    return;
                }
            }
        }
    }
}
