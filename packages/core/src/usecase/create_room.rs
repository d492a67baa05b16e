//! UseCase: ルーム作成
//!
//! 新しい 6 文字の ID を生成し、ホストを座席 1 に着席させた `waiting` 状態の
//! ルームをストアに作成します。ID の重複確認は行いません（36^6 の空間で衝突は
//! 無視できる前提）。

use std::sync::Arc;

use tracing::info;

use crate::domain::{Clock, Identity, Room, RoomIdFactory, RoomStore};

use super::error::SessionError;

/// ルーム作成のユースケース
#[derive(Clone)]
pub struct CreateRoomUseCase {
    store: Arc<dyn RoomStore>,
    clock: Arc<dyn Clock>,
}

impl CreateRoomUseCase {
    pub fn new(store: Arc<dyn RoomStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// ルーム作成を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Room)` - 作成されたルーム
    /// * `Err(SessionError)` - ストアへの書き込み失敗
    pub async fn execute(&self, host: &Identity) -> Result<Room, SessionError> {
        let id = RoomIdFactory::generate()?;
        let room = Room::new(id, host, self.clock.now());
        self.store.create(room.clone()).await?;
        info!("Room {} created by {}", room.id, host.uid);
        Ok(room)
    }
}
