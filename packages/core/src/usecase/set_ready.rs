//! UseCase: 準備完了の切り替え
//!
//! 各プレイヤーは自分の座席の `isReady` だけを書き換えられます。
//! ラウンド中（countdown / playing）や終了後は変更できません。

use std::sync::Arc;

use crate::domain::{RoomId, RoomPatch, RoomStatus, RoomStore, UserId};

use super::{
    error::SessionError,
    require_seat, require_status,
};

#[derive(Clone)]
pub struct SetReadyUseCase {
    store: Arc<dyn RoomStore>,
}

impl SetReadyUseCase {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, id: &RoomId, uid: &UserId, ready: bool) -> Result<(), SessionError> {
        let room = self.store.get(id).await?;
        let seat = require_seat(&room, uid)?;
        require_status(
            &room,
            &[RoomStatus::Waiting, RoomStatus::Ready],
            "change readiness",
        )?;
        self.store
            .merge_update(id, RoomPatch::new().seat_ready(seat, ready))
            .await?;
        Ok(())
    }
}
