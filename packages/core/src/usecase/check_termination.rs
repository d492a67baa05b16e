//! UseCase: 終了判定（playing → finished）
//!
//! 各クライアントが定期的に、手元のスナップショットに対してアービターを
//! 実行します。終了と判定したクライアントが `status` と `winner` を 1 回の
//! merge-update で書き込みます。`finished` を観測した後は判定しません。
//! 相手が先に終了を書き込んでいた場合、こちらの書き込みは前提条件で
//! 拒否され、先に書かれた勝者が残ります。

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    arbiter::{Arbiter, Verdict},
    domain::{Clock, Room, RoomPatch, RoomStatus, RoomStore, StoreError},
};

use super::error::SessionError;

#[derive(Clone)]
pub struct CheckTerminationUseCase {
    store: Arc<dyn RoomStore>,
    arbiter: Arc<dyn Arbiter>,
    clock: Arc<dyn Clock>,
}

impl CheckTerminationUseCase {
    pub fn new(store: Arc<dyn RoomStore>, arbiter: Arc<dyn Arbiter>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            arbiter,
            clock,
        }
    }

    /// 終了判定を実行し、終了なら結果を書き込む
    ///
    /// 書き込みに失敗した場合でも判定結果は変わらないため、次の判定で
    /// 再び書き込みが試みられます。
    pub async fn execute(&self, room: &Room) -> Result<Verdict, SessionError> {
        if room.status != RoomStatus::Playing {
            return Ok(Verdict::Continue);
        }
        let verdict = self.arbiter.decide(room, self.clock.now());
        if let Verdict::End { winner, reason } = verdict {
            let mut patch = RoomPatch::new().expect_status(RoomStatus::Playing);
            if let Some(start_time) = room.start_time {
                patch = patch.expect_start_time(start_time);
            }
            let patch = patch.status(RoomStatus::Finished).winner(Some(winner));
            match self.store.merge_update(&room.id, patch).await {
                Ok(()) => {
                    info!("Room {} finished ({:?}), winner: {}", room.id, reason, winner);
                }
                Err(StoreError::Stale(reason)) => {
                    debug!("Room {} was already ended: {}", room.id, reason);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(verdict)
    }
}
