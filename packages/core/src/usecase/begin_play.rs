//! UseCase: カウントダウン終了（countdown → playing）
//!
//! 接続中のどのクライアントのタイマーが先に発火しても構いません。
//! `startTime` はストアの時計で打刻されます。書き込みには「countdown で
//! あること」という前提条件が付くため、同時に発火しても遷移するのは
//! 1 回だけで、開始時刻は 1 ラウンドに 1 度しか打刻されません。

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{RoomId, RoomPatch, RoomStatus, RoomStore, StoreError};

use super::error::SessionError;

#[derive(Clone)]
pub struct BeginPlayUseCase {
    store: Arc<dyn RoomStore>,
}

impl BeginPlayUseCase {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// この呼び出しで遷移した場合 `true`
    pub async fn execute(&self, id: &RoomId) -> Result<bool, SessionError> {
        let patch = RoomPatch::new()
            .expect_status(RoomStatus::Countdown)
            .status(RoomStatus::Playing)
            .start_time_now();
        match self.store.merge_update(id, patch).await {
            Ok(()) => {
                info!("Room {} is playing", id);
                Ok(true)
            }
            Err(StoreError::Stale(reason)) => {
                debug!("Room {} already left countdown: {}", id, reason);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}
