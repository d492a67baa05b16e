//! UseCase: ラウンド開始（ready → countdown）
//!
//! ホストが開始を指示し、両方の座席が埋まっていて両者が準備完了のときだけ
//! 遷移します。本文は外部の生成器から取得し、失敗・タイムアウト・空の結果の
//! 場合は組み込みの本文に差し替えてラウンドを続行します。

use std::{sync::Arc, time::Duration};

use tracing::{info, warn};

use crate::domain::{
    GameSettings, ParagraphGenerator, ParagraphRequest, Room, RoomId, RoomPatch, RoomStatus,
    RoomStore, Seat, UserId,
};

use super::{error::SessionError, require_host, require_status};

/// ジェネレーターが課題文を返せないときに使う課題文
pub const FALLBACK_PARAGRAPH: &str = "The quick brown fox jumps over the lazy dog. A lazy fox is not a quick fox. Pack my box with five dozen liquor jugs. This is a fallback paragraph because the text service is unavailable.";

/// `settings` に合う課題文を `generator` に依頼する
///
/// 失敗・タイムアウト・空の出力のときは [`FALLBACK_PARAGRAPH`] を使います。
pub async fn generate_or_fallback(
    generator: &dyn ParagraphGenerator,
    settings: &GameSettings,
    timeout: Duration,
) -> String {
    match tokio::time::timeout(timeout, generator.generate(ParagraphRequest::from(settings))).await
    {
        Ok(Ok(text)) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(Ok(_)) => {
            warn!("Paragraph generator returned empty text, using fallback");
            FALLBACK_PARAGRAPH.to_string()
        }
        Ok(Err(e)) => {
            warn!("Paragraph generator failed: {}, using fallback", e);
            FALLBACK_PARAGRAPH.to_string()
        }
        Err(_) => {
            warn!(
                "Paragraph generator timed out after {:?}, using fallback",
                timeout
            );
            FALLBACK_PARAGRAPH.to_string()
        }
    }
}

/// ラウンド開始のユースケース
#[derive(Clone)]
pub struct StartRoundUseCase {
    store: Arc<dyn RoomStore>,
    generator: Arc<dyn ParagraphGenerator>,
    generator_timeout: Duration,
}

impl StartRoundUseCase {
    pub fn new(
        store: Arc<dyn RoomStore>,
        generator: Arc<dyn ParagraphGenerator>,
        generator_timeout: Duration,
    ) -> Self {
        Self {
            store,
            generator,
            generator_timeout,
        }
    }

    fn check_startable(room: &Room, uid: &UserId) -> Result<(), SessionError> {
        require_host(room, uid, "start the game")?;
        require_status(room, &[RoomStatus::Ready], "start the game")?;
        if !room.both_ready() {
            return Err(SessionError::PlayersNotReady);
        }
        Ok(())
    }

    /// ラウンド開始を実行
    ///
    /// 本文の生成中にルームが変化している可能性があるため、書き込み直前に
    /// 再度ルームを読み直して開始条件を確認します。
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - このラウンドの本文
    /// * `Err(SessionError)` - ホスト以外、準備未完了、状態不正、書き込み失敗
    pub async fn execute(&self, id: &RoomId, uid: &UserId) -> Result<String, SessionError> {
        let room = self.store.get(id).await?;
        Self::check_startable(&room, uid)?;

        let paragraph =
            generate_or_fallback(self.generator.as_ref(), &room.settings, self.generator_timeout)
                .await;

        let room = self.store.get(id).await?;
        Self::check_startable(&room, uid)?;

        let patch = RoomPatch::new()
            .status(RoomStatus::Countdown)
            .paragraph_text(Some(&paragraph))
            .reset_seat_stats(Seat::Player1)
            .reset_seat_stats(Seat::Player2);
        self.store.merge_update(id, patch).await?;
        info!(
            "Room {} counting down ({} characters)",
            id,
            paragraph.chars().count()
        );
        Ok(paragraph)
    }
}
