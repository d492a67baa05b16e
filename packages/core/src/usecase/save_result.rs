//! UseCase: 結果の保存
//!
//! リーダーボードに結果を 1 件追加し、ユーザーの最高記録を更新します。
//! WPM が 0 の結果は保存しません。

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    Clock, GameMode, GameResult, LeaderboardStore, TypingStats, UserId, UserProfile,
};

use super::error::SessionError;

#[derive(Clone)]
pub struct SaveResultUseCase {
    leaderboard: Arc<dyn LeaderboardStore>,
    clock: Arc<dyn Clock>,
}

impl SaveResultUseCase {
    pub fn new(leaderboard: Arc<dyn LeaderboardStore>, clock: Arc<dyn Clock>) -> Self {
        Self { leaderboard, clock }
    }

    /// 更新後のプロフィール（記録しなかった場合は `None`）
    pub async fn execute(
        &self,
        uid: &UserId,
        name: &str,
        stats: &TypingStats,
        mode: GameMode,
    ) -> Result<Option<UserProfile>, SessionError> {
        if stats.wpm == 0 {
            return Ok(None);
        }
        let result = GameResult::new(
            uid.clone(),
            name.to_string(),
            stats.wpm,
            stats.accuracy,
            mode,
            self.clock.now(),
        );
        let profile = self.leaderboard.record_result(result).await?;
        info!(
            "Recorded {:?} result for {}: {} wpm (best {})",
            mode, uid, stats.wpm, profile.best_wpm
        );
        Ok(Some(profile))
    }
}
