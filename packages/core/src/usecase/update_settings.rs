//! UseCase: ゲーム設定の変更
//!
//! 設定を変更できるのはホストのみで、`waiting` / `ready` の間に限ります。
//! ゲストからの変更は拒否され、ルームの設定は変わりません。

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{
    GameDuration, GameSettings, ParagraphLength, RoomId, RoomPatch, RoomStatus, RoomStore, UserId,
};

use super::{error::SessionError, require_host, require_status};

/// [`GameSettings`] の部分的な変更（`None` の項目はそのまま）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub paragraph_length: Option<ParagraphLength>,
    pub game_duration: Option<GameDuration>,
    pub include_punctuation: Option<bool>,
    pub include_numbers: Option<bool>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// `current` にこの変更を適用した設定
    pub fn applied_to(&self, current: GameSettings) -> GameSettings {
        GameSettings {
            paragraph_length: self.paragraph_length.unwrap_or(current.paragraph_length),
            game_duration: self.game_duration.unwrap_or(current.game_duration),
            include_punctuation: self
                .include_punctuation
                .unwrap_or(current.include_punctuation),
            include_numbers: self.include_numbers.unwrap_or(current.include_numbers),
        }
    }

    fn to_patch(self) -> RoomPatch {
        let mut patch = RoomPatch::new();
        if let Some(length) = self.paragraph_length {
            patch = patch.paragraph_length(length);
        }
        if let Some(duration) = self.game_duration {
            patch = patch.game_duration(duration);
        }
        if let Some(enabled) = self.include_punctuation {
            patch = patch.include_punctuation(enabled);
        }
        if let Some(enabled) = self.include_numbers {
            patch = patch.include_numbers(enabled);
        }
        patch
    }
}

/// 設定変更のユースケース
#[derive(Clone)]
pub struct UpdateSettingsUseCase {
    store: Arc<dyn RoomStore>,
}

impl UpdateSettingsUseCase {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// 設定変更を実行
    ///
    /// # Returns
    ///
    /// * `Ok(GameSettings)` - 変更後の設定
    /// * `Err(SessionError)` - ホスト以外、または変更できない状態
    pub async fn execute(
        &self,
        id: &RoomId,
        uid: &UserId,
        update: SettingsUpdate,
    ) -> Result<GameSettings, SessionError> {
        let room = self.store.get(id).await?;
        require_host(&room, uid, "change settings")?;
        require_status(
            &room,
            &[RoomStatus::Waiting, RoomStatus::Ready],
            "change settings",
        )?;
        if update.is_empty() {
            return Ok(room.settings);
        }
        self.store.merge_update(id, update.to_patch()).await?;
        Ok(update.applied_to(room.settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{room_id, seated_room, store_with, uid};

    fn longer_paragraph() -> SettingsUpdate {
        SettingsUpdate {
            paragraph_length: Some(ParagraphLength::Words300),
            ..SettingsUpdate::default()
        }
    }

    #[tokio::test]
    async fn test_host_changes_settings() {
        // テスト項目: ホストは ready 状態で設定を変更でき、他の設定は保たれる
        // given (前提条件):
        let (store, _) = store_with(seated_room(RoomStatus::Ready, false)).await;
        let usecase = UpdateSettingsUseCase::new(store.clone());

        // when (操作):
        let settings = usecase
            .execute(&room_id(), &uid("alice"), longer_paragraph())
            .await
            .unwrap();

        // then (期待する結果):
        let room = store.get(&room_id()).await.unwrap();
        assert_eq!(room.settings, settings);
        assert_eq!(room.settings.paragraph_length, ParagraphLength::Words300);
        assert_eq!(room.settings.game_duration, GameDuration::Seconds60);
        assert!(room.settings.include_punctuation);
    }

    #[tokio::test]
    async fn test_guest_cannot_change_settings() {
        // テスト項目: ゲストによる設定変更は拒否され、設定は変わらない
        // given (前提条件):
        let (store, _) = store_with(seated_room(RoomStatus::Ready, true)).await;
        let usecase = UpdateSettingsUseCase::new(store.clone());

        // when (操作):
        let result = usecase
            .execute(&room_id(), &uid("bob"), longer_paragraph())
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::NotHost("change settings")));
        let room = store.get(&room_id()).await.unwrap();
        assert_eq!(room.settings, GameSettings::default());
    }

    #[tokio::test]
    async fn test_settings_locked_while_playing() {
        // テスト項目: playing 中はホストでも設定を変更できない
        // given (前提条件):
        let mut room = seated_room(RoomStatus::Playing, true);
        room.paragraph_text = Some("abc".to_string());
        room.start_time = Some(crate::domain::Timestamp::new(1));
        let (store, _) = store_with(room).await;
        let usecase = UpdateSettingsUseCase::new(store);

        // when (操作):
        let result = usecase
            .execute(&room_id(), &uid("alice"), longer_paragraph())
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SessionError::InvalidState {
                action: "change settings",
                status: RoomStatus::Playing
            })
        );
    }

    #[test]
    fn test_settings_update_wire_format() {
        // テスト項目: 設定更新は camelCase の JSON から読み込める
        // when (操作):
        let update: SettingsUpdate =
            serde_json::from_str(r#"{"gameDuration":30,"includeNumbers":true}"#).unwrap();

        // then (期待する結果):
        assert_eq!(update.game_duration, Some(GameDuration::Seconds30));
        assert_eq!(update.include_numbers, Some(true));
        assert!(update.paragraph_length.is_none());
    }
}
