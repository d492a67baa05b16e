//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{RoomId, RoomStatus, StoreError, ValueObjectError};

/// ルームセッションのユースケースのエラー
///
/// いずれの場合もルームドキュメントは変更されず、遷移前の状態のまま
/// 再試行できます。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValueObjectError),

    #[error("Room {0} not found")]
    RoomNotFound(RoomId),

    #[error("Room is full")]
    RoomFull,

    /// ホストが自分のルームにゲストとして参加しようとした
    #[error("You are already the host of this room")]
    HostCannotJoin,

    #[error("Only the host can {0}")]
    NotHost(&'static str),

    #[error("You are not a participant of this room")]
    NotParticipant,

    #[error("Cannot {action} while the room is {status}")]
    InvalidState {
        action: &'static str,
        status: RoomStatus,
    },

    #[error("Both players must be ready")]
    PlayersNotReady,

    #[error("Time is up")]
    TimeUp,

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for SessionError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => SessionError::RoomNotFound(id),
            other => SessionError::Store(other),
        }
    }
}
