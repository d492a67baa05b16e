//! UseCase 層
//!
//! ルームのライフサイクル（waiting → ready → countdown → playing → finished）
//! の各遷移を実装するレイヤー。セッションランタイムや UI から呼び出され、
//! Domain 層のストアを操作します。
//!
//! 遷移に必要なフィールドは必ず 1 回の merge-update で書き込みます。

pub mod begin_play;
pub mod check_termination;
pub mod create_room;
pub mod error;
pub mod join_room;
pub mod leave_room;
pub mod rematch;
pub mod record_typing;
pub mod save_result;
pub mod set_ready;
pub mod start_round;
pub mod update_settings;

pub use begin_play::BeginPlayUseCase;
pub use check_termination::CheckTerminationUseCase;
pub use create_room::CreateRoomUseCase;
pub use error::SessionError;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use rematch::RematchUseCase;
pub use record_typing::RecordTypingUseCase;
pub use save_result::SaveResultUseCase;
pub use set_ready::SetReadyUseCase;
pub use start_round::{FALLBACK_PARAGRAPH, StartRoundUseCase, generate_or_fallback};
pub use update_settings::{SettingsUpdate, UpdateSettingsUseCase};

use crate::domain::{Room, RoomStatus, Seat, UserId};

/// `uid` の座席（いなければ `NotParticipant`）
pub(crate) fn require_seat(room: &Room, uid: &UserId) -> Result<Seat, SessionError> {
    room.seat_of(uid).ok_or(SessionError::NotParticipant)
}

/// `uid` が座席 1 でなければエラー
pub(crate) fn require_host(
    room: &Room,
    uid: &UserId,
    action: &'static str,
) -> Result<(), SessionError> {
    match require_seat(room, uid)? {
        Seat::Player1 => Ok(()),
        Seat::Player2 => Err(SessionError::NotHost(action)),
    }
}

/// ルームの状態が `allowed` のいずれでもなければエラー
pub(crate) fn require_status(
    room: &Room,
    allowed: &[RoomStatus],
    action: &'static str,
) -> Result<(), SessionError> {
    if allowed.contains(&room.status) {
        Ok(())
    } else {
        Err(SessionError::InvalidState {
            action,
            status: room.status,
        })
    }
}
