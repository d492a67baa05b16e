//! Domain layer for the typing race.
//!
//! This module contains business logic that is independent of
//! storage, transport and presentation concerns.

pub mod clock;
pub mod entity;
pub mod error;
pub mod factory;
pub mod patch;
pub mod repository;
pub mod result;
pub mod value_object;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entity::{
    GameSettings, Identity, Player, Room, RoomStatus, Seat, TypingStats, Winner,
};
pub use error::{GeneratorError, InvariantError, PatchError, StoreError, ValueObjectError};
pub use factory::RoomIdFactory;
pub use patch::{PatchValue, RoomPatch};
pub use repository::{
    LeaderboardStore, ParagraphGenerator, ParagraphRequest, RoomStore, RoomSubscription,
};
pub use result::{GameMode, GameResult, UserProfile};
pub use value_object::{GameDuration, ParagraphLength, RoomId, Timestamp, UserId};

#[cfg(test)]
pub use repository::{MockLeaderboardStore, MockParagraphGenerator, MockRoomStore};
