//! Core domain models for a typing race room.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    error::InvariantError,
    value_object::{GameDuration, ParagraphLength, RoomId, Timestamp, UserId},
};

/// Accuracy of a player who has not typed anything yet.
pub const DEFAULT_ACCURACY: u32 = 100;

/// Lifecycle status of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Waiting,
    Ready,
    Countdown,
    Playing,
    Finished,
}

impl RoomStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RoomStatus::Waiting => "waiting",
            RoomStatus::Ready => "ready",
            RoomStatus::Countdown => "countdown",
            RoomStatus::Playing => "playing",
            RoomStatus::Finished => "finished",
        }
    }

    /// Whether a round is armed, i.e. `paragraphText` must be set.
    pub fn has_paragraph(self) -> bool {
        matches!(
            self,
            RoomStatus::Countdown | RoomStatus::Playing | RoomStatus::Finished
        )
    }

    /// Whether `startTime` must be set.
    pub fn has_start_time(self) -> bool {
        matches!(self, RoomStatus::Playing | RoomStatus::Finished)
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the two fixed slots of a room.
///
/// Seat 1 carries host authority; the identity sitting in it may change
/// when the host leaves and the guest is promoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    Player1,
    Player2,
}

impl Seat {
    /// Field name of the seat in the room document.
    pub fn field(self) -> &'static str {
        match self {
            Seat::Player1 => "player1",
            Seat::Player2 => "player2",
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Seat::Player1 => 1,
            Seat::Player2 => 2,
        }
    }

    pub fn other(self) -> Seat {
        match self {
            Seat::Player1 => Seat::Player2,
            Seat::Player2 => Seat::Player1,
        }
    }

    pub fn as_winner(self) -> Winner {
        match self {
            Seat::Player1 => Winner::Player1,
            Seat::Player2 => Winner::Player2,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

/// Outcome of a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Player1,
    Player2,
    Draw,
}

impl Winner {
    pub fn seat(self) -> Option<Seat> {
        match self {
            Winner::Player1 => Some(Seat::Player1),
            Winner::Player2 => Some(Seat::Player2),
            Winner::Draw => None,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Player1 => f.write_str("player1"),
            Winner::Player2 => f.write_str("player2"),
            Winner::Draw => f.write_str("draw"),
        }
    }
}

/// Round settings, changeable by the host until a round is armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GameSettings {
    pub paragraph_length: ParagraphLength,
    pub game_duration: GameDuration,
    #[serde(default)]
    pub include_punctuation: bool,
    #[serde(default)]
    pub include_numbers: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            paragraph_length: ParagraphLength::default(),
            game_duration: GameDuration::default(),
            include_punctuation: true,
            include_numbers: false,
        }
    }
}

/// Pre-authenticated identity handed to the core by the identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: UserId,
    pub display_name: Option<String>,
}

impl Identity {
    pub fn new(uid: UserId, display_name: Option<String>) -> Self {
        Self { uid, display_name }
    }

    /// Display name, falling back to the seat label ("Player 1", "Player 2").
    pub fn name_for(&self, seat: Seat) -> String {
        match self.display_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Player {}", seat.number()),
        }
    }
}

/// Live stats of one player within a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingStats {
    pub typed_text: String,
    pub errors: u32,
    pub progress: u32,
    pub accuracy: u32,
    pub wpm: u32,
}

impl Default for TypingStats {
    fn default() -> Self {
        Self {
            typed_text: String::new(),
            errors: 0,
            progress: 0,
            accuracy: DEFAULT_ACCURACY,
            wpm: 0,
        }
    }
}

/// A participant's state within a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Player {
    pub uid: UserId,
    pub name: String,
    pub typed_text: String,
    pub wpm: u32,
    pub accuracy: u32,
    pub errors: u32,
    pub progress: u32,
    pub is_host: bool,
    #[serde(default)]
    pub is_ready: bool,
}

impl Player {
    /// Create the player occupying seat 1. The host is ready by default.
    pub fn host(identity: &Identity) -> Self {
        Self::seated(identity, Seat::Player1)
    }

    /// Create the player occupying seat 2. The guest readies up explicitly.
    pub fn guest(identity: &Identity) -> Self {
        Self::seated(identity, Seat::Player2)
    }

    fn seated(identity: &Identity, seat: Seat) -> Self {
        let is_host = seat == Seat::Player1;
        Self {
            uid: identity.uid.clone(),
            name: identity.name_for(seat),
            typed_text: String::new(),
            wpm: 0,
            accuracy: DEFAULT_ACCURACY,
            errors: 0,
            progress: 0,
            is_host,
            is_ready: is_host,
        }
    }

    pub fn stats(&self) -> TypingStats {
        TypingStats {
            typed_text: self.typed_text.clone(),
            errors: self.errors,
            progress: self.progress,
            accuracy: self.accuracy,
            wpm: self.wpm,
        }
    }

    pub fn reset_stats(&mut self) {
        self.apply_stats(TypingStats::default());
    }

    pub fn apply_stats(&mut self, stats: TypingStats) {
        self.typed_text = stats.typed_text;
        self.errors = stats.errors;
        self.progress = stats.progress;
        self.accuracy = stats.accuracy;
        self.wpm = stats.wpm;
    }
}

/// The shared record describing one match between two seats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Room {
    pub id: RoomId,
    pub host_id: Option<UserId>,
    pub guest_id: Option<UserId>,
    pub status: RoomStatus,
    pub settings: GameSettings,
    pub paragraph_text: Option<String>,
    pub start_time: Option<Timestamp>,
    pub created_at: Timestamp,
    pub player1: Option<Player>,
    pub player2: Option<Player>,
    #[serde(default)]
    pub winner: Option<Winner>,
}

impl Room {
    /// Create a fresh `waiting` room with the host in seat 1.
    pub fn new(id: RoomId, host: &Identity, created_at: Timestamp) -> Self {
        Self {
            id,
            host_id: Some(host.uid.clone()),
            guest_id: None,
            status: RoomStatus::Waiting,
            settings: GameSettings::default(),
            paragraph_text: None,
            start_time: None,
            created_at,
            player1: Some(Player::host(host)),
            player2: None,
            winner: None,
        }
    }

    pub fn player(&self, seat: Seat) -> Option<&Player> {
        match seat {
            Seat::Player1 => self.player1.as_ref(),
            Seat::Player2 => self.player2.as_ref(),
        }
    }

    /// Seat currently occupied by `uid`, if any.
    pub fn seat_of(&self, uid: &UserId) -> Option<Seat> {
        [Seat::Player1, Seat::Player2]
            .into_iter()
            .find(|seat| self.player(*seat).is_some_and(|p| &p.uid == uid))
    }

    /// Whether `uid` holds host authority (seat 1).
    pub fn is_host(&self, uid: &UserId) -> bool {
        self.seat_of(uid) == Some(Seat::Player1)
    }

    /// Both seats are empty; the room can be reclaimed.
    pub fn is_abandoned(&self) -> bool {
        self.player1.is_none() && self.player2.is_none()
    }

    /// Both seats are occupied and both players are ready.
    pub fn both_ready(&self) -> bool {
        matches!(
            (&self.player1, &self.player2),
            (Some(p1), Some(p2)) if p1.is_ready && p2.is_ready
        )
    }

    /// Check the room invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if let Some(p1) = &self.player1 {
            let p2_is_host = self.player2.as_ref().is_some_and(|p| p.is_host);
            if !p1.is_host || p2_is_host {
                return Err(InvariantError::HostFlagMismatch);
            }
        }
        if self.host_id.as_ref() != self.player1.as_ref().map(|p| &p.uid) {
            return Err(InvariantError::SeatIdentityMismatch {
                seat: Seat::Player1,
                field: "hostId",
            });
        }
        if self.guest_id.as_ref() != self.player2.as_ref().map(|p| &p.uid) {
            return Err(InvariantError::SeatIdentityMismatch {
                seat: Seat::Player2,
                field: "guestId",
            });
        }
        if self.paragraph_text.is_some() != self.status.has_paragraph() {
            return Err(InvariantError::ParagraphPresence(self.status));
        }
        if self.start_time.is_some() != self.status.has_start_time() {
            return Err(InvariantError::StartTimePresence(self.status));
        }
        if self.winner.is_some() != (self.status == RoomStatus::Finished) {
            return Err(InvariantError::WinnerPresence(self.status));
        }
        for seat in [Seat::Player1, Seat::Player2] {
            let Some(player) = self.player(seat) else {
                continue;
            };
            for (field, value) in [("progress", player.progress), ("accuracy", player.accuracy)] {
                if value > 100 {
                    return Err(InvariantError::StatOutOfRange { seat, field, value });
                }
            }
        }
        Ok(())
    }
}
