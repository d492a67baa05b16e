//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Length of a room identifier.
pub const ROOM_ID_LENGTH: usize = 6;

/// Characters a room identifier is drawn from.
pub const ROOM_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Maximum length of a user identifier.
pub const USER_ID_MAX_LENGTH: usize = 128;

/// Room identifier value object.
///
/// Six characters drawn from `[A-Z0-9]`, short enough to be read out loud.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomId(String);

impl RoomId {
    /// Create a new RoomId.
    ///
    /// # Errors
    ///
    /// Returns an error unless `id` is exactly six characters of `[A-Z0-9]`.
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        let len = id.chars().count();
        if len != ROOM_ID_LENGTH {
            return Err(ValueObjectError::RoomIdInvalidLength {
                expected: ROOM_ID_LENGTH,
                actual: len,
            });
        }
        if let Some(c) = id
            .chars()
            .find(|c| !c.is_ascii() || !ROOM_ID_ALPHABET.contains(&(*c as u8)))
        {
            return Err(ValueObjectError::RoomIdInvalidCharacter(c));
        }
        Ok(Self(id))
    }

    /// Parse user input: surrounding whitespace is ignored and letters are upper-cased.
    pub fn parse(input: &str) -> Result<Self, ValueObjectError> {
        Self::new(input.trim().to_ascii_uppercase())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoomId> for String {
    fn from(value: RoomId) -> Self {
        value.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User identifier value object.
///
/// Opaque, stable id issued by the identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a new UserId.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is empty or longer than [`USER_ID_MAX_LENGTH`].
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::UserIdEmpty);
        }
        let len = id.chars().count();
        if len > USER_ID_MAX_LENGTH {
            return Err(ValueObjectError::UserIdTooLong {
                max: USER_ID_MAX_LENGTH,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Approximate number of words in a round's paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ParagraphLength {
    Words50,
    #[default]
    Words100,
    Words200,
    Words300,
}

impl ParagraphLength {
    pub fn words(self) -> u32 {
        match self {
            ParagraphLength::Words50 => 50,
            ParagraphLength::Words100 => 100,
            ParagraphLength::Words200 => 200,
            ParagraphLength::Words300 => 300,
        }
    }
}

impl TryFrom<u32> for ParagraphLength {
    type Error = ValueObjectError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            50 => Ok(ParagraphLength::Words50),
            100 => Ok(ParagraphLength::Words100),
            200 => Ok(ParagraphLength::Words200),
            300 => Ok(ParagraphLength::Words300),
            other => Err(ValueObjectError::UnsupportedParagraphLength(other)),
        }
    }
}

impl From<ParagraphLength> for u32 {
    fn from(value: ParagraphLength) -> Self {
        value.words()
    }
}

/// Round duration in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum GameDuration {
    Seconds30,
    #[default]
    Seconds60,
    Seconds120,
}

impl GameDuration {
    pub fn seconds(self) -> u32 {
        match self {
            GameDuration::Seconds30 => 30,
            GameDuration::Seconds60 => 60,
            GameDuration::Seconds120 => 120,
        }
    }

    pub fn millis(self) -> i64 {
        i64::from(self.seconds()) * 1000
    }
}

impl TryFrom<u32> for GameDuration {
    type Error = ValueObjectError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            30 => Ok(GameDuration::Seconds30),
            60 => Ok(GameDuration::Seconds60),
            120 => Ok(GameDuration::Seconds120),
            other => Err(ValueObjectError::UnsupportedGameDuration(other)),
        }
    }
}

impl From<GameDuration> for u32 {
    fn from(value: GameDuration) -> Self {
        value.seconds()
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp from Unix milliseconds.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Seconds elapsed since `earlier`. Negative when `earlier` lies in the future.
    pub fn seconds_since(&self, earlier: Timestamp) -> f64 {
        (self.0 - earlier.0) as f64 / 1000.0
    }

    pub fn millis_since(&self, earlier: Timestamp) -> i64 {
        self.0 - earlier.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
