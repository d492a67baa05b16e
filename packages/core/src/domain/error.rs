//! Domain layer error definitions.

use thiserror::Error;

use super::entity::{RoomStatus, Seat};
use super::value_object::RoomId;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// RoomId must be exactly six characters
    #[error("RoomId must be {expected} characters (got {actual})")]
    RoomIdInvalidLength { expected: usize, actual: usize },

    /// RoomId only allows `[A-Z0-9]`
    #[error("RoomId contains invalid character '{0}'")]
    RoomIdInvalidCharacter(char),

    /// UserId validation error
    #[error("UserId cannot be empty")]
    UserIdEmpty,

    /// UserId too long error
    #[error("UserId cannot exceed {max} characters (got {actual})")]
    UserIdTooLong { max: usize, actual: usize },

    #[error("unsupported paragraph length: {0} words")]
    UnsupportedParagraphLength(u32),

    #[error("unsupported game duration: {0} seconds")]
    UnsupportedGameDuration(u32),
}

/// A room document that breaks one of the room invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantError {
    #[error("seat 1 must be the only seat marked as host")]
    HostFlagMismatch,

    #[error("{field} does not match the player occupying {seat}")]
    SeatIdentityMismatch { seat: Seat, field: &'static str },

    #[error("paragraphText presence is inconsistent with status {0}")]
    ParagraphPresence(RoomStatus),

    #[error("startTime presence is inconsistent with status {0}")]
    StartTimePresence(RoomStatus),

    #[error("winner presence is inconsistent with status {0}")]
    WinnerPresence(RoomStatus),

    #[error("{seat}.{field} out of range: {value}")]
    StatOutOfRange {
        seat: Seat,
        field: &'static str,
        value: u32,
    },
}

/// Errors raised while applying a merge-update to a room document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("invalid field path '{0}'")]
    InvalidPath(String),

    /// The parent of a dotted path is null or not an object
    #[error("cannot set '{0}': parent field is not an object")]
    MissingParent(String),

    #[error("patched room does not decode: {0}")]
    Decode(String),

    #[error("precondition failed: expected {field} {expected}, found {actual}")]
    PreconditionFailed {
        field: &'static str,
        expected: String,
        actual: String,
    },
}

/// Errors reported by the room document store and the leaderboard store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("room {0} not found")]
    NotFound(RoomId),

    #[error("room {0} already exists")]
    AlreadyExists(RoomId),

    /// The write was refused and the document left untouched
    #[error("write rejected: {0}")]
    Rejected(String),

    /// The document no longer matches the state the write was based on
    #[error("stale write: {0}")]
    Stale(String),

    /// Transport or backend failure; the caller may retry
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<PatchError> for StoreError {
    fn from(err: PatchError) -> Self {
        match err {
            PatchError::PreconditionFailed { .. } => StoreError::Stale(err.to_string()),
            other => StoreError::Rejected(other.to_string()),
        }
    }
}

impl From<InvariantError> for StoreError {
    fn from(err: InvariantError) -> Self {
        StoreError::Rejected(err.to_string())
    }
}

/// Errors reported by the paragraph generator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("paragraph generation failed: {0}")]
    Failed(String),

    #[error("paragraph generator returned an empty text")]
    Empty,
}
