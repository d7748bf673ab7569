//! Error codes for the party backend.
//!
//! Every error surfaced to a client (websocket `error` frame or HTTP problem
//! body) carries one of these codes. Add new codes here; never pass ad-hoc
//! strings as error codes.

use core::fmt;

use serde::{Serialize, Serializer};

/// Centralized error codes, rendered as SCREAMING_SNAKE_CASE strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Room lifecycle
    RoomNotFound,
    GameAlreadyStarted,
    RoomFull,
    NotInRoom,
    AlreadyInRoom,
    InvalidDisplayName,

    // Game flow
    NotHost,
    InsufficientPlayers,
    InvalidState,
    NotYourTurn,
    IneligibleVoter,
    InvalidVoteTarget,

    // Request validation
    BadRequest,
    ValidationError,
    NotFound,

    // Infrastructure
    Internal,
    ConfigError,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::GameAlreadyStarted => "GAME_ALREADY_STARTED",
            Self::RoomFull => "ROOM_FULL",
            Self::NotInRoom => "NOT_IN_ROOM",
            Self::AlreadyInRoom => "ALREADY_IN_ROOM",
            Self::InvalidDisplayName => "INVALID_DISPLAY_NAME",

            Self::NotHost => "NOT_HOST",
            Self::InsufficientPlayers => "INSUFFICIENT_PLAYERS",
            Self::InvalidState => "INVALID_STATE",
            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::IneligibleVoter => "INELIGIBLE_VOTER",
            Self::InvalidVoteTarget => "INVALID_VOTE_TARGET",

            Self::BadRequest => "BAD_REQUEST",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",

            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
