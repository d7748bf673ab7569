//! Game-level error type used by the domain state machine and the room
//! registry.
//!
//! This error type is transport-agnostic. Every variant is recoverable: it
//! is reported to the originating connection only and guarantees that the
//! room it concerns was left untouched.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::error_code::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// No live room with the given code.
    RoomNotFound,
    /// Joining is only possible while the room is in the lobby.
    GameAlreadyStarted,
    /// The room already holds the maximum number of players.
    RoomFull,
    /// Only the host may start the game.
    NotHost,
    /// Fewer players than the minimum required to start.
    InsufficientPlayers,
    /// The requested intent does not apply to the current phase.
    InvalidState,
    /// The connection is not a member of the named room.
    NotInRoom,
    /// The connection already belongs to a room.
    AlreadyInRoom,
    /// Only the current speaker may end the speaking turn.
    NotYourTurn,
    /// Eliminated players cannot vote.
    IneligibleVoter,
    /// Votes must name another active player.
    InvalidVoteTarget,
    /// Display names must be non-empty and reasonably short.
    InvalidDisplayName(String),
}

impl GameError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GameError::RoomNotFound => ErrorCode::RoomNotFound,
            GameError::GameAlreadyStarted => ErrorCode::GameAlreadyStarted,
            GameError::RoomFull => ErrorCode::RoomFull,
            GameError::NotHost => ErrorCode::NotHost,
            GameError::InsufficientPlayers => ErrorCode::InsufficientPlayers,
            GameError::InvalidState => ErrorCode::InvalidState,
            GameError::NotInRoom => ErrorCode::NotInRoom,
            GameError::AlreadyInRoom => ErrorCode::AlreadyInRoom,
            GameError::NotYourTurn => ErrorCode::NotYourTurn,
            GameError::IneligibleVoter => ErrorCode::IneligibleVoter,
            GameError::InvalidVoteTarget => ErrorCode::InvalidVoteTarget,
            GameError::InvalidDisplayName(_) => ErrorCode::InvalidDisplayName,
        }
    }
}

impl Display for GameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            GameError::RoomNotFound => write!(f, "Room not found"),
            GameError::GameAlreadyStarted => write!(f, "Game already started"),
            GameError::RoomFull => write!(f, "Room is full"),
            GameError::NotHost => write!(f, "Only host can start the game"),
            GameError::InsufficientPlayers => write!(f, "Need at least 3 players"),
            GameError::InvalidState => write!(f, "That action is not available right now"),
            GameError::NotInRoom => write!(f, "You are not in this room"),
            GameError::AlreadyInRoom => write!(f, "You are already in a room"),
            GameError::NotYourTurn => write!(f, "It is not your turn to speak"),
            GameError::IneligibleVoter => write!(f, "Eliminated players cannot vote"),
            GameError::InvalidVoteTarget => write!(f, "You can only vote for another active player"),
            GameError::InvalidDisplayName(d) => write!(f, "Invalid display name: {d}"),
        }
    }
}

impl Error for GameError {}
