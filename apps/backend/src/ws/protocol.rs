use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{GameMode, PlayerId, Room};
use crate::errors::{ErrorCode, GameError};

/// Intents sent by clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMsg {
    #[serde(rename_all = "camelCase")]
    CreateRoom {
        #[serde(alias = "playerName")]
        display_name: String,
    },
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        room_code: String,
        #[serde(alias = "playerName")]
        display_name: String,
    },
    #[serde(rename_all = "camelCase")]
    StartGame {
        room_code: String,
        game_mode: GameMode,
    },
    #[serde(rename_all = "camelCase")]
    EndSpeaking { room_code: String },
    #[serde(rename_all = "camelCase")]
    Vote {
        room_code: String,
        target_player_id: Uuid,
    },
    #[serde(rename_all = "camelCase")]
    RequestHint { room_code: String },
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMsg {
    #[serde(rename_all = "camelCase")]
    RoomCreated {
        room_code: String,
        display_name: String,
        player_id: PlayerId,
    },
    #[serde(rename_all = "camelCase")]
    JoinedRoom {
        room_code: String,
        display_name: String,
        player_id: PlayerId,
    },
    /// The room snapshot, flattened next to the `type` tag.
    RoomUpdate(Room),
    GameStarted(Room),
    #[serde(rename_all = "camelCase")]
    PlayerEliminated {
        eliminated_id: PlayerId,
        eliminated_name: String,
        was_special_role: bool,
    },
    Hint { hint: String },
    Error { code: ErrorCode, message: String },
}

impl ServerMsg {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerMsg::Error {
            code,
            message: message.into(),
        }
    }
}

impl From<&GameError> for ServerMsg {
    fn from(err: &GameError) -> Self {
        ServerMsg::error(err.code(), err.to_string())
    }
}
