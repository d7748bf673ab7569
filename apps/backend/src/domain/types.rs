use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::GameError;

/// Stable per-connection identifier; doubles as the participant id.
pub type PlayerId = Uuid;

/// Maximum number of players in one room.
pub const ROOM_CAPACITY: usize = 10;
/// Minimum number of players needed to start a game.
pub const MIN_PLAYERS: usize = 3;
/// Advisory speaking-turn length shown to clients. Not enforced.
pub const SPEAKING_TURN_SECONDS: u32 = 30;
/// Upper bound on display name length, in characters.
pub const MAX_DISPLAY_NAME_CHARS: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Citizens share a word; the infiltrator has none.
    Infiltrator,
    /// Agents share a word; the spy holds a similar decoy.
    Spy,
}

impl GameMode {
    /// The single minority role for this mode.
    pub fn special_role(self) -> Role {
        match self {
            GameMode::Infiltrator => Role::Infiltrator,
            GameMode::Spy => Role::Spy,
        }
    }

    /// Role held by everyone else.
    pub fn base_role(self) -> Role {
        match self {
            GameMode::Infiltrator => Role::Citizen,
            GameMode::Spy => Role::Agent,
        }
    }

    /// Faction that wins when the special role survives.
    pub fn special_faction(self) -> Winner {
        match self {
            GameMode::Infiltrator => Winner::Infiltrator,
            GameMode::Spy => Winner::Spy,
        }
    }

    /// Faction that wins by eliminating the special role.
    pub fn base_faction(self) -> Winner {
        match self {
            GameMode::Infiltrator => Winner::Citizens,
            GameMode::Spy => Winner::Agents,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Citizen,
    Infiltrator,
    Agent,
    Spy,
}

impl Role {
    pub fn is_special(self) -> bool {
        matches!(self, Role::Infiltrator | Role::Spy)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Citizen => "citizen",
            Role::Infiltrator => "infiltrator",
            Role::Agent => "agent",
            Role::Spy => "spy",
        }
    }
}

/// Room lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    Lobby,
    Playing,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Citizens,
    Infiltrator,
    Agents,
    Spy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: PlayerId,
    pub display_name: String,
}

/// Trim and validate a display name.
pub fn normalize_display_name(raw: &str) -> Result<String, GameError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(GameError::InvalidDisplayName("name is empty".into()));
    }
    if name.chars().count() > MAX_DISPLAY_NAME_CHARS {
        return Err(GameError::InvalidDisplayName(format!(
            "name is longer than {MAX_DISPLAY_NAME_CHARS} characters"
        )));
    }
    Ok(name.to_string())
}
