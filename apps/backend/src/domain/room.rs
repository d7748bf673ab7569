//! The room aggregate: everything a client needs to render a game.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::types::{
    GameMode, GameState, Participant, PlayerId, Role, Winner, SPEAKING_TURN_SECONDS,
};

/// A room and its game.
///
/// Mutated only through the functions in [`crate::domain::machine`]; the
/// registry owns every live instance. Serializes to the snapshot shape sent
/// to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub code: String,
    pub host_id: PlayerId,
    /// Join order. Host reassignment picks the first entry.
    pub players: Vec<Participant>,
    pub game_state: GameState,
    pub game_mode: Option<GameMode>,
    pub current_round: u32,
    /// Meaningful only while `speaking_phase` is set.
    pub current_speaker_id: Option<PlayerId>,
    pub speaking_phase: bool,
    pub voting_phase: bool,
    /// Unix milliseconds at which the current speaker's turn began.
    pub speaking_turn_started_at: Option<i64>,
    pub speaking_turn_seconds: u32,
    /// Speaking rotation fixed at game start.
    pub turn_order: Vec<PlayerId>,
    /// Players that already spoke in the current round.
    #[serde(skip)]
    pub spoken_this_round: Vec<PlayerId>,
    /// Voter -> target. Last vote wins.
    pub votes: HashMap<PlayerId, PlayerId>,
    /// Append-only, in elimination order.
    pub eliminated: Vec<PlayerId>,
    /// `None` is the "no word" marker held by the infiltrator.
    pub words: HashMap<PlayerId, Option<String>>,
    pub roles: HashMap<PlayerId, Role>,
    pub winner: Option<Winner>,
}

impl Room {
    /// A fresh lobby whose first player is its host.
    pub fn new(code: String, host: Participant) -> Self {
        Self {
            code,
            host_id: host.id,
            players: vec![host],
            game_state: GameState::Lobby,
            game_mode: None,
            current_round: 0,
            current_speaker_id: None,
            speaking_phase: false,
            voting_phase: false,
            speaking_turn_started_at: None,
            speaking_turn_seconds: SPEAKING_TURN_SECONDS,
            turn_order: Vec::new(),
            spoken_this_round: Vec::new(),
            votes: HashMap::new(),
            eliminated: Vec::new(),
            words: HashMap::new(),
            roles: HashMap::new(),
            winner: None,
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Participant> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn is_member(&self, id: PlayerId) -> bool {
        self.player(id).is_some()
    }

    pub fn is_eliminated(&self, id: PlayerId) -> bool {
        self.eliminated.contains(&id)
    }

    /// A current member who has not been eliminated.
    pub fn is_active(&self, id: PlayerId) -> bool {
        self.is_member(id) && !self.is_eliminated(id)
    }

    /// Active players in join order.
    pub fn active_players(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .map(|p| p.id)
            .filter(|id| !self.is_eliminated(*id))
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.players
            .iter()
            .filter(|p| !self.is_eliminated(p.id))
            .count()
    }

    pub fn special_role(&self) -> Option<Role> {
        self.game_mode.map(GameMode::special_role)
    }

    /// The snapshot as seen by `viewer`.
    ///
    /// Until the game is finished only the viewer's own word and role are
    /// included; at the end everything is revealed.
    pub fn view_for(&self, viewer: PlayerId) -> Room {
        let mut view = self.clone();
        if self.game_state != GameState::Finished {
            view.words.retain(|id, _| *id == viewer);
            view.roles.retain(|id, _| *id == viewer);
        }
        view
    }
}
