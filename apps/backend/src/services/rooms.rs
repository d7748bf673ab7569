//! In-memory room registry.
//!
//! Owns every live [`Room`] plus the reverse index from connection id to the
//! room it belongs to. Each intent runs under the room's map guard, so
//! intents against one room never interleave while different rooms proceed
//! independently. The `*_then` variants hand the result to a publish
//! callback before the guard is released, so fan-out for one room happens
//! in the same order as its mutations.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::domain::machine::{self, now_millis, Departure, TurnAdvance, VoteOutcome};
use crate::domain::types::{normalize_display_name, GameMode, Participant, ROOM_CAPACITY};
use crate::domain::{GameState, PlayerId, Role, Room, WordCorpus};
use crate::errors::GameError;
use crate::utils::room_code::{generate_room_code, normalize_room_code};

type CodeSource = Box<dyn FnMut() -> String + Send>;

/// Where a connection currently sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub room_code: String,
    pub display_name: String,
}

/// Result of a recorded or resolved ballot.
#[derive(Debug, Clone)]
pub struct VoteReceipt {
    pub room: Room,
    pub outcome: VoteOutcome,
}

/// Result of removing a participant.
#[derive(Debug, Clone)]
pub struct Removal {
    pub room_code: String,
    pub display_name: String,
    /// The room after the departure; `None` once it was deleted.
    pub room: Option<Room>,
    pub departure: Departure,
}

pub struct RoomRegistry {
    rooms: DashMap<String, Room>,
    members: DashMap<PlayerId, Membership>,
    corpus: Arc<WordCorpus>,
    rng: Mutex<ChaCha8Rng>,
    code_source: Mutex<CodeSource>,
}

impl RoomRegistry {
    pub fn new(corpus: Arc<WordCorpus>) -> Self {
        Self {
            rooms: DashMap::new(),
            members: DashMap::new(),
            corpus,
            rng: Mutex::new(ChaCha8Rng::from_os_rng()),
            code_source: Mutex::new(Box::new(generate_room_code)),
        }
    }

    /// Replace the room code generator. Codes are still checked against
    /// live rooms.
    pub fn with_code_source(self, source: impl FnMut() -> String + Send + 'static) -> Self {
        Self {
            code_source: Mutex::new(Box::new(source)),
            ..self
        }
    }

    /// Seed the assignment RNG.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
            ..self
        }
    }

    pub fn corpus(&self) -> &WordCorpus {
        &self.corpus
    }

    /// Create a lobby hosted by `conn`, who becomes its first player.
    ///
    /// The creator is added to `players` right away so the host is always a
    /// current player, and a creator who leaves an otherwise empty lobby
    /// takes the room with them.
    pub fn create_room(&self, conn: PlayerId, display_name: &str) -> Result<Room, GameError> {
        self.create_room_then(conn, display_name, |_| {})
    }

    /// [`Self::create_room`], calling `publish` before the room is released.
    pub fn create_room_then(
        &self,
        conn: PlayerId,
        display_name: &str,
        publish: impl FnOnce(&Room),
    ) -> Result<Room, GameError> {
        if self.members.contains_key(&conn) {
            return Err(GameError::AlreadyInRoom);
        }
        let display_name = normalize_display_name(display_name)?;
        let host = Participant {
            id: conn,
            display_name: display_name.clone(),
        };

        let room = loop {
            let candidate = {
                let mut next_code = self.code_source.lock();
                normalize_room_code(&(*next_code)())
            };
            match self.rooms.entry(candidate) {
                Entry::Occupied(taken) => {
                    tracing::debug!(room_code = %taken.key(), "room code collision; regenerating");
                }
                Entry::Vacant(slot) => {
                    let room = Room::new(slot.key().clone(), host);
                    self.members.insert(
                        conn,
                        Membership {
                            room_code: room.code.clone(),
                            display_name,
                        },
                    );
                    break slot.insert(room);
                }
            }
        };

        info!(room_code = %room.code, conn_id = %conn, "room created");
        publish(room.value());
        Ok(room.clone())
    }

    pub fn join_room(
        &self,
        conn: PlayerId,
        room_code: &str,
        display_name: &str,
    ) -> Result<Room, GameError> {
        self.join_room_then(conn, room_code, display_name, |_| {})
    }

    pub fn join_room_then(
        &self,
        conn: PlayerId,
        room_code: &str,
        display_name: &str,
        publish: impl FnOnce(&Room),
    ) -> Result<Room, GameError> {
        if self.members.contains_key(&conn) {
            return Err(GameError::AlreadyInRoom);
        }
        let display_name = normalize_display_name(display_name)?;
        let code = normalize_room_code(room_code);

        let mut room = self.rooms.get_mut(&code).ok_or(GameError::RoomNotFound)?;
        if room.game_state != GameState::Lobby {
            return Err(GameError::GameAlreadyStarted);
        }
        if room.players.len() >= ROOM_CAPACITY {
            return Err(GameError::RoomFull);
        }
        room.players.push(Participant {
            id: conn,
            display_name: display_name.clone(),
        });
        self.members.insert(
            conn,
            Membership {
                room_code: code.clone(),
                display_name,
            },
        );

        info!(room_code = %code, conn_id = %conn, players = room.players.len(), "player joined");
        publish(room.value());
        Ok(room.clone())
    }

    pub fn start_game(
        &self,
        conn: PlayerId,
        room_code: &str,
        mode: GameMode,
    ) -> Result<Room, GameError> {
        self.start_game_then(conn, room_code, mode, |_| {})
    }

    pub fn start_game_then(
        &self,
        conn: PlayerId,
        room_code: &str,
        mode: GameMode,
        publish: impl FnOnce(&Room),
    ) -> Result<Room, GameError> {
        self.with_member_room(conn, room_code, |room| {
            let mut rng = self.rng.lock();
            machine::start_game(room, conn, mode, &self.corpus, &mut *rng, now_millis())?;
            info!(
                room_code = %room.code,
                game_mode = ?mode,
                players = room.players.len(),
                "game started"
            );
            publish(&*room);
            Ok(room.clone())
        })
    }

    pub fn end_speaking(
        &self,
        conn: PlayerId,
        room_code: &str,
    ) -> Result<(Room, TurnAdvance), GameError> {
        self.end_speaking_then(conn, room_code, |_| {})
    }

    pub fn end_speaking_then(
        &self,
        conn: PlayerId,
        room_code: &str,
        publish: impl FnOnce(&Room),
    ) -> Result<(Room, TurnAdvance), GameError> {
        self.with_member_room(conn, room_code, |room| {
            let advance = machine::end_speaking_turn(room, conn, now_millis())?;
            if advance == TurnAdvance::VotingOpened {
                info!(room_code = %room.code, round = room.current_round, "voting opened");
            }
            publish(&*room);
            Ok((room.clone(), advance))
        })
    }

    pub fn cast_vote(
        &self,
        conn: PlayerId,
        room_code: &str,
        target: PlayerId,
    ) -> Result<VoteReceipt, GameError> {
        self.cast_vote_then(conn, room_code, target, |_| {})
    }

    pub fn cast_vote_then(
        &self,
        conn: PlayerId,
        room_code: &str,
        target: PlayerId,
        publish: impl FnOnce(&VoteReceipt),
    ) -> Result<VoteReceipt, GameError> {
        self.with_member_room(conn, room_code, |room| {
            let outcome = machine::cast_vote(room, conn, target, now_millis())?;
            if let VoteOutcome::Resolved(elimination) = &outcome {
                log_elimination(room, elimination);
            }
            let receipt = VoteReceipt {
                room: room.clone(),
                outcome,
            };
            publish(&receipt);
            Ok(receipt)
        })
    }

    /// The caller's own word and role, once assigned.
    pub fn player_secret(
        &self,
        conn: PlayerId,
        room_code: &str,
    ) -> Result<(Option<String>, Role), GameError> {
        self.with_member_room(conn, room_code, |room| {
            let role = *room.roles.get(&conn).ok_or(GameError::InvalidState)?;
            let word = room.words.get(&conn).cloned().flatten();
            Ok((word, role))
        })
    }

    /// Drop `conn` from whatever room it is in. Deletes the room when it
    /// was the last player.
    pub fn remove_participant(&self, conn: PlayerId) -> Option<Removal> {
        self.remove_participant_then(conn, |_| {})
    }

    /// [`Self::remove_participant`], calling `publish` before the room is
    /// released.
    pub fn remove_participant_then(
        &self,
        conn: PlayerId,
        publish: impl FnOnce(&Removal),
    ) -> Option<Removal> {
        let (_, membership) = self.members.remove(&conn)?;
        let Membership {
            room_code,
            display_name,
        } = membership;

        let removal = match self.rooms.entry(room_code.clone()) {
            Entry::Occupied(mut entry) => {
                let departure = machine::remove_player(entry.get_mut(), conn, now_millis());
                if let Some(elimination) = &departure.elimination {
                    log_elimination(entry.get(), elimination);
                } else if let Some(winner) = departure.game_over {
                    info!(room_code = %room_code, winner = ?winner, "game finished");
                }
                info!(room_code = %room_code, conn_id = %conn, "player left");
                if departure.room_empty {
                    info!(room_code = %room_code, "room removed");
                    let removal = Removal {
                        room_code,
                        display_name,
                        room: None,
                        departure,
                    };
                    publish(&removal);
                    entry.remove();
                    removal
                } else {
                    if let Some(new_host) = departure.new_host {
                        info!(room_code = %room_code, new_host = %new_host, "host reassigned");
                    }
                    let removal = Removal {
                        room_code,
                        display_name,
                        room: Some(entry.get().clone()),
                        departure,
                    };
                    publish(&removal);
                    removal
                }
            }
            Entry::Vacant(_) => {
                let removal = Removal {
                    room_code,
                    display_name,
                    room: None,
                    departure: Departure::default(),
                };
                publish(&removal);
                removal
            }
        };
        Some(removal)
    }

    /// Snapshot of a live room.
    pub fn room(&self, room_code: &str) -> Option<Room> {
        self.rooms
            .get(&normalize_room_code(room_code))
            .map(|room| room.clone())
    }

    pub fn membership(&self, conn: PlayerId) -> Option<Membership> {
        self.members.get(&conn).map(|m| m.clone())
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Run `f` on the named room after checking that `conn` belongs to it.
    fn with_member_room<T>(
        &self,
        conn: PlayerId,
        room_code: &str,
        f: impl FnOnce(&mut Room) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let code = normalize_room_code(room_code);
        let mut room = self.rooms.get_mut(&code).ok_or(GameError::RoomNotFound)?;
        if !room.is_member(conn) {
            return Err(GameError::NotInRoom);
        }
        f(room.value_mut())
    }
}

fn log_elimination(room: &Room, elimination: &machine::Elimination) {
    info!(
        room_code = %room.code,
        round = room.current_round,
        eliminated_id = %elimination.eliminated_id,
        was_special_role = elimination.was_special_role,
        votes = elimination.votes_received,
        "player eliminated"
    );
    if let Some(winner) = room.winner {
        info!(room_code = %room.code, winner = ?winner, "game finished");
    }
}
