//! Room flow orchestration - bridges the registry with room broadcasts.
//!
//! Each method applies one intent through [`RoomRegistry`] and, on success,
//! fans the resulting snapshot or event out to the room while the registry
//! still holds the room, so every member sees snapshots in mutation order.
//! Errors are returned to the caller untouched so the transport can report
//! them to the originating connection only.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{Elimination, GameMode, PlayerId, Role, Room, VoteOutcome};
use crate::errors::GameError;
use crate::services::broadcast::RoomBroadcaster;
use crate::services::rooms::RoomRegistry;
use crate::ws::protocol::ServerMsg;

pub struct RoomFlow {
    registry: Arc<RoomRegistry>,
    broadcaster: Arc<dyn RoomBroadcaster>,
}

impl RoomFlow {
    pub fn new(registry: Arc<RoomRegistry>, broadcaster: Arc<dyn RoomBroadcaster>) -> Self {
        Self {
            registry,
            broadcaster,
        }
    }

    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    /// `roomCreated` to the creator, then the lobby snapshot.
    pub fn create_room(&self, conn: PlayerId, display_name: &str) -> Result<Room, GameError> {
        self.registry
            .create_room_then(conn, display_name, |room| {
                self.broadcaster.join_group(&room.code, conn);
                self.broadcaster.send_to(
                    conn,
                    ServerMsg::RoomCreated {
                        room_code: room.code.clone(),
                        display_name: room.players[0].display_name.clone(),
                        player_id: conn,
                    },
                );
                self.broadcast_room(room);
            })
            .inspect_err(|err| log_rejected("createRoom", conn, err))
    }

    /// `joinedRoom` to the joiner, then the snapshot to everyone.
    pub fn join_room(
        &self,
        conn: PlayerId,
        room_code: &str,
        display_name: &str,
    ) -> Result<Room, GameError> {
        self.registry
            .join_room_then(conn, room_code, display_name, |room| {
                let joined_name = room
                    .player(conn)
                    .map(|p| p.display_name.clone())
                    .unwrap_or_default();
                self.broadcaster.join_group(&room.code, conn);
                self.broadcaster.send_to(
                    conn,
                    ServerMsg::JoinedRoom {
                        room_code: room.code.clone(),
                        display_name: joined_name,
                        player_id: conn,
                    },
                );
                self.broadcast_room(room);
            })
            .inspect_err(|err| log_rejected("joinRoom", conn, err))
    }

    /// `gameStarted` then `roomUpdate`, each personalized per recipient.
    pub fn start_game(
        &self,
        conn: PlayerId,
        room_code: &str,
        mode: GameMode,
    ) -> Result<Room, GameError> {
        self.registry
            .start_game_then(conn, room_code, mode, |room| {
                self.broadcaster.broadcast_with(&room.code, &|viewer| {
                    ServerMsg::GameStarted(room.view_for(viewer))
                });
                self.broadcast_room(room);
            })
            .inspect_err(|err| log_rejected("startGame", conn, err))
    }

    pub fn end_speaking(&self, conn: PlayerId, room_code: &str) -> Result<Room, GameError> {
        self.registry
            .end_speaking_then(conn, room_code, |room| self.broadcast_room(room))
            .map(|(room, _)| room)
            .inspect_err(|err| log_rejected("endSpeaking", conn, err))
    }

    /// `playerEliminated` precedes the snapshot when the ballot resolves.
    pub fn vote(
        &self,
        conn: PlayerId,
        room_code: &str,
        target: PlayerId,
    ) -> Result<Room, GameError> {
        self.registry
            .cast_vote_then(conn, room_code, target, |receipt| {
                if let VoteOutcome::Resolved(elimination) = &receipt.outcome {
                    self.broadcast_elimination(&receipt.room, elimination);
                }
                self.broadcast_room(&receipt.room);
            })
            .map(|receipt| receipt.room)
            .inspect_err(|err| log_rejected("vote", conn, err))
    }

    /// Word and role to build a hint for. Does not touch the room.
    pub fn hint_subject(
        &self,
        conn: PlayerId,
        room_code: &str,
    ) -> Result<(Option<String>, Role), GameError> {
        self.registry
            .player_secret(conn, room_code)
            .inspect_err(|err| log_rejected("requestHint", conn, err))
    }

    /// Transport-level disconnect: leave the room and tell whoever remains.
    pub fn disconnect(&self, conn: PlayerId) {
        self.registry.remove_participant_then(conn, |removal| {
            self.broadcaster.leave_group(&removal.room_code, conn);
            let Some(room) = &removal.room else {
                return;
            };
            if let Some(elimination) = &removal.departure.elimination {
                self.broadcast_elimination(room, elimination);
            }
            self.broadcast_room(room);
        });
    }

    fn broadcast_elimination(&self, room: &Room, elimination: &Elimination) {
        self.broadcaster.broadcast(
            &room.code,
            &ServerMsg::PlayerEliminated {
                eliminated_id: elimination.eliminated_id,
                eliminated_name: elimination.eliminated_name.clone(),
                was_special_role: elimination.was_special_role,
            },
        );
    }

    fn broadcast_room(&self, room: &Room) {
        self.broadcaster
            .broadcast_with(&room.code, &|viewer| ServerMsg::RoomUpdate(room.view_for(viewer)));
    }
}

fn log_rejected(intent: &'static str, conn: PlayerId, err: &GameError) {
    debug!(intent, conn_id = %conn, code = %err.code(), "intent rejected");
}
