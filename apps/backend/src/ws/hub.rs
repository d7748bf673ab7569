use std::collections::HashSet;

use actix::prelude::*;
use dashmap::DashMap;
use tracing::debug;

use crate::domain::PlayerId;
use crate::services::broadcast::RoomBroadcaster;
use crate::ws::protocol::ServerMsg;

/// Outbound message for one websocket session.
#[derive(Message, Clone, Debug)]
#[rtype(result = "()")]
pub struct Deliver(pub ServerMsg);

/// Live websocket sessions and the room groups they belong to.
#[derive(Default)]
pub struct WsHub {
    connections: DashMap<PlayerId, Recipient<Deliver>>,
    groups: DashMap<String, HashSet<PlayerId>>,
}

impl WsHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_connection(&self, conn: PlayerId, recipient: Recipient<Deliver>) {
        self.connections.insert(conn, recipient);
    }

    /// Forget a session and drop it from every group.
    pub fn unregister_connection(&self, conn: PlayerId) {
        self.connections.remove(&conn);
        self.groups.retain(|_, members| {
            members.remove(&conn);
            !members.is_empty()
        });
    }

    pub fn active_connections_count(&self) -> usize {
        self.connections.len()
    }
}

impl RoomBroadcaster for WsHub {
    fn join_group(&self, room_code: &str, conn: PlayerId) {
        self.groups
            .entry(room_code.to_string())
            .or_default()
            .insert(conn);
    }

    fn leave_group(&self, room_code: &str, conn: PlayerId) {
        if let Some(mut members) = self.groups.get_mut(room_code) {
            members.remove(&conn);
        }
        self.groups.remove_if(room_code, |_, members| members.is_empty());
    }

    fn group_members(&self, room_code: &str) -> Vec<PlayerId> {
        self.groups
            .get(room_code)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    fn send_to(&self, conn: PlayerId, msg: ServerMsg) {
        match self.connections.get(&conn) {
            Some(recipient) => recipient.do_send(Deliver(msg)),
            None => debug!(conn_id = %conn, "dropping message for unknown connection"),
        }
    }
}
