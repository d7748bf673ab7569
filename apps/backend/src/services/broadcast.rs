//! Room-scoped fan-out capability used by the room flow.

use crate::domain::PlayerId;
use crate::ws::protocol::ServerMsg;

/// Delivers server messages to connections and to room membership groups.
///
/// Delivery is fire-and-forget: a connection that has already gone away is
/// skipped silently.
pub trait RoomBroadcaster: Send + Sync {
    fn join_group(&self, room_code: &str, conn: PlayerId);

    fn leave_group(&self, room_code: &str, conn: PlayerId);

    /// Current members of a room group.
    fn group_members(&self, room_code: &str) -> Vec<PlayerId>;

    fn send_to(&self, conn: PlayerId, msg: ServerMsg);

    /// Send every group member the message built for them.
    fn broadcast_with(&self, room_code: &str, build: &dyn Fn(PlayerId) -> ServerMsg) {
        for conn in self.group_members(room_code) {
            self.send_to(conn, build(conn));
        }
    }

    fn broadcast(&self, room_code: &str, msg: &ServerMsg) {
        self.broadcast_with(room_code, &|_| msg.clone());
    }
}
