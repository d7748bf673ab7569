//! Application services: the room registry and intent orchestration.

pub mod broadcast;
pub mod room_flow;
pub mod rooms;

pub use broadcast::RoomBroadcaster;
pub use room_flow::RoomFlow;
pub use rooms::{Membership, Removal, RoomRegistry, VoteReceipt};
