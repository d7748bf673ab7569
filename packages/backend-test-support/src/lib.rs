//! Backend test support utilities
//!
//! Shared by the backend's unit and integration tests:
//! - idempotent tracing initialization
//! - a websocket client that speaks the server's JSON frames

pub mod logging;
pub mod ws_client;
