//! WebSocket push layer
//!
//! Registry of open connections, the fanout broadcaster, and the per-socket
//! handler. Mutation handlers emit events through the broadcaster after the
//! store commits; each connected client receives one JSON object per event.

pub mod broadcaster;
pub mod handler;
pub mod registry;
pub mod state;
