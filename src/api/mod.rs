//! API module for HTTP and WebSocket endpoints
//!
//! REST CRUD over articles plus real-time mutation push over WebSocket.

pub mod http;
pub mod rest;
pub mod websocket;
