//! WebSocket Transport
//!
//! This module bridges external WebSocket connections to live sessions:
//!
//! - `protocol`: Defines the JSON-based message format for client-server communication.
//! - `adapter`: Runs the inbound/outbound loops for one connection and handles teardown.

mod adapter;
pub mod protocol;

pub use adapter::ws_handler;
