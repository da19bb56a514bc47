//! Tutor API Library Crate
//!
//! This library contains all the web-facing logic for the tutoring demo
//! server: configuration, shared state, the REST handlers for session
//! lifecycle, the WebSocket transport adapter, and routing. The `api`
//! binary is a thin wrapper around this library.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
pub mod ws;
