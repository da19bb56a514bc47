//! Tutor Core Library
//!
//! This crate contains the runtime-agnostic heart of the tutoring server:
//! the scripted agent registry, the handoff policy that paces a session
//! through its agents, the per-session event queue, and the manager that
//! owns all live sessions. The web service in `services/api` is a thin
//! transport layer over these types.

pub mod agent;
pub mod backend;
pub mod event;
pub mod handoff;
pub mod manager;
pub mod problem;
pub mod session;
