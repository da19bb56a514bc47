//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds all shared,
//! clonable resources: the session manager, the problem data every new
//! registry is built from, and the injected response backend.

use crate::config::Config;
use std::sync::Arc;
use tutor_core::{backend::ResponseBackend, manager::SessionManager, problem::ProblemData};

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<SessionManager>,
    pub problem: Arc<ProblemData>,
    pub backend: Arc<dyn ResponseBackend>,
    pub config: Arc<Config>,
}
