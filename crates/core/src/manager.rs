//! Owns the table of live sessions.
//!
//! The manager lock guards structural mutation of the table only. It is
//! never held across a session's own lock: cleanup removes the entry under
//! the manager lock and stops the session after releasing it, so a slow
//! per-session operation can never block the whole manager.

use crate::session::TutorSession;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

/// Manages all concurrently live tutoring sessions, keyed by id.
#[derive(Default)]
pub struct SessionManager {
    sessions: Mutex<HashMap<Uuid, Arc<TutorSession>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new session. Returns false (and logs) if the id is
    /// already present; the check and insert are atomic under the
    /// manager lock.
    pub async fn create_session(&self, session: Arc<TutorSession>) -> bool {
        let id = session.id();
        let mut sessions = self.sessions.lock().await;
        if sessions.contains_key(&id) {
            warn!(session_id = %id, "Session already exists");
            return false;
        }
        sessions.insert(id, session);
        info!(session_id = %id, "Registered session");
        true
    }

    pub async fn get_session(&self, id: &Uuid) -> Option<Arc<TutorSession>> {
        self.sessions.lock().await.get(id).cloned()
    }

    /// Stops and removes a session. Safe to call twice: the second call
    /// observes the absence and returns false without error.
    pub async fn cleanup_session(&self, id: &Uuid) -> bool {
        let removed = self.sessions.lock().await.remove(id);
        match removed {
            Some(session) => {
                session.stop().await;
                info!(session_id = %id, "Cleaned up session");
                true
            }
            None => {
                warn!(session_id = %id, "Session not found for cleanup");
                false
            }
        }
    }

    /// Cleans up every live session; used at process shutdown. Individual
    /// failures are logged and skipped.
    pub async fn cleanup_all(&self) {
        let ids: Vec<Uuid> = self.sessions.lock().await.keys().copied().collect();
        for id in ids {
            if !self.cleanup_session(&id).await {
                warn!(session_id = %id, "Session disappeared during shutdown cleanup");
            }
        }
        info!("All sessions cleaned up");
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
