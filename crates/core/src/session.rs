//! A single live tutoring session: the current-agent pointer, the ordered
//! event queue, and the scripted handoff progression.
//!
//! Concurrency layout: `current_agent`/`is_active` and the interaction
//! counters live behind one per-session lock; the event queue is a separate
//! mpsc channel so enqueueing never requires that lock. Scheduled handoffs
//! run as spawned tasks guarded by a generation counter, so a stale handoff
//! can never fire after the session moved on.

use crate::agent::{AgentRegistry, ToolName};
use crate::backend::{ResponseBackend, ResponseFragment};
use crate::event::SessionEvent;
use crate::handoff::HandoffPolicy;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// The kind of content a client submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitKind {
    Text,
    Audio,
}

/// Timing knobs for a session, injectable for tests.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Pause before a scheduled agent handoff fires.
    pub handoff_delay: Duration,
    /// How long one consume poll waits before its heartbeat wakeup.
    pub event_poll: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            handoff_delay: Duration::from_secs(2),
            event_poll: Duration::from_secs(1),
        }
    }
}

/// Mutable session state, only ever touched under the session lock.
#[derive(Debug)]
struct SessionState {
    current_agent: String,
    is_active: bool,
    /// Set once by the first consume call; prevents re-activation after stop.
    started: bool,
    /// Per-agent interaction counts, consulted by the handoff policy.
    interactions: HashMap<String, u32>,
    /// Bumped on every switch/stop; stale scheduled handoffs check it at
    /// fire time and drop themselves.
    handoff_generation: u64,
}

/// One live tutoring session.
pub struct TutorSession {
    id: Uuid,
    registry: AgentRegistry,
    policy: HandoffPolicy,
    backend: Arc<dyn ResponseBackend>,
    config: SessionConfig,
    state: Mutex<SessionState>,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    event_rx: Mutex<mpsc::UnboundedReceiver<SessionEvent>>,
    /// Handle back to the owning Arc, used by scheduled handoff tasks.
    weak_self: Weak<TutorSession>,
}

impl TutorSession {
    pub fn new(
        id: Uuid,
        registry: AgentRegistry,
        policy: HandoffPolicy,
        backend: Arc<dyn ResponseBackend>,
        config: SessionConfig,
    ) -> Arc<Self> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let current_agent = registry.initial_agent().to_string();
        info!(session_id = %id, agents = ?registry.agent_names(), "Created session");
        Arc::new_cyclic(|weak_self| Self {
            id,
            registry,
            policy,
            backend,
            config,
            state: Mutex::new(SessionState {
                current_agent,
                is_active: false,
                started: false,
                interactions: HashMap::new(),
                handoff_generation: 0,
            }),
            event_tx,
            event_rx: Mutex::new(event_rx),
            weak_self: weak_self.clone(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn is_active(&self) -> bool {
        self.state.lock().await.is_active
    }

    pub async fn current_agent(&self) -> String {
        self.state.lock().await.current_agent.clone()
    }

    /// Routes one unit of user input through the current agent.
    ///
    /// Audio is normalized to a transcription placeholder and then handled
    /// as text. Emits nothing if the session is inactive.
    pub async fn submit(&self, kind: SubmitKind, content: &str) {
        match kind {
            SubmitKind::Text => self.submit_text(content).await,
            SubmitKind::Audio => {
                let placeholder = "[Audio processed: User spoke to the agent]";
                self.submit_text(placeholder).await;
            }
        }
    }

    async fn submit_text(&self, content: &str) {
        let agent_name = {
            let state = self.state.lock().await;
            if !state.is_active {
                warn!(session_id = %self.id, "Dropping input for inactive session");
                return;
            }
            state.current_agent.clone()
        };

        let Some(agent) = self.registry.get(&agent_name) else {
            warn!(session_id = %self.id, agent = %agent_name, "Current agent not found in registry");
            return;
        };

        info!(session_id = %self.id, agent = %agent_name, "Processing user input");

        match self.backend.respond(agent, content).await {
            Ok(fragments) => {
                for fragment in fragments {
                    match fragment {
                        ResponseFragment::Text(text) => {
                            self.enqueue(SessionEvent::TranscriptDelta { text });
                        }
                        ResponseFragment::Audio(data) => {
                            self.enqueue(SessionEvent::AudioDelta { data });
                        }
                    }
                }
            }
            Err(e) => {
                error!(session_id = %self.id, error = ?e, "Backend failed to produce a response");
                self.enqueue(SessionEvent::Error {
                    message: format!("Failed to process message: {e}"),
                });
                return;
            }
        }

        self.run_agent_side_effects(&agent_name, content).await;
        self.enqueue(SessionEvent::ResponseDone);
    }

    /// Agent-specific tool calls, then the handoff policy check.
    async fn run_agent_side_effects(&self, agent_name: &str, content: &str) {
        let Some(agent) = self.registry.get(agent_name) else {
            return;
        };

        let interactions = {
            let mut state = self.state.lock().await;
            let count = state.interactions.entry(agent_name.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        let lowered = content.to_lowercase();
        if agent.can_call(ToolName::UpdateNotes)
            && (lowered.contains("step") || lowered.contains("solve"))
        {
            self.enqueue(SessionEvent::ToolCall {
                function: ToolName::UpdateNotes.as_str().to_string(),
                arguments: json!({
                    "steps": [{
                        "stepNumber": 1,
                        "description": "Student worked on the first step",
                        "updatedExpression": "x = 5"
                    }]
                }),
            });
        } else if agent.can_call(ToolName::ShowIntroVisual) && interactions == 1 {
            self.enqueue(SessionEvent::ToolCall {
                function: ToolName::ShowIntroVisual.as_str().to_string(),
                arguments: json!({
                    "content": "🧊 → 💧 → ☁️",
                    "label": "States of matter transition",
                    "explanation": "Matter changes from solid to liquid to gas",
                    "type": "text"
                }),
            });
        }

        if let Some(rule) = self.policy.rule_for(agent_name) {
            if interactions == rule.after_interactions {
                self.schedule_handoff(agent_name.to_string(), rule.successor.clone())
                    .await;
            }
        }
    }

    /// Schedules the delayed handoff from `from` to `successor`.
    ///
    /// Each schedule takes a fresh generation; at fire time the task
    /// re-checks the generation, the current agent, and activity, so at
    /// most one switch results from one qualifying interaction sequence.
    async fn schedule_handoff(&self, from: String, successor: String) {
        let generation = {
            let mut state = self.state.lock().await;
            state.handoff_generation += 1;
            state.handoff_generation
        };

        // If the Arc is already gone the session is being dropped; there is
        // nothing left to hand off.
        let Some(session) = self.weak_self.upgrade() else {
            return;
        };
        tokio::spawn(async move {
            tokio::time::sleep(session.config.handoff_delay).await;
            {
                let state = session.state.lock().await;
                if state.handoff_generation != generation
                    || state.current_agent != from
                    || !state.is_active
                {
                    debug!(session_id = %session.id, from = %from, "Dropping stale scheduled handoff");
                    return;
                }
            }
            if !session.switch_agent(&successor).await {
                warn!(session_id = %session.id, successor = %successor, "Scheduled handoff failed");
            }
        });
    }

    /// Switches to a different agent. Returns false if the name is not in
    /// the registry; the current agent is left unchanged in that case.
    pub async fn switch_agent(&self, name: &str) -> bool {
        if !self.registry.contains(name) {
            error!(session_id = %self.id, agent = %name, "Agent not found in session registry");
            return false;
        }

        let mut state = self.state.lock().await;
        state.current_agent = name.to_string();
        state.is_active = true;
        state.handoff_generation += 1;
        self.enqueue(SessionEvent::AgentSwitched {
            agent: name.to_string(),
        });
        info!(session_id = %self.id, agent = %name, "Switched agent");
        true
    }

    /// Pulls the next event from the session's queue.
    ///
    /// The first call on a fresh session activates it and enqueues the
    /// synthetic welcome. Returns `None` when the session is no longer
    /// active (within one poll interval of a stop); the poll timeout
    /// itself is only a heartbeat, never a reason to terminate.
    pub async fn next_event(&self) -> Option<SessionEvent> {
        self.ensure_started().await;

        let mut rx = self.event_rx.lock().await;
        loop {
            if !self.is_active().await {
                return None;
            }
            match tokio::time::timeout(self.config.event_poll, rx.recv()).await {
                Ok(Some(event)) => return Some(event),
                // Sender dropped; the session is being torn down.
                Ok(None) => return None,
                Err(_) => continue,
            }
        }
    }

    /// One-shot activation performed by the first consume call.
    async fn ensure_started(&self) {
        let welcome_agent = {
            let mut state = self.state.lock().await;
            if state.started {
                return;
            }
            state.started = true;
            state.is_active = true;
            state.current_agent.clone()
        };

        self.enqueue(SessionEvent::TranscriptDelta {
            text: format!(
                "Hello! Welcome to the tutoring session. I'm your {welcome_agent}. \
                 How can I help you today?"
            ),
        });
        self.enqueue(SessionEvent::ResponseDone);
    }

    /// Deactivates the session. The consume loop observes this on its next
    /// wake; undelivered events are discarded.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        state.is_active = false;
        state.handoff_generation += 1;
        info!(session_id = %self.id, "Stopped session");
    }

    /// Stops the session and switches back to the initial agent.
    pub async fn restart(&self) {
        self.stop().await;
        let initial = self.registry.initial_agent().to_string();
        self.switch_agent(&initial).await;
        info!(session_id = %self.id, "Restarted session");
    }

    fn enqueue(&self, event: SessionEvent) {
        if self.event_tx.send(event).is_err() {
            warn!(session_id = %self.id, "Event receiver dropped; event discarded");
        }
    }
}
