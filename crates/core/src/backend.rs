//! The injected generation capability behind a session.
//!
//! Orchestration logic never generates text itself; it asks a
//! [`ResponseBackend`] for fragments. The scripted backend used by the demo
//! server and any future model-backed backend are interchangeable here.

use crate::agent::AgentDefinition;
use anyhow::Result;
use async_trait::async_trait;

/// One piece of a generated response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseFragment {
    /// A fragment of response text.
    Text(String),
    /// A chunk of response audio (base64 encoded).
    Audio(String),
}

/// Produces response fragments for the active agent and a user input.
#[async_trait]
pub trait ResponseBackend: Send + Sync {
    async fn respond(&self, agent: &AgentDefinition, input: &str)
    -> Result<Vec<ResponseFragment>>;
}

/// Deterministic backend that renders each agent's scripted reply template.
#[derive(Debug, Default)]
pub struct ScriptedBackend;

#[async_trait]
impl ResponseBackend for ScriptedBackend {
    async fn respond(
        &self,
        agent: &AgentDefinition,
        input: &str,
    ) -> Result<Vec<ResponseFragment>> {
        Ok(vec![ResponseFragment::Text(agent.reply(input))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentRegistry;
    use crate::problem::ProblemData;

    #[tokio::test]
    async fn test_scripted_backend_is_deterministic() {
        let registry = AgentRegistry::tutoring(&ProblemData::fallback());
        let agent = registry.get("stepTutor").unwrap();
        let backend = ScriptedBackend;

        let a = backend.respond(agent, "solve it").await.unwrap();
        let b = backend.respond(agent, "solve it").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 1);
        match &a[0] {
            ResponseFragment::Text(text) => assert!(text.contains("solve it")),
            other => panic!("expected text fragment, got {other:?}"),
        }
    }
}
