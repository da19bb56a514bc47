//! Scripted tutoring agents and the per-session registry that holds them.
//!
//! Each session gets its own registry instance from [`AgentRegistry::tutoring`],
//! built from an immutable [`ProblemData`] snapshot. Registries are never
//! shared across sessions, so no cross-session interference is possible.

use crate::problem::ProblemData;
use std::collections::HashMap;
use std::fmt;

/// The tool calls an agent is allowed to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    UpdateNotes,
    ShowIntroVisual,
    ShowVisualFeedback,
    UpdateBrainstormNotes,
}

impl ToolName {
    /// The wire name used in `tool_call` messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::UpdateNotes => "update_notes",
            ToolName::ShowIntroVisual => "show_intro_visual",
            ToolName::ShowVisualFeedback => "show_visual_feedback",
            ToolName::UpdateBrainstormNotes => "update_brainstorm_notes",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named conversational persona with fixed instructions and a declared
/// set of tool calls it may emit. Immutable after construction.
#[derive(Debug, Clone)]
pub struct AgentDefinition {
    pub name: String,
    pub description: String,
    pub instructions: String,
    /// Deterministic reply template; `{input}` is replaced with the
    /// submitted content.
    pub reply_template: String,
    pub tools: Vec<ToolName>,
}

impl AgentDefinition {
    /// Renders the agent's scripted reply for the given user input.
    pub fn reply(&self, input: &str) -> String {
        self.reply_template.replace("{input}", input)
    }

    /// Whether this agent declared the given tool capability.
    pub fn can_call(&self, tool: ToolName) -> bool {
        self.tools.contains(&tool)
    }
}

/// The full set of agents available to one session, plus the agent a
/// fresh session starts with.
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    agents: HashMap<String, AgentDefinition>,
    initial_agent: String,
}

impl AgentRegistry {
    /// Builds a registry from explicit definitions. The initial agent must
    /// be one of the provided names.
    pub fn new(agents: Vec<AgentDefinition>, initial_agent: impl Into<String>) -> Self {
        let initial_agent = initial_agent.into();
        let agents: HashMap<String, AgentDefinition> =
            agents.into_iter().map(|a| (a.name.clone(), a)).collect();
        debug_assert!(agents.contains_key(&initial_agent));
        Self {
            agents,
            initial_agent,
        }
    }

    /// The standard six-agent tutoring flow, specialized to the problem.
    pub fn tutoring(problem: &ProblemData) -> Self {
        let total_steps = problem.steps.len();
        let final_answer = problem.final_answer().unwrap_or("(see the worked steps)");

        let agents = vec![
            AgentDefinition {
                name: "greeter".to_string(),
                description: "Welcomes and greets the user to the tutoring session.".to_string(),
                instructions: format!(
                    "Welcome the student to the tutoring session. Tell them that they will \
                     be learning about {}: {}. Be encouraging and supportive in your tone.",
                    problem.topic, problem.title
                ),
                reply_template: "Welcome to our tutoring session! I'm excited to help you \
                                 learn. You said: {input}"
                    .to_string(),
                tools: vec![],
            },
            AgentDefinition {
                name: "introGiver".to_string(),
                description: "Introduces the concept with a visual aid and explanation."
                    .to_string(),
                instructions: format!(
                    "Introduce the concept behind '{}' to the student, then show the \
                     introduction visual with the show_intro_visual tool.",
                    problem.title
                ),
                reply_template: "Let me introduce this concept to you. Based on what you \
                                 said: {input}, here's what we'll explore..."
                    .to_string(),
                tools: vec![ToolName::ShowIntroVisual],
            },
            AgentDefinition {
                name: "questionReader".to_string(),
                description: "Reads out the question and routes to the next phase.".to_string(),
                instructions: format!(
                    "Ask the student whether they want the question read out loud. If they \
                     say yes, read the problem: \"{}\".",
                    problem.problem
                ),
                reply_template: "Now let me present the question to you. You mentioned: \
                                 {input}. Here's our problem to solve..."
                    .to_string(),
                tools: vec![],
            },
            AgentDefinition {
                name: "brainStormer".to_string(),
                description: "Guides the student through open-ended discovery.".to_string(),
                instructions: format!(
                    "Guide the student through discovery for '{}' using an ask, explore, \
                     connect flow. Capture significant discoveries with \
                     update_brainstorm_notes and show visual feedback as ideas develop.",
                    problem.title
                ),
                reply_template: "Excellent thinking! You said: {input}. Let's explore this \
                                 idea further and see what we can discover together..."
                    .to_string(),
                tools: vec![ToolName::UpdateBrainstormNotes, ToolName::ShowVisualFeedback],
            },
            AgentDefinition {
                name: "stepTutor".to_string(),
                description: "Guides the student through the solution step by step.".to_string(),
                instructions: format!(
                    "Guide the student through the problem-solving process for: {}. Work \
                     through all {} steps, and record completed steps with the update_notes \
                     tool without mentioning the tool to the student.",
                    problem.problem, total_steps
                ),
                reply_template: "Great! Let's work through this step by step. From your \
                                 input: {input}, I can see we should focus on..."
                    .to_string(),
                tools: vec![ToolName::UpdateNotes, ToolName::ShowVisualFeedback],
            },
            AgentDefinition {
                name: "closer".to_string(),
                description: "Summarizes the session and provides closure.".to_string(),
                instructions: format!(
                    "Congratulate the student for completing all the steps. Inform them \
                     that the final answer to \"{}\" is: {}. Encourage them to keep \
                     practicing.",
                    problem.problem, final_answer
                ),
                reply_template: "Wonderful work! You've done great today. Reflecting on \
                                 what you shared: {input}, you've learned so much!"
                    .to_string(),
                tools: vec![],
            },
        ];

        Self::new(agents, "greeter")
    }

    pub fn get(&self, name: &str) -> Option<&AgentDefinition> {
        self.agents.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    pub fn initial_agent(&self) -> &str {
        &self.initial_agent
    }

    /// All agent names, sorted for stable output.
    pub fn agent_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.agents.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tutoring_registry_has_six_agents() {
        let registry = AgentRegistry::tutoring(&ProblemData::fallback());
        assert_eq!(registry.len(), 6);
        assert_eq!(registry.initial_agent(), "greeter");
        for name in [
            "greeter",
            "introGiver",
            "questionReader",
            "brainStormer",
            "stepTutor",
            "closer",
        ] {
            assert!(registry.contains(name), "missing agent {name}");
        }
    }

    #[test]
    fn test_reply_embeds_input() {
        let registry = AgentRegistry::tutoring(&ProblemData::fallback());
        let greeter = registry.get("greeter").unwrap();
        let reply = greeter.reply("hello");
        assert!(reply.contains("hello"));
        assert!(reply.contains("Welcome to our tutoring session"));
    }

    #[test]
    fn test_declared_tool_capabilities() {
        let registry = AgentRegistry::tutoring(&ProblemData::fallback());
        assert!(
            registry
                .get("introGiver")
                .unwrap()
                .can_call(ToolName::ShowIntroVisual)
        );
        assert!(
            registry
                .get("stepTutor")
                .unwrap()
                .can_call(ToolName::UpdateNotes)
        );
        assert!(!registry.get("greeter").unwrap().can_call(ToolName::UpdateNotes));
        assert!(
            !registry
                .get("closer")
                .unwrap()
                .can_call(ToolName::ShowIntroVisual)
        );
    }

    #[test]
    fn test_instructions_reference_problem() {
        let problem = ProblemData::fallback();
        let registry = AgentRegistry::tutoring(&problem);
        let greeter = registry.get("greeter").unwrap();
        assert!(greeter.instructions.contains(&problem.title));
    }

    #[test]
    fn test_tool_name_wire_format() {
        assert_eq!(ToolName::UpdateNotes.as_str(), "update_notes");
        assert_eq!(ToolName::ShowIntroVisual.to_string(), "show_intro_visual");
    }
}
