//! The deterministic handoff table that paces a session through its agents.

use std::collections::HashMap;

/// Where an agent hands off to, and after how many interactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffRule {
    pub successor: String,
    pub after_interactions: u32,
}

/// Maps each agent to at most one successor. Agents without an entry
/// (the closer) never hand off.
#[derive(Debug, Clone, Default)]
pub struct HandoffPolicy {
    rules: HashMap<String, HandoffRule>,
}

impl HandoffPolicy {
    pub fn new(rules: HashMap<String, HandoffRule>) -> Self {
        Self { rules }
    }

    /// The standard tutoring progression.
    pub fn tutoring() -> Self {
        let table = [
            ("greeter", "introGiver", 1),
            ("introGiver", "questionReader", 1),
            ("questionReader", "brainStormer", 1),
            ("brainStormer", "stepTutor", 3),
            ("stepTutor", "closer", 5),
        ];
        let rules = table
            .into_iter()
            .map(|(from, to, n)| {
                (
                    from.to_string(),
                    HandoffRule {
                        successor: to.to_string(),
                        after_interactions: n,
                    },
                )
            })
            .collect();
        Self { rules }
    }

    pub fn rule_for(&self, agent: &str) -> Option<&HandoffRule> {
        self.rules.get(agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tutoring_progression() {
        let policy = HandoffPolicy::tutoring();

        let greeter = policy.rule_for("greeter").unwrap();
        assert_eq!(greeter.successor, "introGiver");
        assert_eq!(greeter.after_interactions, 1);

        let brainstormer = policy.rule_for("brainStormer").unwrap();
        assert_eq!(brainstormer.successor, "stepTutor");
        assert_eq!(brainstormer.after_interactions, 3);

        let step_tutor = policy.rule_for("stepTutor").unwrap();
        assert_eq!(step_tutor.successor, "closer");
        assert_eq!(step_tutor.after_interactions, 5);
    }

    #[test]
    fn test_closer_has_no_successor() {
        let policy = HandoffPolicy::tutoring();
        assert!(policy.rule_for("closer").is_none());
        assert!(policy.rule_for("unknown").is_none());
    }
}
