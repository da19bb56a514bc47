//! Problem data loaded once at startup and shared (immutably) with every
//! session's agent registry.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::error;

/// A single solution step of the loaded problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStep {
    pub step_number: u32,
    pub description: String,
    pub updated_expression: String,
}

/// The problem a tutoring session works through.
///
/// Constructed explicitly at startup and passed into each session's
/// registry construction; sessions never share mutable problem state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemData {
    pub topic: String,
    pub title: String,
    pub problem: String,
    #[serde(default)]
    pub steps: Vec<ProblemStep>,
}

impl ProblemData {
    /// Loads problem data from a JSON file, falling back to the built-in
    /// problem if the file is missing or malformed.
    pub fn from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(data) => data,
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Failed to parse problem data, using fallback");
                    Self::fallback()
                }
            },
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to read problem data, using fallback");
                Self::fallback()
            }
        }
    }

    /// The built-in states-of-matter problem used when no file is available.
    pub fn fallback() -> Self {
        Self {
            topic: "Science".to_string(),
            title: "States of Matter and Phase Changes".to_string(),
            problem: "You put an ice cube in a sealed jar and heat it until all the ice \
                      becomes steam. The jar stays sealed the whole time. What happens to \
                      the total mass?"
                .to_string(),
            steps: vec![ProblemStep {
                step_number: 1,
                description: "Student worked on the first step".to_string(),
                updated_expression: "x = 5".to_string(),
            }],
        }
    }

    /// The final answer shown by the closing agent, taken from the last step.
    pub fn final_answer(&self) -> Option<&str> {
        self.steps.last().map(|s| s.updated_expression.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_has_steps() {
        let data = ProblemData::fallback();
        assert_eq!(data.topic, "Science");
        assert!(!data.steps.is_empty());
        assert_eq!(data.final_answer(), Some("x = 5"));
    }

    #[test]
    fn test_parse_camel_case_json() {
        let json = r#"{
            "topic": "Algebra",
            "title": "Linear Equations",
            "problem": "Solve 2x + 3 = 13",
            "steps": [
                {"stepNumber": 1, "description": "Subtract 3", "updatedExpression": "2x = 10"},
                {"stepNumber": 2, "description": "Divide by 2", "updatedExpression": "x = 5"}
            ]
        }"#;
        let data: ProblemData = serde_json::from_str(json).unwrap();
        assert_eq!(data.steps.len(), 2);
        assert_eq!(data.steps[0].step_number, 1);
        assert_eq!(data.final_answer(), Some("x = 5"));
    }

    #[test]
    fn test_steps_default_to_empty() {
        let json = r#"{"topic": "T", "title": "T", "problem": "P"}"#;
        let data: ProblemData = serde_json::from_str(json).unwrap();
        assert!(data.steps.is_empty());
        assert_eq!(data.final_answer(), None);
    }

    #[test]
    fn test_from_file_missing_path_uses_fallback() {
        let data = ProblemData::from_file(Path::new("/nonexistent/problem.json"));
        assert_eq!(data.title, "States of Matter and Phase Changes");
    }
}
