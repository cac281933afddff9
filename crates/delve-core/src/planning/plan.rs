use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The output of the planning step.
///
/// `steps` is the human-readable research plan; `tasks` are the independent
/// objectives the exploration phase fans out over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(rename = "plan", default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<ResearchTask>,
}

impl Plan {
    pub fn new(steps: Vec<String>, tasks: Vec<ResearchTask>) -> Self {
        Self { steps, tasks }
    }

    /// The plan used when the model's answer cannot be parsed.
    pub fn fallback(prompt: &str) -> Self {
        Self {
            steps: vec![format!("Research: {prompt}")],
            tasks: vec![
                ResearchTask::new(format!("Academic angle: {prompt}"), TaskTag::Research),
                ResearchTask::new(format!("Industry angle: {prompt}"), TaskTag::Industry),
                ResearchTask::new(format!("General overview: {prompt}"), TaskTag::General),
            ],
        }
    }

    /// Converts the plan to YAML format.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// One parallelizable research objective.
///
/// On the wire the objective is called `task`, matching the planner's JSON.
/// Parsing is lenient so the safety guard sees exactly what the planner
/// produced: a non-string `task` reads as empty, a missing or blank `tag`
/// stays `None`, and entries that were not objects at all are `malformed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchTask {
    #[serde(rename = "task", default, deserialize_with = "string_or_empty")]
    pub objective: String,
    #[serde(default, deserialize_with = "tag_or_none")]
    pub tag: Option<TaskTag>,
    #[serde(skip)]
    pub malformed: bool,
}

impl ResearchTask {
    pub fn new(objective: impl Into<String>, tag: TaskTag) -> Self {
        Self {
            objective: objective.into(),
            tag: Some(tag),
            malformed: false,
        }
    }

    /// Placeholder for a planner entry that was not an object.
    pub fn malformed() -> Self {
        Self {
            objective: String::new(),
            tag: None,
            malformed: true,
        }
    }

    /// The trimmed objective, or `None` when there is nothing to research.
    pub fn trimmed_objective(&self) -> Option<&str> {
        let objective = self.objective.trim();
        (!objective.is_empty()).then_some(objective)
    }

    /// The tag evidence is labelled with; untagged tasks count as general.
    pub fn tag_or_default(&self) -> TaskTag {
        self.tag.clone().unwrap_or_default()
    }
}

fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn tag_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<TaskTag>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => Some(TaskTag::from(s)),
        Value::String(_) | Value::Null => None,
        other => Some(TaskTag::Other(other.to_string())),
    })
}

/// Coarse category attached to a task and carried onto its evidence.
///
/// The planner is asked for one of the three known tags, but any other
/// string is carried through untouched; rejecting it is the safety guard's
/// call, not the orchestrator's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskTag {
    Research,
    Industry,
    #[default]
    General,
    Other(String),
}

impl TaskTag {
    pub fn as_str(&self) -> &str {
        match self {
            TaskTag::Research => "research",
            TaskTag::Industry => "industry",
            TaskTag::General => "general",
            TaskTag::Other(tag) => tag,
        }
    }

    /// True for the tags the planner is instructed to use.
    pub fn is_known(&self) -> bool {
        !matches!(self, TaskTag::Other(_))
    }
}

impl From<&str> for TaskTag {
    fn from(tag: &str) -> Self {
        match tag.trim() {
            "general" => TaskTag::General,
            "research" => TaskTag::Research,
            "industry" => TaskTag::Industry,
            other => TaskTag::Other(other.to_string()),
        }
    }
}

impl From<String> for TaskTag {
    fn from(tag: String) -> Self {
        TaskTag::from(tag.as_str())
    }
}

impl From<TaskTag> for String {
    fn from(tag: TaskTag) -> Self {
        tag.as_str().to_string()
    }
}

impl fmt::Display for TaskTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
