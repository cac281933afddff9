use serde_json::Value;

use crate::llm::{extract_json, LLMError, LLM};
use crate::planning::plan::{Plan, ResearchTask, TaskTag};
use crate::planning::prompts::{build_planner_prompt, PLANNER_SYSTEM_PROMPT};

/// Turns a research prompt into a plan and a set of parallel tasks.
pub struct Planner<L: LLM> {
    llm: L,
}

impl<L: LLM> Planner<L> {
    pub fn new(llm: L) -> Self {
        Self { llm }
    }

    /// Asks the model for a plan.
    ///
    /// Transport failures propagate; an answer that is not the expected JSON
    /// degrades to [`Plan::fallback`].
    pub async fn plan(&self, prompt: &str) -> Result<Plan, LLMError> {
        let response = self
            .llm
            .complete_with_system(PLANNER_SYSTEM_PROMPT, &build_planner_prompt(prompt))
            .await?;

        match parse_plan(&response) {
            Some(plan) => {
                tracing::info!(steps = plan.steps.len(), tasks = plan.tasks.len(), "plan ready");
                Ok(plan)
            }
            None => {
                tracing::warn!("planner response was not valid JSON, using fallback plan");
                Ok(Plan::fallback(prompt))
            }
        }
    }
}

/// Parses the planner's JSON answer.
///
/// Returns `None` only when the payload is not a JSON object. Fields of the
/// wrong shape become empty lists. Every entry of `tasks` is kept, in order,
/// so the safety guard can reject the ones that are malformed.
pub fn parse_plan(response: &str) -> Option<Plan> {
    let value: Value = serde_json::from_str(extract_json(response)).ok()?;
    let object = value.as_object()?;

    let steps = match object.get("plan") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        _ => Vec::new(),
    };

    let tasks = match object.get("tasks") {
        Some(Value::Array(items)) => items.iter().map(parse_task).collect(),
        _ => Vec::new(),
    };

    Some(Plan::new(steps, tasks))
}

fn parse_task(item: &Value) -> ResearchTask {
    match item {
        Value::Object(_) => {
            serde_json::from_value(item.clone()).unwrap_or_else(|_| ResearchTask::malformed())
        }
        _ => ResearchTask::malformed(),
    }
}
