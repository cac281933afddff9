//! Prompt-injection screening for the research prompt and the planner output.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::planning::{Plan, TaskTag};

const SNIPPET_CHARS: usize = 200;
const MAX_MATCHES: usize = 20;

const PROMPT_INJECTION_REASON: &str =
    "Possible prompt-injection detected in prompt/evidence. Refusing to follow untrusted instructions.";

/// Outcome of a safety check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyResult {
    pub blocked: bool,
    pub reason: String,
    pub matches: Vec<SafetyMatch>,
}

impl SafetyResult {
    pub fn allowed() -> Self {
        Self::default()
    }

    fn blocked(reason: impl Into<String>, matches: Vec<SafetyMatch>) -> Self {
        Self {
            blocked: true,
            reason: reason.into(),
            matches,
        }
    }
}

/// What triggered a block, and where.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyMatch {
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idx: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Pattern-based guard against instruction manipulation.
pub struct PromptInjectionGuard {
    prompt_patterns: Vec<(&'static str, Regex)>,
    plan_pattern: Option<Regex>,
}

impl Default for PromptInjectionGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptInjectionGuard {
    pub fn new() -> Self {
        let prompt_patterns = [
            ("ignore_prev", r"ignore (all|any|previous) (instructions|directions)"),
            (
                "system_prompt",
                r"(reveal|show|print).{0,40}(system prompt|developer message|hidden prompt)",
            ),
            ("roleplay_override", r"you are (now|no longer) (chatgpt|an ai|the system)"),
            ("tool_abuse", r"(run|execute|call) (a tool|tools|function|functions)"),
            ("data_exfil", r"\b(api keys?|passwords?|secrets?|tokens?|credentials?)\b"),
            ("jailbreak", r"(jailbreak|do anything now|\bdan\b)"),
        ]
        .into_iter()
        .filter_map(|(name, pattern)| case_insensitive(pattern).map(|re| (name, re)))
        .collect();

        let plan_pattern = case_insensitive(
            r"(ignore (all|previous) instructions|system prompt|developer message|\b(api keys?|passwords?|secrets?|tokens?|credentials?)\b|jailbreak|do anything now|\b(run|execute|call)\b.+\b(tool|function)\b)",
        );

        Self {
            prompt_patterns,
            plan_pattern,
        }
    }

    /// Screens the user's research prompt.
    pub fn validate_prompt(&self, prompt: &str) -> SafetyResult {
        let matches: Vec<SafetyMatch> = self
            .scan_text(prompt)
            .into_iter()
            .map(|m| SafetyMatch {
                location: Some("prompt".to_string()),
                ..m
            })
            .take(MAX_MATCHES)
            .collect();

        if matches.is_empty() {
            SafetyResult::allowed()
        } else {
            tracing::warn!(patterns = matches.len(), "prompt blocked by safety guard");
            SafetyResult::blocked(PROMPT_INJECTION_REASON, matches)
        }
    }

    /// Screens the planner's output before any task is executed.
    pub fn validate_plan(&self, plan: &Plan) -> SafetyResult {
        if plan.tasks.is_empty() {
            return SafetyResult::blocked("Planner produced no tasks.", Vec::new());
        }

        for (i, task) in plan.tasks.iter().enumerate() {
            if task.malformed {
                return SafetyResult::blocked(
                    "Planner task is not an object.",
                    vec![SafetyMatch {
                        idx: Some(i),
                        ..Default::default()
                    }],
                );
            }

            let objective = task.objective.trim();
            let known_tag = task.tag.as_ref().is_some_and(TaskTag::is_known);

            if objective.is_empty() || !known_tag {
                return SafetyResult::blocked(
                    "Planner produced invalid task format.",
                    vec![SafetyMatch {
                        idx: Some(i),
                        ..Default::default()
                    }],
                );
            }

            if self.plan_pattern.as_ref().is_some_and(|re| re.is_match(objective)) {
                tracing::warn!(task = i, "plan blocked by safety guard");
                return SafetyResult::blocked(
                    "Planner task contains unsafe instructions.",
                    vec![SafetyMatch {
                        idx: Some(i),
                        snippet: Some(snippet(objective)),
                        ..Default::default()
                    }],
                );
            }
        }

        SafetyResult::allowed()
    }

    fn scan_text(&self, text: &str) -> Vec<SafetyMatch> {
        if text.is_empty() {
            return Vec::new();
        }

        self.prompt_patterns
            .iter()
            .filter(|(_, pattern)| pattern.is_match(text))
            .map(|(name, _)| SafetyMatch {
                pattern: Some(name.to_string()),
                snippet: Some(snippet(text)),
                ..Default::default()
            })
            .collect()
    }
}

/// The report returned in place of research when a check blocks the run.
pub fn blocked_report(result: &SafetyResult) -> String {
    format!(
        "# Request Blocked\n\n\
         Your prompt triggered our safety checks and was not executed.\n\n\
         **Reason:** {}\n\n\
         Please rewrite the request without system overrides, tool abuse, \
         or instruction manipulation.",
        result.reason
    )
}

fn case_insensitive(pattern: &str) -> Option<Regex> {
    RegexBuilder::new(pattern).case_insensitive(true).build().ok()
}

fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_CHARS).collect()
}
