//! Evidence gathering.
//!
//! [`ExplorationOrchestrator`] fans a plan's tasks out to [`TaskRunner`]s,
//! joins them in launch order and merges their output into the
//! [`RunState`](crate::RunState). Runners never touch shared state; they
//! return values and the orchestrator is the only writer.

mod dedup;
mod orchestrator;
mod runner;

pub use dedup::dedup_evidence;
pub use orchestrator::{ExplorationError, ExplorationOrchestrator};
pub use runner::{TaskError, TaskLimits, TaskOutput, TaskRunner};

use serde::{Deserialize, Serialize};

/// One quoted excerpt, attributed to its source page and the task that found it.
///
/// Identity is the `(url, quote)` pair, compared exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceItem {
    #[serde(rename = "agent")]
    pub agent_tag: String,
    pub url: Option<String>,
    pub quote: String,
}

impl EvidenceItem {
    pub fn new(agent_tag: impl Into<String>, url: Option<String>, quote: impl Into<String>) -> Self {
        Self {
            agent_tag: agent_tag.into(),
            url,
            quote: quote.into(),
        }
    }
}

/// Audit record: a task reached the search step and found these URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLogEntry {
    #[serde(rename = "agent")]
    pub agent_tag: String,
    pub objective: String,
    pub urls: Vec<String>,
}

/// A task whose upstream calls failed while failures were being isolated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFailure {
    #[serde(rename = "agent")]
    pub agent_tag: String,
    pub objective: String,
    pub error: String,
}
