use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::exploration::{EvidenceItem, SearchLogEntry, TaskFailure};
use crate::planning::ResearchTask;
use crate::safety::SafetyResult;
use crate::summary::StructuredSummary;

/// Everything one research run accumulates, stage by stage.
///
/// During exploration `search_log`, `evidence` and `failures` are written
/// only by the orchestrator, after its batch join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Unique identifier for this run
    pub run_id: String,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// The research prompt as submitted (trimmed)
    pub prompt: String,
    /// Human-readable plan steps
    pub plan: Vec<String>,
    /// Tasks produced by the planner
    pub tasks: Vec<ResearchTask>,
    pub search_log: Vec<SearchLogEntry>,
    pub evidence: Vec<EvidenceItem>,
    /// Tasks whose upstream calls failed
    pub failures: Vec<TaskFailure>,
    /// Populated after summarization
    pub summary: Option<StructuredSummary>,
    /// Rendered Markdown report
    pub final_report: String,
    /// Set when a safety check blocked the run
    pub safety: Option<SafetyResult>,
}

impl RunState {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            prompt: prompt.into().trim().to_string(),
            plan: Vec::new(),
            tasks: Vec::new(),
            search_log: Vec::new(),
            evidence: Vec::new(),
            failures: Vec::new(),
            summary: None,
            final_report: String::new(),
            safety: None,
        }
    }

    /// True when a safety check stopped the run.
    pub fn is_blocked(&self) -> bool {
        self.safety.as_ref().is_some_and(|s| s.blocked)
    }

    /// Seconds since the run started, rounded to hundredths.
    pub fn elapsed_secs(&self) -> f64 {
        let millis = (Utc::now() - self.started_at).num_milliseconds().max(0);
        (millis as f64 / 10.0).round() / 100.0
    }
}
