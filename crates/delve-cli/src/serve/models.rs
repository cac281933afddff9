//! API request/response types for the research server.
//!
//! `ResearchResponse` is also what `delve run --json` prints.

use serde::{Deserialize, Serialize};

use delve_core::exploration::SearchLogEntry;
use delve_core::safety::SafetyResult;
use delve_core::{ResearchTask, RunState, StructuredSummary};

/// Body of `POST /research`.
#[derive(Debug, Deserialize)]
pub struct ResearchRequest {
    #[serde(default)]
    pub prompt: String,
}

/// Result of one research run.
#[derive(Debug, Serialize)]
pub struct ResearchResponse {
    pub final_report: String,
    pub summary_structured: Option<StructuredSummary>,
    pub plan: Vec<String>,
    pub tasks: Vec<ResearchTask>,
    pub search_log: Vec<SearchLogEntry>,
    pub evidence_count: usize,
    pub took_seconds: f64,
    /// Present only when a safety check blocked the run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety: Option<SafetyResult>,
}

impl From<RunState> for ResearchResponse {
    fn from(state: RunState) -> Self {
        let took_seconds = state.elapsed_secs();
        Self {
            final_report: state.final_report,
            summary_structured: state.summary,
            plan: state.plan,
            tasks: state.tasks,
            search_log: state.search_log,
            evidence_count: state.evidence.len(),
            took_seconds,
            safety: state.safety.filter(|s| s.blocked),
        }
    }
}

/// Error body: `{"detail": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}
