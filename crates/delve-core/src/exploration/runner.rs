use std::sync::Arc;

use thiserror::Error;

use super::{EvidenceItem, SearchLogEntry};
use crate::config::ExplorationConfig;
use crate::planning::TaskTag;
use crate::search::{SearchExtract, UpstreamError};

/// Per-task bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskLimits {
    pub max_urls_per_task: usize,
    pub max_evidence_per_task: usize,
    pub max_search_excerpt_chars: usize,
    pub max_extract_chars: usize,
}

impl From<&ExplorationConfig> for TaskLimits {
    fn from(config: &ExplorationConfig) -> Self {
        Self {
            max_urls_per_task: config.max_urls_per_task,
            max_evidence_per_task: config.max_evidence_per_task,
            max_search_excerpt_chars: config.max_search_excerpt_chars,
            max_extract_chars: config.max_extract_chars,
        }
    }
}

impl Default for TaskLimits {
    fn default() -> Self {
        Self::from(&ExplorationConfig::default())
    }
}

/// What one task hands back to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutput {
    pub log: SearchLogEntry,
    pub evidence: Vec<EvidenceItem>,
}

/// Why a task produced no output.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("search failed: {0}")]
    Search(#[source] UpstreamError),

    /// The task got past search, so its log entry is kept.
    #[error("extract failed: {source}")]
    Extract {
        log: SearchLogEntry,
        #[source]
        source: UpstreamError,
    },

    #[error("task did not complete: {0}")]
    Crashed(String),
}

impl TaskError {
    /// The search log entry, if the task reached the search step.
    pub fn into_log(self) -> Option<SearchLogEntry> {
        match self {
            TaskError::Extract { log, .. } => Some(log),
            _ => None,
        }
    }
}

/// Runs the search-then-extract sub-pipeline for one task.
pub struct TaskRunner {
    client: Arc<dyn SearchExtract>,
    limits: TaskLimits,
}

impl TaskRunner {
    pub fn new(client: Arc<dyn SearchExtract>, limits: TaskLimits) -> Self {
        Self { client, limits }
    }

    pub fn limits(&self) -> &TaskLimits {
        &self.limits
    }

    /// Searches for pages on `objective`, then extracts quotes relevant to
    /// the overall research `prompt` from them.
    ///
    /// Always yields a log entry once search succeeds, even with no URLs. In
    /// that case extract is not called. Evidence stops at
    /// `max_evidence_per_task`; anything past the cap is dropped silently.
    pub async fn run(&self, objective: &str, tag: &TaskTag, prompt: &str) -> Result<TaskOutput, TaskError> {
        let hits = self
            .client
            .search(
                objective,
                self.limits.max_urls_per_task,
                self.limits.max_search_excerpt_chars,
            )
            .await
            .map_err(TaskError::Search)?;

        // The service may return more than max_results.
        let urls: Vec<String> = hits
            .into_iter()
            .filter_map(|hit| hit.url)
            .filter(|url| !url.is_empty())
            .take(self.limits.max_urls_per_task)
            .collect();

        tracing::debug!(agent = %tag, objective, urls = urls.len(), "search complete");

        let log = SearchLogEntry {
            agent_tag: tag.to_string(),
            objective: objective.to_string(),
            urls,
        };

        if log.urls.is_empty() {
            return Ok(TaskOutput {
                log,
                evidence: Vec::new(),
            });
        }

        let pages = match self
            .client
            .extract(&log.urls, prompt, self.limits.max_extract_chars)
            .await
        {
            Ok(pages) => pages,
            Err(source) => return Err(TaskError::Extract { log, source }),
        };

        let cap = self.limits.max_evidence_per_task;
        let mut evidence = Vec::new();

        'pages: for page in pages {
            for quote in page.excerpts {
                evidence.push(EvidenceItem {
                    agent_tag: tag.to_string(),
                    url: page.url.clone(),
                    quote,
                });
                if evidence.len() >= cap {
                    break 'pages;
                }
            }
        }

        tracing::debug!(agent = %tag, objective, evidence = evidence.len(), "extract complete");

        Ok(TaskOutput { log, evidence })
    }
}
