use std::sync::Arc;

use futures::future::join_all;
use thiserror::Error;
use tokio::sync::Semaphore;

use super::runner::{TaskError, TaskOutput, TaskRunner};
use super::{dedup_evidence, TaskFailure};
use crate::config::{ExplorationConfig, FailurePolicy};
use crate::planning::{ResearchTask, TaskTag};
use crate::search::SearchExtract;
use crate::state::RunState;

/// Errors that end the exploration phase.
#[derive(Debug, Error)]
pub enum ExplorationError {
    /// A task failed under [`FailurePolicy::Abort`]; nothing was merged.
    #[error("task '{objective}' ({agent}) failed: {source}")]
    BatchAbort {
        agent: String,
        objective: String,
        #[source]
        source: TaskError,
    },
}

/// Runs every task of a plan concurrently and merges the results.
pub struct ExplorationOrchestrator {
    runner: Arc<TaskRunner>,
    max_concurrent: usize,
    policy: FailurePolicy,
}

impl ExplorationOrchestrator {
    pub fn new(runner: TaskRunner) -> Self {
        Self {
            runner: Arc::new(runner),
            max_concurrent: 0,
            policy: FailurePolicy::default(),
        }
    }

    /// Builds the runner and bounds from `[exploration]` configuration.
    pub fn from_config(client: Arc<dyn SearchExtract>, config: &ExplorationConfig) -> Self {
        Self::new(TaskRunner::new(client, config.into()))
            .with_max_concurrent(config.max_concurrent_tasks)
            .with_failure_policy(config.failure_policy)
    }

    /// Caps the number of tasks in flight. Zero means no cap.
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Gathers evidence for `tasks` into `state`.
    ///
    /// Tasks with a blank objective are skipped without a log entry. Every
    /// other task is spawned before any is awaited. Results are merged in
    /// launch order regardless of completion order, then the combined
    /// evidence is deduplicated once.
    ///
    /// Under [`FailurePolicy::Isolate`] a failing task is recorded in
    /// `state.failures` and the run continues. Under
    /// [`FailurePolicy::Abort`] the first failure in launch order is
    /// returned and `state` is left as it was.
    pub async fn run(
        &self,
        prompt: &str,
        tasks: &[ResearchTask],
        state: &mut RunState,
    ) -> Result<(), ExplorationError> {
        let jobs: Vec<(String, TaskTag)> = tasks
            .iter()
            .filter_map(|task| {
                task.trimmed_objective()
                    .map(|objective| (objective.to_string(), task.tag_or_default()))
            })
            .collect();

        tracing::info!(
            tasks = jobs.len(),
            skipped = tasks.len() - jobs.len(),
            "exploration started"
        );

        let limiter = (self.max_concurrent > 0).then(|| Arc::new(Semaphore::new(self.max_concurrent)));
        let prompt: Arc<str> = Arc::from(prompt);

        let handles: Vec<_> = jobs
            .iter()
            .map(|(objective, tag)| {
                let runner = Arc::clone(&self.runner);
                let limiter = limiter.clone();
                let prompt = Arc::clone(&prompt);
                let objective = objective.clone();
                let tag = tag.clone();

                tokio::spawn(async move {
                    let _permit = match limiter {
                        Some(limiter) => limiter.acquire_owned().await.ok(),
                        None => None,
                    };
                    runner.run(&objective, &tag, &prompt).await
                })
            })
            .collect();

        // join_all yields in input order, not completion order.
        let mut outcomes: Vec<((String, TaskTag), Result<TaskOutput, TaskError>)> = jobs
            .into_iter()
            .zip(join_all(handles).await)
            .map(|(job, joined)| {
                let result = joined.unwrap_or_else(|e| Err(TaskError::Crashed(e.to_string())));
                (job, result)
            })
            .collect();

        if self.policy == FailurePolicy::Abort {
            if let Some(index) = outcomes.iter().position(|(_, result)| result.is_err()) {
                let ((objective, tag), result) = outcomes.swap_remove(index);
                if let Err(source) = result {
                    tracing::error!(agent = %tag, %objective, error = %source, "exploration aborted");
                    return Err(ExplorationError::BatchAbort {
                        agent: tag.to_string(),
                        objective,
                        source,
                    });
                }
            }
        }

        let mut failed = 0;
        for ((objective, tag), result) in outcomes {
            match result {
                Ok(output) => {
                    state.search_log.push(output.log);
                    if !output.evidence.is_empty() {
                        state.evidence.extend(output.evidence);
                    }
                }
                Err(error) => {
                    failed += 1;
                    tracing::warn!(agent = %tag, %objective, %error, "task failed, continuing without it");
                    state.failures.push(TaskFailure {
                        agent_tag: tag.to_string(),
                        objective,
                        error: error.to_string(),
                    });
                    if let Some(log) = error.into_log() {
                        state.search_log.push(log);
                    }
                }
            }
        }

        let merged = state.evidence.len();
        state.evidence = dedup_evidence(std::mem::take(&mut state.evidence));

        tracing::info!(
            evidence = state.evidence.len(),
            duplicates = merged - state.evidence.len(),
            failed,
            "exploration finished"
        );

        Ok(())
    }
}
