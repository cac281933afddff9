use std::sync::Arc;

use thiserror::Error;

use crate::config::Config;
use crate::exploration::{ExplorationError, ExplorationOrchestrator};
use crate::llm::{LLMError, Provider, LLM};
use crate::planning::Planner;
use crate::report::render_report;
use crate::safety::{blocked_report, PromptInjectionGuard, SafetyResult};
use crate::search::{ParallelClient, SearchExtract, UpstreamError};
use crate::state::RunState;
use crate::summary::Summarizer;

/// Errors that fail a research run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("prompt is required")]
    EmptyPrompt,

    #[error("LLM error: {0}")]
    LLM(#[from] LLMError),

    #[error("Search client error: {0}")]
    Search(#[from] UpstreamError),

    #[error("Exploration failed: {0}")]
    Exploration(#[from] ExplorationError),
}

/// Plan, explore, summarize, render.
///
/// All collaborators are injected; nothing is global.
pub struct ResearchPipeline {
    guard: PromptInjectionGuard,
    planner: Planner<Arc<dyn LLM>>,
    explorer: ExplorationOrchestrator,
    summarizer: Summarizer<Arc<dyn LLM>>,
}

impl ResearchPipeline {
    pub fn new(llm: Arc<dyn LLM>, search: Arc<dyn SearchExtract>, config: &Config) -> Self {
        Self {
            guard: PromptInjectionGuard::new(),
            planner: Planner::new(Arc::clone(&llm)),
            explorer: ExplorationOrchestrator::from_config(search, &config.exploration),
            summarizer: Summarizer::new(llm, config.evidence.clone()),
        }
    }

    /// Builds the configured LLM provider and search client.
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        let llm = Provider::build_from_config(&config.llm)?;
        let search: Arc<dyn SearchExtract> = Arc::new(ParallelClient::from_config(&config.search)?);
        Ok(Self::new(llm, search, config))
    }

    /// Screens the prompt, plans, and screens the plan.
    ///
    /// A blocked check is not an error: the returned state carries the
    /// safety result and the blocked report.
    pub async fn plan(&self, prompt: &str) -> Result<RunState, PipelineError> {
        let mut state = RunState::new(prompt);
        if state.prompt.is_empty() {
            return Err(PipelineError::EmptyPrompt);
        }

        let verdict = self.guard.validate_prompt(&state.prompt);
        if verdict.blocked {
            return Ok(block(state, verdict));
        }

        let plan = self.planner.plan(&state.prompt).await?;
        let verdict = self.guard.validate_plan(&plan);
        state.plan = plan.steps;
        state.tasks = plan.tasks;

        if verdict.blocked {
            return Ok(block(state, verdict));
        }

        Ok(state)
    }

    /// Runs the whole pipeline for `prompt`.
    pub async fn run(&self, prompt: &str) -> Result<RunState, PipelineError> {
        let mut state = self.plan(prompt).await?;
        if state.is_blocked() {
            return Ok(state);
        }

        tracing::info!(run_id = %state.run_id, tasks = state.tasks.len(), "research run started");

        let prompt = state.prompt.clone();
        let tasks = state.tasks.clone();
        self.explorer.run(&prompt, &tasks, &mut state).await?;

        let summary = self.summarizer.summarize(&prompt, &state.evidence).await?;
        state.final_report = render_report(&prompt, &summary, &state.evidence);
        state.summary = Some(summary);

        tracing::info!(
            run_id = %state.run_id,
            evidence = state.evidence.len(),
            failures = state.failures.len(),
            took = state.elapsed_secs(),
            "research run finished"
        );

        Ok(state)
    }
}

fn block(mut state: RunState, verdict: SafetyResult) -> RunState {
    state.final_report = blocked_report(&verdict);
    state.safety = Some(verdict);
    state
}
