//! Delve: multi-stage web research.
//!
//! A prompt is turned into a plan of independent tasks, each task gathers
//! quoted evidence through a search+extract service, the evidence is
//! synthesized into a structured summary and rendered as a Markdown report.

pub mod config;
pub mod exploration;
pub mod llm;
pub mod pipeline;
pub mod planning;
pub mod report;
pub mod safety;
pub mod search;
pub mod state;
pub mod summary;

pub use config::{Config, ConfigError, FailurePolicy, LLMConfig};
pub use exploration::{
    dedup_evidence, EvidenceItem, ExplorationError, ExplorationOrchestrator, SearchLogEntry,
    TaskFailure, TaskRunner,
};
pub use llm::{ClaudeClient, LLMError, OpenAIClient, LLM};
pub use pipeline::{PipelineError, ResearchPipeline};
pub use planning::{Plan, Planner, ResearchTask, TaskTag};
pub use report::render_report;
pub use safety::{PromptInjectionGuard, SafetyResult};
pub use search::{ExtractHit, ParallelClient, SearchExtract, SearchHit, UpstreamError};
pub use state::RunState;
pub use summary::{StructuredSummary, Summarizer};
