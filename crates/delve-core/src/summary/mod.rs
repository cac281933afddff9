//! Synthesis of gathered evidence into a structured summary.

mod document;
pub mod prompts;
mod summarizer;

pub use document::{Insight, Section, StructuredSummary, SummaryTable, SupportedPoint};
pub use summarizer::{trim_evidence, Summarizer, TrimmedEvidence};
