use std::collections::HashSet;

use serde::Serialize;

use super::document::StructuredSummary;
use super::prompts::{build_summarizer_prompt, SUMMARIZER_SYSTEM_PROMPT};
use crate::config::EvidenceConfig;
use crate::exploration::EvidenceItem;
use crate::llm::{extract_json, LLMError, LLM};

/// Fallback summaries list at most this many references.
const FALLBACK_REFERENCE_LIMIT: usize = 30;

/// An evidence item as it is shown to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrimmedEvidence {
    pub agent: String,
    pub url: Option<String>,
    pub quote: String,
}

/// Selects the evidence that fits the summarizer's budget.
///
/// Takes at most `max_items` items in order and stops before the item whose
/// serialized form would push the running total past `max_chars`.
pub fn trim_evidence(evidence: &[EvidenceItem], budget: &EvidenceConfig) -> Vec<TrimmedEvidence> {
    let mut trimmed = Vec::new();
    let mut total = 0;

    for item in evidence.iter().take(budget.max_items) {
        let entry = TrimmedEvidence {
            agent: item.agent_tag.clone(),
            url: item.url.clone(),
            quote: item.quote.trim().to_string(),
        };
        let size = serde_json::to_string(&entry)
            .map(|s| s.chars().count())
            .unwrap_or(0);
        if total + size > budget.max_chars {
            break;
        }
        total += size;
        trimmed.push(entry);
    }

    trimmed
}

/// Turns evidence into a [`StructuredSummary`] with a single model call.
pub struct Summarizer<L: LLM> {
    llm: L,
    budget: EvidenceConfig,
}

impl<L: LLM> Summarizer<L> {
    pub fn new(llm: L, budget: EvidenceConfig) -> Self {
        Self { llm, budget }
    }

    /// Summarizes `evidence` for `prompt`.
    ///
    /// Transport failures propagate; an answer that is not the expected JSON
    /// degrades to [`StructuredSummary::fallback`].
    pub async fn summarize(
        &self,
        prompt: &str,
        evidence: &[EvidenceItem],
    ) -> Result<StructuredSummary, LLMError> {
        let trimmed = trim_evidence(evidence, &self.budget);
        tracing::info!(
            evidence = evidence.len(),
            forwarded = trimmed.len(),
            "summarizing evidence"
        );

        let evidence_json =
            serde_json::to_string_pretty(&trimmed).map_err(|e| LLMError::ParseError(e.to_string()))?;

        let response = self
            .llm
            .complete_with_system(
                SUMMARIZER_SYSTEM_PROMPT,
                &build_summarizer_prompt(prompt, &evidence_json),
            )
            .await?;

        match serde_json::from_str::<StructuredSummary>(extract_json(&response)) {
            Ok(summary) => Ok(summary),
            Err(e) => {
                tracing::warn!(error = %e, "summary response was not valid JSON, using fallback");
                Ok(StructuredSummary::fallback(prompt, unique_urls(&trimmed)))
            }
        }
    }
}

fn unique_urls(evidence: &[TrimmedEvidence]) -> Vec<String> {
    let mut seen = HashSet::new();
    evidence
        .iter()
        .filter_map(|e| e.url.as_deref())
        .filter(|url| !url.is_empty() && seen.insert(*url))
        .take(FALLBACK_REFERENCE_LIMIT)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(url: &str, quote: &str) -> EvidenceItem {
        EvidenceItem::new("research", Some(url.to_string()), quote)
    }

    #[test]
    fn test_trim_respects_item_limit() {
        let evidence: Vec<_> = (0..10).map(|i| item("u", &format!("q{i}"))).collect();
        let budget = EvidenceConfig {
            max_items: 4,
            max_chars: 100_000,
        };
        assert_eq!(trim_evidence(&evidence, &budget).len(), 4);
    }

    #[test]
    fn test_trim_respects_char_budget() {
        let evidence = vec![item("u", &"a".repeat(50)), item("u", &"b".repeat(50))];
        let one = serde_json::to_string(&TrimmedEvidence {
            agent: "research".to_string(),
            url: Some("u".to_string()),
            quote: "a".repeat(50),
        })
        .unwrap()
        .len();
        let budget = EvidenceConfig {
            max_items: 80,
            max_chars: one + 10,
        };
        let trimmed = trim_evidence(&evidence, &budget);
        assert_eq!(trimmed.len(), 1);
        assert!(trimmed[0].quote.starts_with('a'));
    }

    #[test]
    fn test_trim_strips_quote_whitespace() {
        let trimmed = trim_evidence(&[item("u", "  padded \n")], &EvidenceConfig::default());
        assert_eq!(trimmed[0].quote, "padded");
    }

    #[test]
    fn test_unique_urls_first_seen_order() {
        let trimmed = trim_evidence(
            &[item("b", "1"), item("a", "2"), item("b", "3")],
            &EvidenceConfig::default(),
        );
        assert_eq!(unique_urls(&trimmed), vec!["b", "a"]);
    }
}
