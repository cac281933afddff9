use std::collections::HashSet;

use super::EvidenceItem;

/// Drops every item whose `(url, quote)` pair was already seen.
///
/// The first occurrence wins and the relative order of kept items is
/// preserved. Keys are compared exactly: no trimming, no case folding.
pub fn dedup_evidence(evidence: Vec<EvidenceItem>) -> Vec<EvidenceItem> {
    let mut seen = HashSet::with_capacity(evidence.len());
    evidence
        .into_iter()
        .filter(|item| seen.insert((item.url.clone(), item.quote.clone())))
        .collect()
}
