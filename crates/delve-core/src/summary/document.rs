use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The summarizer's output: the structure the Markdown report is rendered from.
///
/// Every field is optional on input since it comes straight from a model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredSummary {
    /// Short report title
    pub title: String,
    /// Executive summary, a few sentences
    pub main_summary: String,
    pub key_insights: Vec<Insight>,
    pub sections: Vec<Section>,
    pub tables: Vec<SummaryTable>,
    /// Unique source URLs
    pub references: Vec<String>,
}

/// A headline finding with the URLs backing it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Insight {
    pub insight: String,
    pub sources: Vec<String>,
}

/// A titled group of bullet points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    pub heading: String,
    pub bullets: Vec<SupportedPoint>,
}

/// One bullet point with the URLs backing it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportedPoint {
    pub point: String,
    pub sources: Vec<String>,
}

/// A comparison table. Cells are kept as raw JSON values since models
/// emit numbers and nulls as often as strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryTable {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub sources: Vec<String>,
}

impl StructuredSummary {
    /// The summary used when the model's answer cannot be parsed.
    pub fn fallback(prompt: &str, references: Vec<String>) -> Self {
        Self {
            title: prompt.chars().take(80).collect(),
            main_summary: "Evidence collected, but summarization JSON parsing failed.".to_string(),
            key_insights: Vec::new(),
            sections: vec![Section {
                heading: "findings".to_string(),
                bullets: Vec::new(),
            }],
            tables: Vec::new(),
            references,
        }
    }
}
