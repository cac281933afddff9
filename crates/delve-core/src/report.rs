//! Markdown rendering of a structured summary.

use std::collections::HashSet;

use serde_json::Value;

use crate::exploration::EvidenceItem;
use crate::summary::StructuredSummary;

const MAX_INSIGHTS: usize = 8;
const MAX_SECTIONS: usize = 12;
const MAX_BULLETS: usize = 12;
const MAX_TABLES: usize = 6;
const MAX_TABLE_ROWS: usize = 12;
const MAX_FALLBACK_REFERENCES: usize = 40;
const MAX_CITED_URLS: usize = 3;

/// Renders the final report.
///
/// When the summary lists no references, the unique evidence URLs are used
/// instead.
pub fn render_report(prompt: &str, summary: &StructuredSummary, evidence: &[EvidenceItem]) -> String {
    let mut md = String::new();

    let title = if summary.title.trim().is_empty() {
        prompt.trim()
    } else {
        summary.title.trim()
    };
    md.push_str(&format!("# {}\n\n", title));

    md.push_str("## Executive Summary\n\n");
    let exec_summary = summary.main_summary.trim();
    if exec_summary.is_empty() {
        md.push_str("No executive summary available.");
    } else {
        md.push_str(exec_summary);
    }
    md.push_str("\n\n");

    md.push_str("**Key Strategic Insights:**\n\n");
    if summary.key_insights.is_empty() {
        md.push_str("* Evidence was insufficient to extract clear strategic insights.\n");
    } else {
        for insight in summary.key_insights.iter().take(MAX_INSIGHTS) {
            let text = insight.insight.trim();
            if !text.is_empty() {
                push_line(&mut md, &format!("* **{}** {}", text, cite_urls(&insight.sources)));
            }
        }
    }
    md.push('\n');

    for section in summary.sections.iter().take(MAX_SECTIONS) {
        let heading = section.heading.trim();
        if heading.is_empty() {
            continue;
        }
        md.push_str(&format!("## {}\n\n", heading));
        if section.bullets.is_empty() {
            md.push_str("* (No extracted points.)\n");
        } else {
            for bullet in section.bullets.iter().take(MAX_BULLETS) {
                let point = bullet.point.trim();
                if !point.is_empty() {
                    push_line(&mut md, &format!("* {} {}", point, cite_urls(&bullet.sources)));
                }
            }
        }
        md.push('\n');
    }

    for table in summary.tables.iter().take(MAX_TABLES) {
        let title = table.title.trim();
        if !title.is_empty() {
            push_line(&mut md, &format!("**Table: {}** {}", title, cite_urls(&table.sources)));
            md.push('\n');
        }

        let width = table.columns.len();
        if width > 0 && !table.rows.is_empty() {
            md.push_str(&format!("| {} |\n", table.columns.join(" | ")));
            md.push_str(&format!("| {} |\n", vec![":---"; width].join(" | ")));
            for row in table.rows.iter().take(MAX_TABLE_ROWS) {
                let cells: Vec<String> = (0..width)
                    .map(|i| row.get(i).map(cell_text).unwrap_or_default())
                    .collect();
                md.push_str(&format!("| {} |\n", cells.join(" | ")));
            }
            md.push('\n');
        }
    }

    md.push_str("## References\n\n");
    let references = if summary.references.is_empty() {
        evidence_urls(evidence)
    } else {
        summary.references.clone()
    };
    for (i, url) in references.iter().enumerate() {
        md.push_str(&format!("{}. *Fetched web page*. {}\n", i + 1, url));
    }

    md.trim().to_string()
}

/// `(Source: u)` for one URL, `(Sources: a, b, c)` for several, nothing for none.
pub fn cite_urls(urls: &[String]) -> String {
    let urls: Vec<&str> = urls
        .iter()
        .map(String::as_str)
        .filter(|u| !u.is_empty())
        .collect();

    match urls.as_slice() {
        [] => String::new(),
        [only] => format!("(Source: {})", only),
        many => format!(
            "(Sources: {})",
            many.iter().take(MAX_CITED_URLS).copied().collect::<Vec<_>>().join(", ")
        ),
    }
}

fn push_line(md: &mut String, line: &str) {
    md.push_str(line.trim_end());
    md.push('\n');
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn evidence_urls(evidence: &[EvidenceItem]) -> Vec<String> {
    let mut seen = HashSet::new();
    evidence
        .iter()
        .filter_map(|e| e.url.as_deref())
        .filter(|url| !url.is_empty() && seen.insert(*url))
        .take(MAX_FALLBACK_REFERENCES)
        .map(str::to_string)
        .collect()
}
