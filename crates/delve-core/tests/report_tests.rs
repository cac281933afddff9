use delve_core::summary::{Insight, Section, SummaryTable, SupportedPoint};
use delve_core::{render_report, EvidenceItem, StructuredSummary};
use serde_json::json;

fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn evidence(url: &str) -> EvidenceItem {
    EvidenceItem::new("general", Some(url.to_string()), "quote")
}

#[test]
fn test_empty_summary_uses_placeholders() {
    let report = render_report("  Heat pumps in cold climates ", &StructuredSummary::default(), &[]);

    assert!(report.starts_with("# Heat pumps in cold climates\n\n## Executive Summary"));
    assert!(report.contains("No executive summary available."));
    assert!(report.contains("* Evidence was insufficient to extract clear strategic insights."));
    assert!(report.ends_with("## References"));
}

#[test]
fn test_full_summary_layout() {
    let summary = StructuredSummary {
        title: "Heat Pumps".to_string(),
        main_summary: "Adoption is rising.".to_string(),
        key_insights: vec![Insight {
            insight: "Costs fell.".to_string(),
            sources: urls(&["https://a.io"]),
        }],
        sections: vec![
            Section {
                heading: "Market".to_string(),
                bullets: vec![SupportedPoint {
                    point: "Sales doubled.".to_string(),
                    sources: urls(&["https://a.io", "https://b.io"]),
                }],
            },
            Section {
                heading: "Policy".to_string(),
                bullets: Vec::new(),
            },
        ],
        tables: vec![SummaryTable {
            title: "Prices".to_string(),
            columns: urls(&["Year", "Price"]),
            rows: vec![vec![json!(2023), json!("$9k")], vec![json!(2024)]],
            sources: urls(&["https://b.io"]),
        }],
        references: urls(&["https://a.io", "https://b.io"]),
    };

    let report = render_report("heat pumps", &summary, &[]);

    let expected = "# Heat Pumps

## Executive Summary

Adoption is rising.

**Key Strategic Insights:**

* **Costs fell.** (Source: https://a.io)

## Market

* Sales doubled. (Sources: https://a.io, https://b.io)

## Policy

* (No extracted points.)

**Table: Prices** (Source: https://b.io)

| Year | Price |
| :--- | :--- |
| 2023 | $9k |
| 2024 |  |

## References

1. *Fetched web page*. https://a.io
2. *Fetched web page*. https://b.io";

    assert_eq!(report, expected);
}

#[test]
fn test_uncited_lines_have_no_trailing_space() {
    let summary = StructuredSummary {
        key_insights: vec![Insight {
            insight: "Unsourced.".to_string(),
            sources: Vec::new(),
        }],
        ..Default::default()
    };

    let report = render_report("x", &summary, &[]);
    assert!(report.contains("* **Unsourced.**\n"));
}

#[test]
fn test_references_fall_back_to_evidence() {
    let items = vec![
        evidence("https://b.io"),
        evidence("https://a.io"),
        evidence("https://b.io"),
        EvidenceItem::new("general", None, "orphan"),
    ];

    let report = render_report("x", &StructuredSummary::default(), &items);

    assert!(report.contains("1. *Fetched web page*. https://b.io\n2. *Fetched web page*. https://a.io"));
    assert!(!report.contains("3. "));
}

#[test]
fn test_caps_are_applied() {
    let summary = StructuredSummary {
        key_insights: (0..10)
            .map(|i| Insight {
                insight: format!("insight-{i}"),
                sources: Vec::new(),
            })
            .collect(),
        sections: vec![Section {
            heading: "Many".to_string(),
            bullets: (0..15)
                .map(|i| SupportedPoint {
                    point: format!("bullet-{i}"),
                    sources: Vec::new(),
                })
                .collect(),
        }],
        ..Default::default()
    };

    let report = render_report("x", &summary, &[]);

    assert!(report.contains("insight-7"));
    assert!(!report.contains("insight-8"));
    assert!(report.contains("bullet-11"));
    assert!(!report.contains("bullet-12"));
}

#[test]
fn test_blank_headings_and_empty_tables_skipped() {
    let summary = StructuredSummary {
        sections: vec![Section {
            heading: "   ".to_string(),
            bullets: Vec::new(),
        }],
        tables: vec![SummaryTable {
            title: String::new(),
            columns: urls(&["A"]),
            rows: Vec::new(),
            sources: Vec::new(),
        }],
        ..Default::default()
    };

    let report = render_report("x", &summary, &[]);

    assert!(!report.contains("(No extracted points.)"));
    assert!(!report.contains("| A |"));
}
