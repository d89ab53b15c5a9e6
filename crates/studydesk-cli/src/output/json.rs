//! JSON output formatter

use anyhow::Result;
use studydesk_core::{ExtractionReport, RoutedAnswer};

pub fn format_answer(answer: &RoutedAnswer) -> Result<String> {
    Ok(serde_json::to_string_pretty(answer)? + "\n")
}

pub fn format_report(report: &ExtractionReport) -> Result<String> {
    let documents: Vec<serde_json::Value> = report
        .documents
        .iter()
        .map(|d| {
            serde_json::json!({
                "file": d.path.display().to_string(),
                "kind": d.kind,
                "chars": d.text.chars().count(),
                "text": d.text,
            })
        })
        .collect();

    let output = serde_json::json!({
        "documents": documents,
        "warnings": report.warnings,
    });
    Ok(serde_json::to_string_pretty(&output)? + "\n")
}
