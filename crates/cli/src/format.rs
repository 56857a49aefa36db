//! Output formatting: Human and JSON modes.

use medtrack::{format_result_value, format_timestamp, Error, Notice, TestDefinition, TestResult};
use serde_json::json;

use crate::state::Output;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Readable text
    Human,
    /// One JSON document per command
    Json,
}

/// Render a command's output.
pub fn format_output(output: &Output, mode: OutputMode) -> String {
    match mode {
        OutputMode::Human => format_human(output),
        OutputMode::Json => format_json(output),
    }
}

/// Render an error for stderr.
pub fn format_error(err: &Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Human => format!("(error) {}", err),
        OutputMode::Json => json!({ "error": err.to_string() }).to_string(),
    }
}

/// Render skipped-row notices, one per line.
pub fn format_notices(notices: &[Notice]) -> String {
    notices
        .iter()
        .map(|n| format!("(warning) {}", n))
        .collect::<Vec<_>>()
        .join("\n")
}

// =========================================================================
// Human
// =========================================================================

fn format_human(output: &Output) -> String {
    match output {
        Output::Definition(def) => format!("OK {}", definition_line(def)),
        Output::Definitions(defs) if defs.is_empty() => "(empty catalog)".to_string(),
        Output::Definitions(defs) => defs
            .iter()
            .enumerate()
            .map(|(i, def)| format!("{}) {}", i + 1, definition_line(def)))
            .collect::<Vec<_>>()
            .join("\n"),
        Output::Result(r) => format!("OK {}", result_line(r)),
        Output::Results(rows) if rows.is_empty() => "(no results)".to_string(),
        Output::Results(rows) => rows.iter().map(result_line).collect::<Vec<_>>().join("\n"),
        Output::Updated(outcome) => {
            let mut lines = vec![format!("(updated) {} record(s)", outcome.updated)];
            lines.extend(outcome.records.iter().map(result_line));
            if !outcome.notices.is_empty() {
                lines.push(format_notices(&outcome.notices));
            }
            lines.join("\n")
        }
        Output::Report { report, outcome } => {
            if outcome.notices.is_empty() {
                report.to_string()
            } else {
                format!("{}\n{}", format_notices(&outcome.notices), report)
            }
        }
    }
}

fn definition_line(def: &TestDefinition) -> String {
    format!(
        "{}: range {}, unit {}, turnaround {}",
        def.name, def.normal_range, def.result_unit, def.turnaround
    )
}

fn result_line(r: &TestResult) -> String {
    let results = r
        .results_date_time
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{} {} at {} = {} {} [{}] results: {}",
        r.patient_id,
        r.test_name,
        format_timestamp(&r.test_date_time),
        format_result_value(r.result_value),
        r.result_unit,
        r.status,
        results
    )
}

// =========================================================================
// JSON
// =========================================================================

fn format_json(output: &Output) -> String {
    let value = match output {
        Output::Definition(def) => json!(def),
        Output::Definitions(defs) => json!(defs),
        Output::Result(r) => json!(r),
        Output::Results(rows) => json!(rows),
        Output::Updated(outcome) => json!({
            "updated": outcome.updated,
            "records": outcome.records,
            "skipped": outcome.notices.len(),
        }),
        Output::Report { report, outcome } => json!({
            "report": report,
            "skipped": outcome.notices.len(),
        }),
    };
    value.to_string()
}
