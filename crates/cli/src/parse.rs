//! ArgMatches → Action conversion.
//!
//! Translates clap's parsed arguments into a typed request. Field contents
//! are passed through as text; the library validates them.

use clap::ArgMatches;
use medtrack::{DefinitionPatch, NewTestDefinition, NewTestResult, ResultPatch};

/// A parsed command, ready to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// `test add`
    AddDefinition(NewTestDefinition),
    /// `test list`
    ListDefinitions,
    /// `test update`
    UpdateDefinition { index: usize, patch: DefinitionPatch },
    /// `result add`
    AddResult(NewTestResult),
    /// `result list`
    ListResults {
        patient_id: Option<String>,
        test_name: Option<String>,
    },
    /// `result update`
    UpdateResults {
        patient_id: String,
        test_name: String,
        patch: ResultPatch,
    },
    /// `filter`
    Filter(FilterArgs),
}

/// Raw filter arguments; each bound pair is present or absent together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterArgs {
    pub patient_id: Option<String>,
    pub test_name: Option<String>,
    pub abnormal: bool,
    pub dates: Option<(String, String)>,
    pub status: Option<String>,
    pub turnaround: Option<(String, String)>,
}

/// Convert clap ArgMatches into an Action.
pub fn matches_to_action(matches: &ArgMatches) -> Result<Action, String> {
    let (sub_name, sub_matches) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;

    match sub_name {
        "test" => parse_test(sub_matches),
        "result" => parse_result(sub_matches),
        "filter" => Ok(Action::Filter(parse_filter(sub_matches))),
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn required(m: &ArgMatches, id: &str) -> Result<String, String> {
    m.get_one::<String>(id)
        .cloned()
        .ok_or_else(|| format!("Missing argument: {}", id))
}

fn optional(m: &ArgMatches, id: &str) -> Option<String> {
    m.get_one::<String>(id).cloned()
}

fn pair(m: &ArgMatches, low: &str, high: &str) -> Option<(String, String)> {
    Some((optional(m, low)?, optional(m, high)?))
}

// =========================================================================
// Test definitions
// =========================================================================

fn parse_test(matches: &ArgMatches) -> Result<Action, String> {
    let (sub, m) = matches.subcommand().ok_or("No test subcommand")?;
    match sub {
        "add" => Ok(Action::AddDefinition(NewTestDefinition {
            name: required(m, "name")?,
            normal_range: required(m, "range")?,
            result_unit: required(m, "unit")?,
            turnaround: required(m, "turnaround")?,
        })),
        "list" => Ok(Action::ListDefinitions),
        "update" => {
            let index = required(m, "index")?
                .trim()
                .parse::<usize>()
                .map_err(|e| format!("Invalid index: {}", e))?;
            let patch = DefinitionPatch::from_inputs(
                optional(m, "name").unwrap_or_default(),
                optional(m, "range").unwrap_or_default(),
                optional(m, "unit").unwrap_or_default(),
                optional(m, "turnaround").unwrap_or_default(),
            );
            Ok(Action::UpdateDefinition { index, patch })
        }
        other => Err(format!("Unknown test subcommand: {}", other)),
    }
}

// =========================================================================
// Results
// =========================================================================

fn parse_result(matches: &ArgMatches) -> Result<Action, String> {
    let (sub, m) = matches.subcommand().ok_or("No result subcommand")?;
    match sub {
        "add" => Ok(Action::AddResult(NewTestResult {
            patient_id: required(m, "patient")?,
            test_name: required(m, "test")?,
            test_date_time: required(m, "test-time")?,
            result_value: required(m, "value")?,
            result_unit: required(m, "unit")?,
            status: required(m, "status")?,
            results_date_time: optional(m, "results-time"),
        })),
        "list" => Ok(Action::ListResults {
            patient_id: optional(m, "patient"),
            test_name: optional(m, "test"),
        }),
        "update" => Ok(Action::UpdateResults {
            patient_id: required(m, "patient")?,
            test_name: required(m, "test")?,
            patch: ResultPatch {
                test_name: optional(m, "test-name"),
                test_date_time: optional(m, "test-time"),
                result_value: optional(m, "value"),
                result_unit: optional(m, "unit"),
                status: optional(m, "status"),
                results_date_time: optional(m, "results-time"),
            },
        }),
        other => Err(format!("Unknown result subcommand: {}", other)),
    }
}

// =========================================================================
// Filter
// =========================================================================

fn parse_filter(m: &ArgMatches) -> FilterArgs {
    FilterArgs {
        patient_id: optional(m, "patient"),
        test_name: optional(m, "test"),
        abnormal: m.get_flag("abnormal"),
        dates: pair(m, "from", "to"),
        status: optional(m, "status"),
        turnaround: pair(m, "min-turnaround", "max-turnaround"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::build_cli;

    fn action(args: &[&str]) -> Action {
        let argv = std::iter::once("medtrack").chain(args.iter().copied());
        let matches = build_cli().try_get_matches_from(argv).unwrap();
        matches_to_action(&matches).unwrap()
    }

    #[test]
    fn test_parse_test_add() {
        let a = action(&["test", "add", "hgb", "> 13.8, < 17.2", "g/dL", "00-04-00"]);
        assert_eq!(
            a,
            Action::AddDefinition(NewTestDefinition {
                name: "hgb".into(),
                normal_range: "> 13.8, < 17.2".into(),
                result_unit: "g/dL".into(),
                turnaround: "00-04-00".into(),
            })
        );
    }

    #[test]
    fn test_parse_test_update_only_unit() {
        match action(&["test", "update", "2", "--unit", "mmol/L"]) {
            Action::UpdateDefinition { index, patch } => {
                assert_eq!(index, 2);
                assert_eq!(patch, DefinitionPatch::from_inputs("", "", "mmol/L", ""));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_test_update_bad_index() {
        let matches = build_cli()
            .try_get_matches_from(["medtrack", "test", "update", "two"])
            .unwrap();
        assert!(matches_to_action(&matches).is_err());
    }

    #[test]
    fn test_parse_result_add_completed() {
        let a = action(&[
            "result",
            "add",
            "1234567",
            "LDL",
            "2024-05-01 08:00",
            "90",
            "mg/dL",
            "completed",
            "--results-time",
            "2024-05-01 09:00",
        ]);
        match a {
            Action::AddResult(r) => {
                assert_eq!(r.patient_id, "1234567");
                assert_eq!(r.results_date_time.as_deref(), Some("2024-05-01 09:00"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_result_update_patch() {
        match action(&["result", "update", "1234567", "hgb", "--status", "Reviewed"]) {
            Action::UpdateResults { patch, .. } => {
                assert_eq!(patch.status.as_deref(), Some("Reviewed"));
                assert!(patch.result_value.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_filter() {
        let a = action(&[
            "filter",
            "--abnormal",
            "--from",
            "2024-01-01",
            "--to",
            "2024-02-01",
            "--min-turnaround",
            "0",
            "--max-turnaround",
            "60",
        ]);
        assert_eq!(
            a,
            Action::Filter(FilterArgs {
                abnormal: true,
                dates: Some(("2024-01-01".into(), "2024-02-01".into())),
                turnaround: Some(("0".into(), "60".into())),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_no_subcommand_is_error() {
        let matches = build_cli().try_get_matches_from(["medtrack"]).unwrap();
        assert!(matches_to_action(&matches).is_err());
    }
}
