//! clap command tree.
//!
//! The same tree parses process arguments in shell mode and each input
//! line in pipe mode.

use clap::{Arg, ArgAction, Command};

/// Build the top-level `medtrack` command.
pub fn build_cli() -> Command {
    Command::new("medtrack")
        .about("Record keeping for medical test definitions and patient results")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(false)
        .arg(
            Arg::new("catalog")
                .long("catalog")
                .value_name("PATH")
                .global(true)
                .help("Test catalog file [default: medicalTest.txt]"),
        )
        .arg(
            Arg::new("records")
                .long("records")
                .value_name("PATH")
                .global(true)
                .help("Patient results file [default: medicalRecord.txt]"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .global(true)
                .help("TOML configuration file [default: ./medtrack.toml if present]"),
        )
        .arg(
            Arg::new("read-only")
                .long("read-only")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Refuse every write"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Print output as JSON"),
        )
        .subcommand(test_command())
        .subcommand(result_command())
        .subcommand(filter_command())
}

// =========================================================================
// Test definitions
// =========================================================================

fn test_command() -> Command {
    Command::new("test")
        .about("Manage test definitions")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a test definition")
                .arg(Arg::new("name").required(true).help("Test name, e.g. HGB"))
                .arg(
                    Arg::new("range")
                        .required(true)
                        .help("Normal range, e.g. \"> 13.8, < 17.2\""),
                )
                .arg(Arg::new("unit").required(true).help("Result unit"))
                .arg(
                    Arg::new("turnaround")
                        .required(true)
                        .help("Turnaround as DD-hh-mm"),
                ),
        )
        .subcommand(Command::new("list").about("List test definitions with their index"))
        .subcommand(
            Command::new("update")
                .about("Update a test definition by index")
                .arg(Arg::new("index").required(true).help("1-based index from `test list`"))
                .arg(Arg::new("name").long("name").value_name("NAME"))
                .arg(Arg::new("range").long("range").value_name("RANGE"))
                .arg(Arg::new("unit").long("unit").value_name("UNIT"))
                .arg(Arg::new("turnaround").long("turnaround").value_name("DD-hh-mm")),
        )
}

// =========================================================================
// Results
// =========================================================================

fn result_command() -> Command {
    Command::new("result")
        .about("Manage patient results")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a patient result")
                .arg(Arg::new("patient").required(true).help("7-digit patient id"))
                .arg(Arg::new("test").required(true).help("Catalog test name"))
                .arg(
                    Arg::new("test-time")
                        .required(true)
                        .help("Test timestamp, YYYY-MM-DD hh:mm"),
                )
                .arg(Arg::new("value").required(true).help("Numeric result"))
                .arg(Arg::new("unit").required(true).help("Result unit"))
                .arg(
                    Arg::new("status")
                        .required(true)
                        .help("Pending, Completed or Reviewed"),
                )
                .arg(
                    Arg::new("results-time")
                        .long("results-time")
                        .value_name("YYYY-MM-DD hh:mm")
                        .help("Required when status is Completed"),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List patient results")
                .arg(Arg::new("patient").long("patient").value_name("ID"))
                .arg(Arg::new("test").long("test").value_name("NAME")),
        )
        .subcommand(
            Command::new("update")
                .about("Update every result of a patient and test")
                .arg(Arg::new("patient").required(true).help("7-digit patient id"))
                .arg(Arg::new("test").required(true).help("Test name to match"))
                .arg(Arg::new("test-name").long("test-name").value_name("NAME"))
                .arg(
                    Arg::new("test-time")
                        .long("test-time")
                        .value_name("YYYY-MM-DD hh:mm"),
                )
                .arg(Arg::new("value").long("value").value_name("NUMBER"))
                .arg(Arg::new("unit").long("unit").value_name("UNIT"))
                .arg(Arg::new("status").long("status").value_name("STATUS"))
                .arg(
                    Arg::new("results-time")
                        .long("results-time")
                        .value_name("YYYY-MM-DD hh:mm"),
                ),
        )
}

// =========================================================================
// Filter
// =========================================================================

fn filter_command() -> Command {
    Command::new("filter")
        .about("Filter results and print a summary report")
        .arg(Arg::new("patient").long("patient").value_name("ID"))
        .arg(Arg::new("test").long("test").value_name("NAME"))
        .arg(
            Arg::new("abnormal")
                .long("abnormal")
                .action(ArgAction::SetTrue)
                .help("Only results outside the normal range"),
        )
        .arg(
            Arg::new("from")
                .long("from")
                .value_name("YYYY-MM-DD")
                .requires("to"),
        )
        .arg(
            Arg::new("to")
                .long("to")
                .value_name("YYYY-MM-DD")
                .requires("from"),
        )
        .arg(Arg::new("status").long("status").value_name("STATUS"))
        .arg(
            Arg::new("min-turnaround")
                .long("min-turnaround")
                .value_name("MINUTES")
                .requires("max-turnaround"),
        )
        .arg(
            Arg::new("max-turnaround")
                .long("max-turnaround")
                .value_name("MINUTES")
                .requires("min-turnaround"),
        )
}
