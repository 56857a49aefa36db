//! Interactive menu and pipe mode.
//!
//! The menu walks the operator through one operation at a time. Every
//! error is printed and the menu comes back; nothing here exits the
//! process except the Exit entry or end of input.

use std::io::BufRead;

use medtrack::{
    keep_if_blank, DefinitionPatch, Error, FilterCriteria, NewTestDefinition, NewTestResult,
    PatientId, ResultPatch, Status, TurnaroundRange,
};
use medtrack_core::validation;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use crate::commands::build_cli;
use crate::format::{format_error, format_output, OutputMode};
use crate::parse::matches_to_action;
use crate::state::{Output, SessionState};

const MENU: &str = "\
===============================
      Medical Test System
===============================
1. Add a new medical test
2. Add a new medical test record
3. Update patient records
4. Update a medical test
5. Filter medical tests
6. Exit
===============================";

/// Source of operator answers.
pub trait Prompt {
    /// Show `prompt` and read one line; `None` at end of input.
    fn ask(&mut self, prompt: &str) -> Option<String>;

    /// Print a line to the operator.
    fn say(&mut self, text: &str);
}

/// Terminal prompt backed by rustyline.
pub struct LinePrompt {
    editor: DefaultEditor,
}

impl LinePrompt {
    pub fn new() -> Result<Self, String> {
        let editor = DefaultEditor::new().map_err(|e| format!("Failed to init editor: {}", e))?;
        Ok(Self { editor })
    }
}

impl Prompt for LinePrompt {
    fn ask(&mut self, prompt: &str) -> Option<String> {
        match self.editor.readline(prompt) {
            Ok(line) => Some(line),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => None,
            Err(e) => {
                eprintln!("(error) {}", e);
                None
            }
        }
    }

    fn say(&mut self, text: &str) {
        println!("{}", text);
    }
}

// =========================================================================
// Menu loop
// =========================================================================

/// Run the interactive menu until Exit or end of input.
pub fn run_menu<P: Prompt>(state: &SessionState, prompt: &mut P, mode: OutputMode) {
    loop {
        prompt.say(MENU);
        let choice = match prompt.ask("Please choose an option: ") {
            Some(choice) => choice,
            None => break,
        };

        let result = match choice.trim() {
            "1" => add_definition(state, prompt),
            "2" => add_result(state, prompt),
            "3" => update_results(state, prompt),
            "4" => update_definition(state, prompt),
            "5" => filter(state, prompt),
            "6" => {
                prompt.say("Exiting the program.");
                break;
            }
            _ => {
                prompt.say("Invalid option.");
                continue;
            }
        };

        match result {
            Ok(Some(output)) => prompt.say(&format_output(&output, mode)),
            Ok(None) => prompt.say("Cancelled."),
            Err(e) => prompt.say(&format_error(&e, mode)),
        }
    }
}

/// Ask until `check` accepts the answer. `None` at end of input.
fn ask_valid<P, F>(prompt: &mut P, question: &str, check: F) -> Option<String>
where
    P: Prompt,
    F: Fn(&str) -> medtrack_core::Result<()>,
{
    loop {
        let answer = prompt.ask(question)?;
        match check(&answer) {
            Ok(()) => return Some(answer),
            Err(e) => prompt.say(&format!("{}. Please try again.", e)),
        }
    }
}

/// Like [`ask_valid`], but a blank answer is accepted as "skip".
fn ask_optional<P, F>(prompt: &mut P, question: &str, check: F) -> Option<Option<String>>
where
    P: Prompt,
    F: Fn(&str) -> medtrack_core::Result<()>,
{
    let answer = ask_valid(prompt, question, |s| {
        if s.trim().is_empty() {
            Ok(())
        } else {
            check(s)
        }
    })?;
    Some(keep_if_blank(answer))
}

fn check_timestamp(now: chrono::NaiveDateTime) -> impl Fn(&str) -> medtrack_core::Result<()> {
    move |s| validation::check_past_timestamp("date", s.trim(), now).map(|_| ())
}

fn check_value(s: &str) -> medtrack_core::Result<()> {
    validation::parse_result_value(s).map(|_| ())
}

fn check_status(s: &str) -> medtrack_core::Result<()> {
    s.parse::<Status>().map(|_| ())
}

fn check_patient(s: &str) -> medtrack_core::Result<()> {
    s.trim().parse::<PatientId>().map(|_| ())
}

// =========================================================================
// Operations
// =========================================================================

type Step = Result<Option<Output>, Error>;

fn add_definition<P: Prompt>(state: &SessionState, prompt: &mut P) -> Step {
    let name = match ask_valid(prompt, "Enter Test Name: ", |s| {
        validation::check_test_name(s).map(|_| ())
    }) {
        Some(v) => v,
        None => return Ok(None),
    };
    let normal_range = match ask_valid(prompt, "Enter Normal Range (e.g. > 13.8, < 17.2): ", |s| {
        s.trim().parse::<medtrack::NormalRange>().map(|_| ())
    }) {
        Some(v) => v,
        None => return Ok(None),
    };
    let result_unit = match ask_valid(prompt, "Enter Result Unit: ", |s| {
        validation::check_required_text("result unit", s).map(|_| ())
    }) {
        Some(v) => v,
        None => return Ok(None),
    };
    let turnaround = match ask_valid(prompt, "Enter Turnaround Time (DD-hh-mm): ", |s| {
        s.trim().parse::<medtrack::Turnaround>().map(|_| ())
    }) {
        Some(v) => v,
        None => return Ok(None),
    };

    let candidate = NewTestDefinition {
        name,
        normal_range,
        result_unit,
        turnaround,
    };
    Ok(Some(Output::Definition(state.db().catalog.add(candidate)?)))
}

fn add_result<P: Prompt>(state: &SessionState, prompt: &mut P) -> Step {
    let now = state.db().now();
    let mut answers = Vec::new();
    let known_test = |s: &str| match state.db().catalog.get(s) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(medtrack_core::Error::validation(
            "test name",
            format!("'{}' is not in the test catalog", s.trim().to_uppercase()),
        )),
        Err(e) => Err(medtrack_core::Error::validation("test name", e.to_string())),
    };
    let past_time = check_timestamp(now);
    let unit = |s: &str| validation::check_delimiter_free("result unit", s).map(|_| ());
    let steps: [(&str, &dyn Fn(&str) -> medtrack_core::Result<()>); 6] = [
        ("Enter Patient ID (7 digits): ", &check_patient),
        ("Enter Test Name: ", &known_test),
        ("Enter Test Date and Time (YYYY-MM-DD hh:mm): ", &past_time),
        ("Enter Test Result: ", &check_value),
        ("Enter Result Unit: ", &unit),
        ("Enter Test Status (Pending, Completed, Reviewed): ", &check_status),
    ];
    for (question, check) in steps {
        match ask_valid(prompt, question, check) {
            Some(answer) => answers.push(answer),
            None => return Ok(None),
        }
    }

    let status = answers[5].clone();
    let results_date_time = if status.parse::<Status>().ok() == Some(Status::Completed) {
        match ask_valid(
            prompt,
            "Enter Results Date and Time (YYYY-MM-DD hh:mm): ",
            check_timestamp(now),
        ) {
            Some(v) => Some(v),
            None => return Ok(None),
        }
    } else {
        None
    };

    let mut answers = answers.into_iter();
    let mut next = || answers.next().unwrap_or_default();
    let candidate = NewTestResult {
        patient_id: next(),
        test_name: next(),
        test_date_time: next(),
        result_value: next(),
        result_unit: next(),
        status: next(),
        results_date_time,
    };
    Ok(Some(Output::Result(state.db().results.add(candidate)?)))
}

fn update_results<P: Prompt>(state: &SessionState, prompt: &mut P) -> Step {
    let patient_id = match ask_valid(prompt, "Enter Patient ID (7 digits) to update: ", check_patient)
    {
        Some(v) => v,
        None => return Ok(None),
    };
    let test_name = match prompt.ask("Enter Test Name to update: ") {
        Some(v) => v,
        None => return Ok(None),
    };
    let now = state.db().now();

    let outcome = state
        .db()
        .results
        .update_with(&patient_id, &test_name, |current| {
            prompt.say(&format!(
                "Updating record for Patient ID: {}, Test Name: {} ({})",
                current.patient_id,
                current.test_name,
                medtrack::format_timestamp(&current.test_date_time)
            ));
            let cancelled = || medtrack_core::Error::validation("input", "cancelled");

            let test_name = prompt
                .ask(&format!(
                    "Enter new Test Name (current: {}) or press Enter to keep: ",
                    current.test_name
                ))
                .ok_or_else(cancelled)?;
            let test_date_time = ask_optional(
                prompt,
                &format!(
                    "Enter new Test Date and Time (current: {}) or press Enter to keep: ",
                    medtrack::format_timestamp(&current.test_date_time)
                ),
                check_timestamp(now),
            )
            .ok_or_else(cancelled)?;
            let result_value = ask_optional(
                prompt,
                &format!(
                    "Enter new Test Result (current: {}) or press Enter to keep: ",
                    medtrack::format_result_value(current.result_value)
                ),
                check_value,
            )
            .ok_or_else(cancelled)?;
            let result_unit = prompt
                .ask(&format!(
                    "Enter new Result Unit (current: {}) or press Enter to keep: ",
                    current.result_unit
                ))
                .ok_or_else(cancelled)?;
            let status = ask_optional(
                prompt,
                &format!(
                    "Enter new Test Status (current: {}) or press Enter to keep: ",
                    current.status
                ),
                check_status,
            )
            .ok_or_else(cancelled)?;

            let final_status = match &status {
                Some(s) => s.parse::<Status>()?,
                None => current.status,
            };
            let results_date_time = if final_status == Status::Completed {
                let shown = current
                    .results_date_time
                    .as_ref()
                    .map(medtrack::format_timestamp)
                    .unwrap_or_default();
                ask_optional(
                    prompt,
                    &format!(
                        "Enter new Results Date and Time (current: {}) or press Enter to keep: ",
                        shown
                    ),
                    check_timestamp(now),
                )
                .ok_or_else(cancelled)?
            } else {
                None
            };

            Ok(ResultPatch {
                test_name: keep_if_blank(test_name),
                test_date_time,
                result_value,
                result_unit: keep_if_blank(result_unit),
                status,
                results_date_time,
            })
        })?;
    Ok(Some(Output::Updated(outcome)))
}

fn update_definition<P: Prompt>(state: &SessionState, prompt: &mut P) -> Step {
    let defs = state.db().catalog.list()?;
    if defs.is_empty() {
        prompt.say("No medical tests found.");
        return Ok(None);
    }
    prompt.say(&format_output(
        &Output::Definitions(defs.clone()),
        OutputMode::Human,
    ));

    let count = defs.len();
    let index = match ask_valid(
        prompt,
        "Enter the number of the test to update: ",
        |s| match s.trim().parse::<usize>() {
            Ok(i) if (1..=count).contains(&i) => Ok(()),
            _ => Err(medtrack_core::Error::validation(
                "index",
                format!("choose a number from 1 to {}", count),
            )),
        },
    ) {
        Some(v) => v.trim().parse::<usize>().unwrap_or_default(),
        None => return Ok(None),
    };

    let current = &defs[index - 1];
    let question = |label: &str, value: String| {
        format!(
            "Enter new {} (current: {}) or press Enter to keep: ",
            label, value
        )
    };
    let name = match ask_optional(prompt, &question("Test Name", current.name.clone()), |s| {
        validation::check_test_name(s).map(|_| ())
    }) {
        Some(v) => v,
        None => return Ok(None),
    };
    let normal_range = match ask_optional(
        prompt,
        &question("Normal Range", current.normal_range.clone()),
        |s| s.trim().parse::<medtrack::NormalRange>().map(|_| ()),
    ) {
        Some(v) => v,
        None => return Ok(None),
    };
    let result_unit = match ask_optional(
        prompt,
        &question("Result Unit", current.result_unit.clone()),
        |s| validation::check_required_text("result unit", s).map(|_| ()),
    ) {
        Some(v) => v,
        None => return Ok(None),
    };
    let turnaround = match ask_optional(
        prompt,
        &question("Turnaround Time (DD-hh-mm)", current.turnaround.to_string()),
        |s| s.trim().parse::<medtrack::Turnaround>().map(|_| ()),
    ) {
        Some(v) => v,
        None => return Ok(None),
    };

    let patch = DefinitionPatch {
        name,
        normal_range,
        result_unit,
        turnaround,
    };
    if patch.is_empty() {
        prompt.say("No changes entered.");
    }
    Ok(Some(Output::Definition(
        state.db().catalog.update(index, patch)?,
    )))
}

fn filter<P: Prompt>(state: &SessionState, prompt: &mut P) -> Step {
    let mut criteria = FilterCriteria::new();

    let patient = match ask_optional(
        prompt,
        "Enter Patient ID to filter by or press Enter to skip: ",
        check_patient,
    ) {
        Some(v) => v,
        None => return Ok(None),
    };
    if let Some(id) = patient {
        criteria = criteria.patient_id(id.trim().parse::<PatientId>()?);
    }

    match prompt.ask("Enter Test Name to filter by or press Enter to skip: ") {
        Some(name) => {
            if let Some(name) = keep_if_blank(name) {
                criteria = criteria.test_name(name);
            }
        }
        None => return Ok(None),
    }

    let abnormal = match ask_valid(prompt, "Filter by abnormal tests? (y/n): ", |s| {
        match s.trim().to_lowercase().as_str() {
            "y" | "n" | "" => Ok(()),
            _ => Err(medtrack_core::Error::validation("choice", "enter 'y' or 'n'")),
        }
    }) {
        Some(v) => v,
        None => return Ok(None),
    };
    criteria = criteria.abnormal(abnormal.trim().eq_ignore_ascii_case("y"));

    loop {
        let start = match prompt.ask("Enter start date (YYYY-MM-DD) or press Enter to skip: ") {
            Some(v) => v,
            None => return Ok(None),
        };
        let end = match prompt.ask("Enter end date (YYYY-MM-DD) or press Enter to skip: ") {
            Some(v) => v,
            None => return Ok(None),
        };
        if start.trim().is_empty() || end.trim().is_empty() {
            break;
        }
        match state.db().reports.date_range(&start, &end) {
            Ok(range) => {
                criteria = criteria.date_range(range);
                break;
            }
            Err(e) => prompt.say(&format!("{}. Please try again.", e)),
        }
    }

    let status = match ask_optional(
        prompt,
        "Enter Test Status (Pending, Completed, Reviewed) or press Enter to skip: ",
        check_status,
    ) {
        Some(v) => v,
        None => return Ok(None),
    };
    if let Some(status) = status {
        criteria = criteria.status(status.parse::<Status>()?);
    }

    loop {
        let min = match prompt.ask("Enter minimum turnaround (minutes) or press Enter to skip: ") {
            Some(v) => v,
            None => return Ok(None),
        };
        let max = match prompt.ask("Enter maximum turnaround (minutes) or press Enter to skip: ") {
            Some(v) => v,
            None => return Ok(None),
        };
        if min.trim().is_empty() || max.trim().is_empty() {
            break;
        }
        match TurnaroundRange::parse(&min, &max) {
            Ok(range) => {
                criteria = criteria.turnaround_range(range);
                break;
            }
            Err(e) => prompt.say(&format!("{}. Please try again.", e)),
        }
    }

    if criteria.is_empty() {
        prompt.say("No filters selected; reporting every record.");
    }
    state.report(&criteria).map(Some)
}

// =========================================================================
// Pipe mode
// =========================================================================

/// Execute one command per input line. Returns the process exit code.
pub fn run_pipe<R: BufRead>(state: &SessionState, input: R, mode: OutputMode) -> i32 {
    let mut exit_code = 0;
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("(error) {}", e);
                return 1;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match run_line(state, trimmed) {
            Ok(output) => println!("{}", format_output(&output, mode)),
            Err(msg) => {
                eprintln!("{}", msg_for(msg, mode));
                exit_code = 1;
            }
        }
    }
    exit_code
}

enum LineError {
    Usage(String),
    Failed(Error),
}

fn msg_for(err: LineError, mode: OutputMode) -> String {
    match err {
        LineError::Usage(msg) => format!("(error) {}", msg),
        LineError::Failed(e) => format_error(&e, mode),
    }
}

fn run_line(state: &SessionState, line: &str) -> Result<Output, LineError> {
    debug!(line, "Executing piped command");
    let words = shlex::split(line)
        .ok_or_else(|| LineError::Usage(format!("unbalanced quotes: {}", line)))?;
    let argv = std::iter::once("medtrack".to_string()).chain(words);
    let matches = build_cli()
        .try_get_matches_from(argv)
        .map_err(|e| LineError::Usage(e.to_string().trim_end().to_string()))?;
    let action = matches_to_action(&matches).map_err(LineError::Usage)?;
    state.execute(action).map_err(LineError::Failed)
}
