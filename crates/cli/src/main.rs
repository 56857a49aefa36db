//! MedTrack CLI — record keeping for medical tests and patient results.
//!
//! Three modes:
//! - **Shell mode**: `medtrack [flags] COMMAND` — single command, exit
//! - **Menu mode**: `medtrack [flags]` — interactive menu (if stdin is TTY)
//! - **Pipe mode**: `echo "test list" | medtrack` — line-by-line from stdin

mod commands;
mod format;
mod parse;
mod repl;
mod state;

use std::io::IsTerminal;
use std::path::Path;
use std::process;

use medtrack::{MedTrack, OpenOptions};
use medtrack_config::DEFAULT_CONFIG_FILE;
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::{format_error, format_output, OutputMode};
use parse::matches_to_action;
use repl::LinePrompt;
use state::SessionState;

fn main() {
    init_tracing();

    let cli = build_cli();
    let matches = cli.get_matches();

    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let db = match open_database(&matches) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    let state = SessionState::new(db);

    if matches.subcommand().is_some() {
        let exit_code = run_shell_mode(&matches, &state, output_mode);
        process::exit(exit_code);
    } else if std::io::stdin().is_terminal() {
        match LinePrompt::new() {
            Ok(mut prompt) => repl::run_menu(&state, &mut prompt, output_mode),
            Err(e) => {
                eprintln!("(error) {}", e);
                process::exit(1);
            }
        }
    } else {
        let stdin = std::io::stdin();
        let exit_code = repl::run_pipe(&state, stdin.lock(), output_mode);
        process::exit(exit_code);
    }
}

/// Log to stderr, filtered by `MEDTRACK_LOG` or `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("MEDTRACK_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Flags override the config file, which overrides defaults.
fn open_database(matches: &clap::ArgMatches) -> Result<MedTrack, String> {
    let mut options = match matches.get_one::<String>("config") {
        Some(path) => OpenOptions::from_file(path)
            .map_err(|e| format!("Failed to load config {}: {}", path, e))?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => OpenOptions::from_file(
            DEFAULT_CONFIG_FILE,
        )
        .map_err(|e| format!("Failed to load config {}: {}", DEFAULT_CONFIG_FILE, e))?,
        None => OpenOptions::new(),
    };

    if let Some(path) = matches.get_one::<String>("catalog") {
        options = options.catalog_path(path);
    }
    if let Some(path) = matches.get_one::<String>("records") {
        options = options.records_path(path);
    }

    let mut builder = MedTrack::builder().options(options);
    if matches.get_flag("read-only") {
        builder = builder.read_only();
    }
    builder
        .open()
        .map_err(|e| format!("Failed to open records: {}", e))
}

fn run_shell_mode(matches: &clap::ArgMatches, state: &SessionState, mode: OutputMode) -> i32 {
    match matches_to_action(matches) {
        Ok(action) => match state.execute(action) {
            Ok(output) => {
                let formatted = format_output(&output, mode);
                if !formatted.is_empty() {
                    println!("{}", formatted);
                }
                0
            }
            Err(e) => {
                eprintln!("{}", format_error(&e, mode));
                1
            }
        },
        Err(e) => {
            eprintln!("(error) {}", e);
            1
        }
    }
}
