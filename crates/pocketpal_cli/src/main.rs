//! PocketPal notebook prompt.
//!
//! # Responsibility
//! - Resolve configuration, start logging, and load the notebook.
//! - Run the read-eval-print loop until `exit`, `close` or end of input.
//! - Save the notebook when the session ends.

mod command;
mod config;
mod render;

use command::{run_line, Outcome};
use config::CliConfig;
use log::{error, info};
use pocketpal_core::{init_logging, load_notebook, save_notebook, NoteStore};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

const PROMPT: &str = "Enter a command: ";

fn main() -> ExitCode {
    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&config.log_level, &config.log_dir().to_string_lossy()) {
        eprintln!("warning: logging disabled: {err}");
    }

    let notes_path = config.notes_path();
    let mut store = match load_notebook(&notes_path) {
        Ok(store) => store,
        Err(err) => {
            error!("event=session_start module=cli status=error error={err}");
            eprintln!("error: cannot load notebook `{}`: {err}", notes_path.display());
            return ExitCode::FAILURE;
        }
    };
    info!(
        "event=session_start module=cli status=ok notes={} version={}",
        store.len(),
        pocketpal_core::core_version()
    );

    println!("Welcome to the assistant bot!");
    println!("Notebook: {}", config.data_dir().display());
    run_session(io::stdin().lock(), io::stdout().lock(), &mut store);

    match save_notebook(&notes_path, &store) {
        Ok(()) => {
            info!(
                "event=session_end module=cli status=ok notes={}",
                store.len()
            );
            println!("Data saved");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=session_end module=cli status=error error={err}");
            eprintln!("error: cannot save notebook `{}`: {err}", notes_path.display());
            ExitCode::FAILURE
        }
    }
}

/// Reads commands until an exit command or end of input.
fn run_session(input: impl BufRead, mut output: impl Write, store: &mut NoteStore) {
    let mut lines = input.lines();
    loop {
        let _ = write!(output, "{PROMPT}");
        let _ = output.flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(err)) => {
                error!("event=read_input module=cli status=error error={err}");
                break;
            }
            None => break,
        };

        match run_line(&line, store) {
            None => continue,
            Some(Ok(Outcome::Continue(message))) => {
                let _ = writeln!(output, "{message}");
            }
            Some(Ok(Outcome::Exit(message))) => {
                let _ = writeln!(output, "{message}");
                break;
            }
            Some(Err(err)) => {
                let _ = writeln!(output, "{err}");
            }
        }
    }
    let _ = writeln!(output);
}

#[cfg(test)]
mod tests {
    use super::run_session;
    use pocketpal_core::{load_notebook, save_notebook, NoteStore};

    #[test]
    fn session_runs_until_exit_and_ignores_later_lines() {
        let input = "add-note Ann buy milk\n\nedit-note note-1 and eggs\nbogus\nexit\ndelete-note note-1\n";
        let mut output = Vec::new();
        let mut store = NoteStore::new();

        run_session(input.as_bytes(), &mut output, &mut store);

        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("Note 'note-1' added."));
        assert!(printed.contains("Invalid command."));
        assert!(printed.contains("Good bye!"));
        assert_eq!(store.find("note-1").unwrap().body, "buy milk and eggs");
    }

    #[test]
    fn session_ends_at_end_of_input_and_notebook_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.sqlite3");

        let mut store = load_notebook(&path).unwrap();
        run_session(
            "add-note Ann first\nadd-tag note-1 home\n".as_bytes(),
            std::io::sink(),
            &mut store,
        );
        save_notebook(&path, &store).unwrap();

        let mut reopened = load_notebook(&path).unwrap();
        let mut output = Vec::new();
        run_session("find-by-tag home\n".as_bytes(), &mut output, &mut reopened);
        assert!(String::from_utf8(output).unwrap().contains("[note-1]"));
    }
}
