//! Interactive annotation REPL
//!
//! The presentation boundary of the crate: reads commands, drives an
//! [`AnnotationSession`] and prints what it returns.
//!
//! - Interactive terminals get a `reedline` editor with command completion,
//!   persistent history and a progress-aware prompt.
//! - Piped stdin falls back to a plain line loop, which is what the
//!   integration tests drive.

mod commands;
mod completer;
mod prompt;
mod session;

use std::io::{IsTerminal, Write};

pub use commands::{CommandParser, ReplCommand, DEFAULT_TABLE_ROWS};
pub use completer::CommandCompleter;
pub use prompt::{ProgressStatus, SessionPrompt};
use reedline::{Reedline, Signal};
pub use session::AnnotationSession;

use crate::{Error, Result};

/// Outcome of handling one input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    /// Field names may have changed
    Refresh,
    Quit,
}

/// Run the REPL over `session`
///
/// # Errors
///
/// Returns an error if the line editor cannot be initialized.
pub fn run(session: AnnotationSession) -> Result<()> {
    if std::io::stdin().is_terminal() {
        run_interactive(session)
    } else {
        run_non_interactive(session)
    }
}

fn print_banner() {
    println!(
        "annotator {} - Reasoning Trace Annotation",
        env!("CARGO_PKG_VERSION")
    );
    println!("Type 'help' for commands, 'quit' to exit\n");
}

/// Parse and execute one line, printing output to stdout and errors to stderr
fn handle_line(session: &mut AnnotationSession, line: &str) -> Flow {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Flow::Continue;
    }

    session.add_history(trimmed);

    match CommandParser::parse(trimmed) {
        Ok(ReplCommand::Quit) => Flow::Quit,
        Ok(cmd) => {
            let refresh = cmd.changes_fields();
            match session.execute(cmd) {
                Ok(output) => {
                    print!("{output}");
                    let _ = std::io::stdout().flush();
                    if refresh {
                        Flow::Refresh
                    } else {
                        Flow::Continue
                    }
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    Flow::Continue
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            Flow::Continue
        }
    }
}

/// Run REPL in interactive mode with reedline
fn run_interactive(mut session: AnnotationSession) -> Result<()> {
    let mut line_editor = create_editor(&session)?;

    print_banner();

    loop {
        let prompt = SessionPrompt::new(&session);
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => match handle_line(&mut session, &line) {
                Flow::Quit => {
                    println!("Goodbye!");
                    break;
                }
                Flow::Refresh => {
                    line_editor =
                        line_editor.with_completer(Box::new(CommandCompleter::new(&session)));
                }
                Flow::Continue => {}
            },
            Ok(Signal::CtrlC) => {
                println!("^C");
            }
            Ok(Signal::CtrlD) => {
                println!("\nGoodbye!");
                break;
            }
            Err(e) => {
                return Err(Error::io_no_path(e));
            }
        }
    }

    Ok(())
}

/// Run REPL in non-interactive mode (piped input)
#[allow(clippy::unnecessary_wraps)] // Consistent API with run_interactive()
fn run_non_interactive(mut session: AnnotationSession) -> Result<()> {
    use std::io::BufRead;

    print_banner();

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        if handle_line(&mut session, &line) == Flow::Quit {
            break;
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn create_editor(session: &AnnotationSession) -> Result<Reedline> {
    use reedline::FileBackedHistory;

    let history_path = dirs_home().join(".annotator_history");
    let history = FileBackedHistory::with_file(1000, history_path)
        .map_err(|e| Error::io_no_path(std::io::Error::other(e.to_string())))?;

    let completer = Box::new(CommandCompleter::new(session));

    let editor = Reedline::create()
        .with_history(Box::new(history))
        .with_completer(completer);

    Ok(editor)
}

fn dirs_home() -> std::path::PathBuf {
    std::env::var("HOME")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
}
