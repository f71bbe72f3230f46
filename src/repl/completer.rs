//! Command and field completion
//!
//! Completes command names, fixed argument values (`label yes|no`,
//! `mode judgment|behavior`) and, for `set`, the dataset's field names.

use super::{commands::CommandParser, session::AnnotationSession};

/// Completer over command names and the loaded dataset's fields
#[derive(Debug)]
pub struct CommandCompleter {
    /// Known command names
    commands: Vec<String>,
    /// Field names of the loaded dataset
    columns: Vec<String>,
}

impl CommandCompleter {
    /// Create a new completer from session state
    #[must_use]
    pub fn new(session: &AnnotationSession) -> Self {
        Self {
            commands: CommandParser::command_names()
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            columns: session.column_names(),
        }
    }

    /// Get completions for the given input
    #[must_use]
    pub fn complete(&self, input: &str) -> Vec<String> {
        let trimmed = input.trim();
        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        let ends_with_space = input.ends_with(' ') && !trimmed.is_empty();

        match parts.len() {
            0 => self.commands.clone(),
            1 if !ends_with_space => {
                let prefix = parts[0].to_lowercase();
                self.commands
                    .iter()
                    .filter(|cmd| cmd.starts_with(&prefix))
                    .cloned()
                    .collect()
            }
            _ => {
                let cmd = parts[0].to_lowercase();
                let args = &parts[1..];
                // Only the first argument is completed
                match (args.len(), ends_with_space) {
                    (0, _) => self.context_complete(&cmd, ""),
                    (1, false) => self.context_complete(&cmd, args[0]),
                    _ => vec![],
                }
            }
        }
    }

    fn context_complete(&self, cmd: &str, prefix: &str) -> Vec<String> {
        let candidates: Vec<String> = match cmd {
            "set" => self.columns.clone(),
            _ => CommandParser::arguments(cmd)
                .into_iter()
                .map(ToString::to_string)
                .collect(),
        };
        let prefix_lower = prefix.to_lowercase();
        candidates
            .into_iter()
            .filter(|c| c.to_lowercase().starts_with(&prefix_lower))
            .collect()
    }
}

#[cfg(feature = "repl")]
use reedline::{Completer, Span, Suggestion};

#[cfg(feature = "repl")]
impl Completer for CommandCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let input = line.get(..pos).unwrap_or(line);
        let completions = Self::complete(self, input);

        let word_start = input.rfind(' ').map_or(0, |i| i + 1);
        let span = Span::new(word_start, input.len());

        completions
            .into_iter()
            .map(|value| Suggestion {
                value,
                description: None,
                style: None,
                extra: None,
                span,
                append_whitespace: true,
            })
            .collect()
    }
}
