//! REPL command parser
//!
//! Parses one line of user input into a [`ReplCommand`]. Free-text
//! arguments (`comment`, the value of `set`) keep their inner spacing.

use serde_json::Value;

use crate::{
    error::{Error, Result},
    mode::{AnnotationMode, BehaviorCounts, Judgment},
};

/// Rows shown by `table` when no count is given
pub const DEFAULT_TABLE_ROWS: usize = 20;

/// REPL commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    // ─────────────────────────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────────────────────────

    /// Load a JSON Lines file, replacing the dataset
    Load {
        /// Path to the file
        path: String,
    },

    /// Load the built-in example record
    Demo,

    // ─────────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────────

    /// Move the cursor to an index (clamped)
    Goto {
        /// Requested index, may be out of range
        index: i64,
    },

    /// Move to the next record
    Next,

    /// Move to the previous record
    Prev,

    /// Show the current record
    Show,

    /// Show the current record as pretty JSON
    Raw,

    // ─────────────────────────────────────────────────────────────────────────────
    // Annotation (each is one commit)
    // ─────────────────────────────────────────────────────────────────────────────

    /// Record a yes/no judgment
    Label {
        /// Normalized judgment
        judgment: Judgment,
    },

    /// Record the four behavior counts
    Counts {
        /// Parsed counts
        counts: BehaviorCounts,
    },

    /// Set an arbitrary field
    Set {
        /// Field name
        field: String,
        /// JSON literal, or a string when the text is not valid JSON
        value: Value,
    },

    /// Set the free-text comment
    Comment {
        /// Comment text, may be empty to clear it
        text: String,
    },

    // ─────────────────────────────────────────────────────────────────────────────
    // Overview and output
    // ─────────────────────────────────────────────────────────────────────────────

    /// Show annotation progress
    Progress,

    /// Show the overview table
    Table {
        /// Maximum rows to show
        rows: usize,
    },

    /// Write both output files
    Save {
        /// Output directory override
        dir: Option<String>,
    },

    /// Show session and dataset information
    Info,

    /// Show or switch the annotation mode
    Mode {
        /// Mode to switch to, `None` to show the current one
        mode: Option<AnnotationMode>,
    },

    // ─────────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────────

    /// Show command history
    History,

    /// Show help
    Help {
        /// Command to describe
        topic: Option<String>,
    },

    /// Exit the REPL
    Quit,
}

impl ReplCommand {
    /// Whether the command changes the current record
    #[must_use]
    pub fn is_commit(&self) -> bool {
        matches!(
            self,
            Self::Label { .. } | Self::Counts { .. } | Self::Set { .. } | Self::Comment { .. }
        )
    }

    /// Whether the command can change the dataset's field names
    #[must_use]
    pub fn changes_fields(&self) -> bool {
        self.is_commit()
            || matches!(
                self,
                Self::Load { .. } | Self::Demo | Self::Mode { mode: Some(_) }
            )
    }
}

/// Parser for REPL commands
pub struct CommandParser;

impl CommandParser {
    /// Parse a command string into a [`ReplCommand`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::Command`] for empty, unknown or malformed commands,
    /// and [`Error::InvalidValue`] for bad judgment or count values.
    pub fn parse(input: &str) -> Result<ReplCommand> {
        let input = input.trim();

        if input.is_empty() {
            return Err(Error::command("Empty command"));
        }

        let (head, rest) = match input.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (input, ""),
        };
        let cmd = head.to_lowercase();
        let args: Vec<&str> = rest.split_whitespace().collect();

        match cmd.as_str() {
            "load" | "open" => Self::parse_load(rest),
            "demo" => Ok(ReplCommand::Demo),

            "goto" | "go" | "g" => Self::parse_goto(&args),
            "next" | "n" => Ok(ReplCommand::Next),
            "prev" | "p" => Ok(ReplCommand::Prev),
            "show" | "s" => Ok(ReplCommand::Show),
            "raw" | "json" => Ok(ReplCommand::Raw),

            "label" => Self::parse_label(&args),
            "yes" | "no" => Ok(ReplCommand::Label {
                judgment: cmd.parse()?,
            }),
            "counts" => Ok(ReplCommand::Counts {
                counts: BehaviorCounts::parse_args(&args)?,
            }),
            "set" => Self::parse_set(rest),
            "comment" => Ok(ReplCommand::Comment {
                text: rest.to_string(),
            }),

            "progress" => Ok(ReplCommand::Progress),
            "table" => Self::parse_table(&args),
            "save" => Ok(ReplCommand::Save {
                dir: (!rest.is_empty()).then(|| rest.to_string()),
            }),
            "info" => Ok(ReplCommand::Info),
            "mode" => Ok(ReplCommand::Mode {
                mode: args.first().map(|m| m.parse()).transpose()?,
            }),

            "history" => Ok(ReplCommand::History),
            "help" | "?" => Ok(ReplCommand::Help {
                topic: args.first().map(|t| t.to_lowercase()),
            }),
            "quit" | "exit" | "q" => Ok(ReplCommand::Quit),

            _ => Err(Error::command(format!(
                "Unknown command: '{cmd}'. Type 'help' for commands"
            ))),
        }
    }

    fn parse_load(rest: &str) -> Result<ReplCommand> {
        if rest.is_empty() {
            return Err(Error::command("load requires a file path"));
        }
        Ok(ReplCommand::Load {
            path: rest.to_string(),
        })
    }

    fn parse_goto(args: &[&str]) -> Result<ReplCommand> {
        let raw = args
            .first()
            .ok_or_else(|| Error::command("goto requires an index"))?;
        let index = raw
            .parse()
            .map_err(|_| Error::command(format!("Invalid index: '{raw}'")))?;
        Ok(ReplCommand::Goto { index })
    }

    fn parse_label(args: &[&str]) -> Result<ReplCommand> {
        match args {
            [value] => Ok(ReplCommand::Label {
                judgment: value.parse()?,
            }),
            _ => Err(Error::command("label requires one value: yes or no")),
        }
    }

    fn parse_set(rest: &str) -> Result<ReplCommand> {
        let Some((field, raw)) = rest.split_once(char::is_whitespace) else {
            return Err(Error::command("set requires a field name and a value"));
        };
        let raw = raw.trim();
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        Ok(ReplCommand::Set {
            field: field.to_string(),
            value,
        })
    }

    fn parse_table(args: &[&str]) -> Result<ReplCommand> {
        let rows = match args.first() {
            None => DEFAULT_TABLE_ROWS,
            Some(raw) => raw
                .parse()
                .map_err(|_| Error::command(format!("Invalid number: '{raw}'")))?,
        };
        Ok(ReplCommand::Table { rows })
    }

    /// Get all valid command names for autocomplete
    #[must_use]
    pub fn command_names() -> Vec<&'static str> {
        vec![
            "load", "demo", "goto", "next", "prev", "show", "raw", "label", "counts", "set",
            "comment", "progress", "table", "save", "info", "mode", "history", "help", "quit",
            "exit",
        ]
    }

    /// Get argument values for a given command
    #[must_use]
    pub fn arguments(command: &str) -> Vec<&'static str> {
        match command {
            "label" => vec!["yes", "no"],
            "mode" => vec!["judgment", "behavior"],
            "help" => Self::command_names(),
            _ => vec![],
        }
    }
}
