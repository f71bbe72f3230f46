//! REPL session state
//!
//! One annotator, one dataset. The session owns the [`DatasetStore`] and
//! turns each [`ReplCommand`] into store operations plus the text to show.

use std::{fmt::Write, path::PathBuf};

use super::commands::ReplCommand;
use crate::{
    config::SessionConfig,
    dataset::DatasetStore,
    error::{Error, Result},
    mode::{AnnotationMode, COMMENT_FIELD},
    projector::RecordProjector,
    record::Record,
    tui::{render_raw, OverviewTable, RecordView},
};

/// Stateful annotation session
#[derive(Debug)]
pub struct AnnotationSession {
    store: DatasetStore,
    projector: RecordProjector,
    /// Command history
    history: Vec<String>,
    /// Session configuration
    pub config: SessionConfig,
}

impl Default for AnnotationSession {
    fn default() -> Self {
        let config = SessionConfig::default();
        Self {
            store: DatasetStore::new(config.mode),
            projector: config.projector(),
            history: Vec::new(),
            config,
        }
    }
}

impl AnnotationSession {
    /// Create an empty session
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` does not validate.
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store: DatasetStore::new(config.mode),
            projector: config.projector(),
            history: Vec::new(),
            config,
        })
    }

    /// The dataset under annotation
    #[must_use]
    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    /// Add a command to history
    pub fn add_history(&mut self, command: &str) {
        self.history.push(command.to_string());
    }

    /// Get command history
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Field names of the loaded dataset, for completion
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.store.columns().to_vec()
    }

    /// Short label for the prompt: source name or `no data`
    #[must_use]
    pub fn source_label(&self) -> &str {
        match self.store.source_name() {
            Some(name) => name,
            None if self.store.is_empty() => "no data",
            None => "data",
        }
    }

    /// Load a file, returning the message to show
    ///
    /// # Errors
    ///
    /// Returns the load error; the previous dataset is kept.
    pub fn load_path(&mut self, path: &str) -> Result<String> {
        let count = self.store.load_file(path)?;
        let mut out = format!("Loaded {count} records from '{path}'\n");
        out.push_str(&self.render_current_or_empty());
        Ok(out)
    }

    /// Execute a REPL command, returning the text to display
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be carried out. The session is
    /// unchanged in that case. A commit whose autosave fails still succeeds
    /// and reports the failed write in its output.
    pub fn execute(&mut self, cmd: ReplCommand) -> Result<String> {
        match cmd {
            ReplCommand::Load { path } => self.load_path(&path),
            ReplCommand::Demo => Ok(self.cmd_demo()),
            ReplCommand::Goto { index } => {
                self.require_records()?;
                self.store.seek(index);
                self.cmd_show()
            }
            ReplCommand::Next => {
                self.require_records()?;
                self.store.step_next();
                self.cmd_show()
            }
            ReplCommand::Prev => {
                self.require_records()?;
                self.store.step_prev();
                self.cmd_show()
            }
            ReplCommand::Show => self.cmd_show(),
            ReplCommand::Raw => self.cmd_raw(),
            ReplCommand::Label { judgment } => {
                let mut fields = Record::new();
                fields.insert(crate::mode::ANNOTATION_FIELD.to_string(), judgment.into());
                self.commit(fields)
            }
            ReplCommand::Counts { counts } => {
                let fields = counts.to_fields()?;
                self.commit(fields)
            }
            ReplCommand::Set { field, value } => {
                let mut fields = Record::new();
                fields.insert(field, value);
                self.commit(fields)
            }
            ReplCommand::Comment { text } => {
                let mut fields = Record::new();
                fields.insert(COMMENT_FIELD.to_string(), text.into());
                self.commit(fields)
            }
            ReplCommand::Progress => Ok(self.cmd_progress()),
            ReplCommand::Table { rows } => Ok(self.cmd_table(rows)),
            ReplCommand::Save { dir } => self.cmd_save(dir.map(PathBuf::from)),
            ReplCommand::Info => Ok(self.cmd_info()),
            ReplCommand::Mode { mode } => Ok(self.cmd_mode(mode)),
            ReplCommand::History => Ok(self.cmd_history()),
            ReplCommand::Help { topic } => Ok(cmd_help(topic.as_deref())),
            ReplCommand::Quit => Ok(String::new()), // Handled in main loop
        }
    }

    fn cmd_demo(&mut self) -> String {
        let count = self.store.load_demo();
        let mut out = format!("Loaded {count} demo record\n");
        out.push_str(&self.render_current_or_empty());
        out
    }

    fn cmd_show(&self) -> Result<String> {
        let view = RecordView::from_store(&self.store, &self.projector, self.config.display_width)?;
        Ok(join_lines(&view.render_lines()))
    }

    fn cmd_raw(&self) -> Result<String> {
        let record = self.store.current()?;
        Ok(join_lines(&render_raw(record, self.config.display_width)))
    }

    fn commit(&mut self, fields: Record) -> Result<String> {
        let names: Vec<String> = fields.keys().cloned().collect();
        self.store.commit(fields)?;

        let mut out = format!(
            "Saved {} on record {}\n",
            names.join(", "),
            self.store.current_index()
        );

        if self.config.autosave {
            let dir = self.config.output_dir.clone();
            match self.cmd_save(Some(dir)) {
                Ok(saved) => out.push_str(&saved),
                Err(e) => {
                    tracing::warn!(error = %e, "autosave failed");
                    let _ = writeln!(
                        out,
                        "Warning: autosave failed, annotation kept in memory: {e}"
                    );
                }
            }
        }

        Ok(out)
    }

    fn cmd_progress(&self) -> String {
        let progress = self.store.progress();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Annotated: {} / {} ({:.1}%)",
            progress.annotated,
            progress.total,
            progress.ratio() * 100.0
        );
        let _ = writeln!(out, "Remaining: {}", progress.remaining());
        out
    }

    fn cmd_table(&self, rows: usize) -> String {
        let rows = rows.min(self.config.overview_rows);
        let table = OverviewTable::new(&self.store, rows, self.config.display_width);
        join_lines(&table.render_lines())
    }

    fn cmd_save(&self, dir: Option<PathBuf>) -> Result<String> {
        self.require_records()?;
        let dir = dir.unwrap_or_else(|| self.config.output_dir.clone());
        let bundle = self.store.export_bundle()?;
        let paths = bundle.write_to_dir(&dir)?;
        Ok(format!(
            "Wrote {} records to {} and {}\n",
            bundle.record_count,
            paths.jsonl.display(),
            paths.csv.display()
        ))
    }

    fn cmd_info(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Source: {}", self.source_label());
        let _ = writeln!(out, "Mode: {}", self.store.mode());
        let _ = writeln!(out, "Records: {}", self.store.len());
        let _ = writeln!(out, "Columns: {}", self.store.columns().join(", "));
        if !self.store.is_empty() {
            let _ = writeln!(out, "Current: {}", self.store.current_index());
        }
        let _ = writeln!(out, "Output: {}", self.config.output_dir.display());
        let _ = writeln!(
            out,
            "Autosave: {}",
            if self.config.autosave { "on" } else { "off" }
        );
        out
    }

    fn cmd_mode(&mut self, mode: Option<AnnotationMode>) -> String {
        match mode {
            None => format!("Mode: {}\n", self.store.mode()),
            Some(mode) => {
                self.store.set_mode(mode);
                self.config.mode = mode;
                format!("Switched to {mode} mode\n")
            }
        }
    }

    fn cmd_history(&self) -> String {
        let mut out = String::new();
        for (i, cmd) in self.history.iter().enumerate() {
            let _ = writeln!(out, "{:4}  {}", i + 1, cmd);
        }
        out
    }

    fn render_current_or_empty(&self) -> String {
        self.cmd_show().unwrap_or_else(|_| "Dataset has no records\n".to_string())
    }

    fn require_records(&self) -> Result<()> {
        if self.store.is_empty() {
            Err(Error::EmptyDataset)
        } else {
            Ok(())
        }
    }
}

fn join_lines(lines: &[String]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn cmd_help(topic: Option<&str>) -> String {
    match topic {
        None => "\
annotator REPL Commands:

Loading:
  load <file>              Load a JSON Lines file (replaces the dataset)
  demo                     Load the built-in example record

Navigation:
  goto <index>             Jump to a record (clamped to the dataset)
  next, prev               Move one record forward/back
  show                     Show the current record
  raw                      Show the current record as JSON

Annotation:
  label yes|no             Record a judgment (also: yes, no)
  counts <sg> <v> <bt> <bc>
                           Record behavior counts
  set <field> <value>      Set any field (JSON literal or text)
  comment <text...>        Set the annotator comment
  mode [judgment|behavior] Show or switch the annotation mode

Output:
  progress                 Show how many records are annotated
  table [n]                Show the first n records (default: 20)
  save [dir]               Write annotated_output.jsonl and .csv
  info                     Show session details

Session:
  history                  Show command history
  help [command]           Show help
  quit, exit               Exit REPL
"
        .to_string(),
        Some("label" | "yes" | "no") => "\
label yes|no

Stores \"Yes\" or \"No\" in the 'annotation' field of the current record.
Input is case-insensitive; 'y' and 'n' are accepted too.
"
        .to_string(),
        Some("counts") => "\
counts <sub_goal_setting> <verification> <backtracking> <backward_chaining>

Stores four non-negative integers on the current record.
"
        .to_string(),
        Some("set") => "\
set <field> <value>

The value is read as JSON when it parses (numbers, true, null, \"quoted\"),
otherwise it is stored as text.
"
        .to_string(),
        Some("save") => "\
save [dir]

Writes annotated_output.jsonl and annotated_output.csv into dir
(default: the session output directory). Both files come from the same
snapshot of the dataset.
"
        .to_string(),
        Some("goto") => "\
goto <index>

Indices below 0 go to the first record; indices past the end go to the last.
"
        .to_string(),
        Some(t) => format!("No detailed help for '{t}'. Type 'help' for all commands\n"),
    }
}
