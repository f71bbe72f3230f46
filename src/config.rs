//! Session configuration.

use std::path::{Path, PathBuf};

use crate::{
    error::{Error, Result},
    mode::AnnotationMode,
    projector::{
        RecordProjector, DEFAULT_DISPLAY_KEYS, DEFAULT_REASONING_END, DEFAULT_REASONING_START,
    },
};

/// Settings for one annotation session.
///
/// Built with the `with_*` methods and checked with [`SessionConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Annotation fields to work with
    pub mode: AnnotationMode,
    /// Candidate fields for display text, first match in the schema wins
    pub display_keys: Vec<String>,
    /// Opening marker of the reasoning span
    pub reasoning_start: String,
    /// Closing marker of the reasoning span
    pub reasoning_end: String,
    /// Directory receiving `annotated_output.{jsonl,csv}`
    pub output_dir: PathBuf,
    /// Write both output files after every commit
    pub autosave: bool,
    /// Wrap width for record display
    pub display_width: u16,
    /// Rows shown by the progress table
    pub overview_rows: usize,
    /// Enable color output
    pub color_output: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: AnnotationMode::default(),
            display_keys: DEFAULT_DISPLAY_KEYS.iter().map(|k| (*k).to_string()).collect(),
            reasoning_start: DEFAULT_REASONING_START.to_string(),
            reasoning_end: DEFAULT_REASONING_END.to_string(),
            output_dir: PathBuf::from("."),
            autosave: false,
            display_width: 100,
            overview_rows: 200,
            color_output: true,
        }
    }
}

impl SessionConfig {
    /// Set the annotation mode
    #[must_use]
    pub fn with_mode(mut self, mode: AnnotationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replace the display key fallback chain
    #[must_use]
    pub fn with_display_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.display_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set the reasoning span markers
    #[must_use]
    pub fn with_reasoning_markers(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.reasoning_start = start.into();
        self.reasoning_end = end.into();
        self
    }

    /// Set the output directory
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Enable/disable saving after every commit
    #[must_use]
    pub fn with_autosave(mut self, enabled: bool) -> Self {
        self.autosave = enabled;
        self
    }

    /// Set the display wrap width
    #[must_use]
    pub fn with_display_width(mut self, width: u16) -> Self {
        self.display_width = width;
        self
    }

    /// Set the number of rows in the progress table
    #[must_use]
    pub fn with_overview_rows(mut self, rows: usize) -> Self {
        self.overview_rows = rows;
        self
    }

    /// Enable/disable color output
    #[must_use]
    pub fn with_color(mut self, enabled: bool) -> Self {
        self.color_output = enabled;
        self
    }

    /// Check the settings for values the session cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for empty reasoning markers or a zero
    /// display width.
    pub fn validate(&self) -> Result<()> {
        if self.reasoning_start.is_empty() || self.reasoning_end.is_empty() {
            return Err(Error::invalid_config("reasoning markers must not be empty"));
        }
        if self.display_width == 0 {
            return Err(Error::invalid_config("display width must be positive"));
        }
        if self.display_keys.iter().any(|k| k.trim().is_empty()) {
            return Err(Error::invalid_config("display keys must not be blank"));
        }
        tracing::debug!(mode = %self.mode, keys = ?self.display_keys, "session config ok");
        Ok(())
    }

    /// The projector these settings describe.
    #[must_use]
    pub fn projector(&self) -> RecordProjector {
        RecordProjector::new(
            self.display_keys.clone(),
            self.reasoning_start.clone(),
            self.reasoning_end.clone(),
        )
    }
}
