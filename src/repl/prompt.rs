//! Progress-aware prompt
//!
//! The prompt shows where the annotator is and how much is done:
//!
//! ```text
//! # nothing loaded
//! annotator >
//!
//! # part way through (yellow)
//! annotator [data.jsonl: 3/40, 2 labeled] >
//!
//! # every record annotated (green)
//! annotator [data.jsonl: 40/40, 40 labeled] >
//! ```

use std::{borrow::Cow, fmt::Write};

#[cfg(feature = "repl")]
use nu_ansi_term::{Color, Style};
#[cfg(feature = "repl")]
use reedline::{Prompt, PromptEditMode, PromptHistorySearch};

use super::session::AnnotationSession;
use crate::dataset::Progress;

/// Annotation status shown by the prompt color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStatus {
    /// Every record annotated
    Complete,
    /// Some records annotated
    InProgress,
    /// Records loaded, none annotated
    NotStarted,
    /// No dataset loaded
    None,
}

impl ProgressStatus {
    /// Classify a progress snapshot
    #[must_use]
    pub fn from_progress(progress: Progress) -> Self {
        if progress.total == 0 {
            Self::None
        } else if progress.annotated >= progress.total {
            Self::Complete
        } else if progress.annotated > 0 {
            Self::InProgress
        } else {
            Self::NotStarted
        }
    }

    /// Get ANSI color for this status
    #[cfg(feature = "repl")]
    #[must_use]
    pub fn color(&self) -> Color {
        match self {
            Self::Complete => Color::Green,
            Self::InProgress => Color::Yellow,
            Self::NotStarted | Self::None => Color::Default,
        }
    }
}

/// Prompt text rendered from a session snapshot
#[derive(Debug, Clone)]
pub struct SessionPrompt {
    text: String,
}

impl SessionPrompt {
    /// Snapshot the session into a prompt
    #[must_use]
    pub fn new(session: &AnnotationSession) -> Self {
        let text = if session.config.color_output {
            Self::render_colored(session)
        } else {
            Self::render(session)
        };
        Self { text }
    }

    /// Render prompt string from session state (plain text)
    #[must_use]
    pub fn render(session: &AnnotationSession) -> String {
        let mut prompt = String::from("annotator");
        if let Some(status) = status_text(session) {
            let _ = write!(prompt, " [{status}]");
        }
        prompt.push_str(" > ");
        prompt
    }

    /// Render prompt with colors for terminal
    #[cfg(feature = "repl")]
    #[must_use]
    pub fn render_colored(session: &AnnotationSession) -> String {
        let mut prompt = Style::new().bold().paint("annotator").to_string();
        if let Some(status) = status_text(session) {
            let color = ProgressStatus::from_progress(session.store().progress()).color();
            let _ = write!(prompt, " [{}]", color.paint(status));
        }
        prompt.push_str(" > ");
        prompt
    }

    /// The rendered prompt text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

fn status_text(session: &AnnotationSession) -> Option<String> {
    let store = session.store();
    if store.is_empty() {
        return None;
    }
    let progress = store.progress();
    Some(format!(
        "{}: {}/{}, {} labeled",
        session.source_label(),
        store.current_index() + 1,
        store.len(),
        progress.annotated
    ))
}

#[cfg(feature = "repl")]
impl Prompt for SessionPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.text)
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        _history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        Cow::Borrowed("(search) ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SessionConfig, repl::CommandParser};

    fn plain_session() -> AnnotationSession {
        AnnotationSession::new(SessionConfig::default().with_color(false)).unwrap()
    }

    #[test]
    fn test_status_from_progress() {
        let p = |annotated, total| ProgressStatus::from_progress(Progress { annotated, total });
        assert_eq!(p(0, 0), ProgressStatus::None);
        assert_eq!(p(0, 3), ProgressStatus::NotStarted);
        assert_eq!(p(1, 3), ProgressStatus::InProgress);
        assert_eq!(p(3, 3), ProgressStatus::Complete);
    }

    #[test]
    fn test_render_no_dataset() {
        assert_eq!(SessionPrompt::render(&plain_session()), "annotator > ");
    }

    #[test]
    fn test_render_with_progress() {
        let mut session = plain_session();
        session
            .execute(CommandParser::parse("demo").unwrap())
            .unwrap();
        assert_eq!(
            SessionPrompt::render(&session),
            "annotator [demo: 1/1, 0 labeled] > "
        );
        session
            .execute(CommandParser::parse("label yes").unwrap())
            .unwrap();
        assert_eq!(
            SessionPrompt::new(&session).as_str(),
            "annotator [demo: 1/1, 1 labeled] > "
        );
    }

    #[cfg(feature = "repl")]
    #[test]
    fn test_status_colors() {
        assert_eq!(ProgressStatus::Complete.color(), Color::Green);
        assert_eq!(ProgressStatus::InProgress.color(), Color::Yellow);
        assert_eq!(ProgressStatus::None.color(), Color::Default);
    }

    #[cfg(feature = "repl")]
    #[test]
    fn test_render_colored_keeps_text() {
        let mut session = AnnotationSession::default();
        session
            .execute(CommandParser::parse("demo").unwrap())
            .unwrap();
        let rendered = SessionPrompt::render_colored(&session);
        assert!(rendered.contains("annotator"));
        assert!(rendered.contains("demo: 1/1, 0 labeled"));
        assert!(rendered.ends_with(" > "));
    }

    #[cfg(feature = "repl")]
    #[test]
    fn test_prompt_trait() {
        let prompt = SessionPrompt::new(&plain_session());
        assert_eq!(prompt.render_prompt_left().as_ref(), "annotator > ");
        assert_eq!(prompt.render_prompt_right().as_ref(), "");
        assert_eq!(
            prompt.render_prompt_indicator(PromptEditMode::Default).as_ref(),
            ""
        );
        assert_eq!(prompt.render_prompt_multiline_indicator().as_ref(), "... ");
    }
}
