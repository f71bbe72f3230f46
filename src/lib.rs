//! annotator - label reasoning traces stored as JSON Lines
//!
//! Loads a JSON Lines file of model reasoning traces, steps through it one
//! record at a time and records a human judgment per record: either a
//! Yes/No label or counts of four reasoning behaviors, plus a free-text
//! comment. Annotations are exported as JSON Lines and CSV.
//!
//! # Design Principles
//!
//! 1. **Pass-through** - every field of every input record survives export,
//!    in its original order
//! 2. **All or nothing** - a malformed line rejects the whole load and the
//!    previous dataset stays in place
//! 3. **Explicit commits** - records change only through a commit on the
//!    record under the cursor
//!
//! # Quick Start
//!
//! ```
//! use annotator::{AnnotationMode, DatasetStore, Judgment, RecordProjector};
//!
//! let mut store = DatasetStore::new(AnnotationMode::Judgment);
//! store
//!     .load("{\"custom_id\":\"a\",\"input\":\"2x=10 <think>x=5</think>\"}")
//!     .unwrap();
//!
//! let projection = RecordProjector::default().project_current(&store).unwrap();
//! assert_eq!(projection.reasoning.as_deref(), Some("x=5"));
//!
//! store.commit_field("annotation", Judgment::No).unwrap();
//! let bundle = store.export_bundle().unwrap();
//! assert!(bundle.jsonl.contains("\"annotation\":\"No\""));
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss,
        clippy::redundant_clone,
        clippy::too_many_lines,
        clippy::float_cmp,
        clippy::panic
    )
)]
// Allow some pedantic lints for cleaner code
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::map_unwrap_or)]

/// CLI module for command-line interface
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod format;
pub mod mode;
pub mod projector;
pub mod record;
#[cfg(feature = "repl")]
pub mod repl;
/// Terminal rendering helpers
pub mod tui;

// Re-exports for convenience
pub use config::SessionConfig;
pub use dataset::{DatasetStore, Progress};
pub use error::{Error, Result};
pub use format::{ExportBundle, OutputPaths};
pub use mode::{AnnotationMode, BehaviorCounts, Judgment};
pub use projector::{Projection, RecordProjector};
pub use record::Record;
pub use tui::{OverviewTable, RecordView};
