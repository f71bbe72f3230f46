//! Terminal rendering of the annotation dataset
//!
//! Plain-text widgets that produce lines for the REPL and the CLI:
//! - `RecordView` - the record under the cursor with its reasoning span
//! - `OverviewTable` - progress table over the whole dataset
//!
//! Widths are measured in display columns, so wide scripts line up.

mod format;
mod overview;
mod record_view;

pub use format::{display_width, pad_to_width, truncate_string, wrap_text};
pub use overview::OverviewTable;
pub use record_view::{render_raw, RecordView};
