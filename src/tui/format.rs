//! Text fitting utilities for terminal display
//!
//! Widths are display columns (via `unicode-width`), so CJK and Devanagari
//! text lines up with ASCII.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Calculate the display width of a string
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within a maximum display width
///
/// Adds `..` if truncation occurs. Newlines are flattened to spaces so a
/// cell always stays on one line.
///
/// # Arguments
/// * `s` - The string to truncate
/// * `max_width` - Maximum display width in columns
pub fn truncate_string(s: &str, max_width: usize) -> String {
    let flat: String = s
        .chars()
        .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
        .collect();

    if display_width(&flat) <= max_width {
        return flat;
    }

    let (budget, suffix) = if max_width < 3 {
        (max_width, "")
    } else {
        (max_width - 2, "..")
    };

    let mut result = String::new();
    let mut used = 0;
    for c in flat.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        result.push(c);
    }
    result.push_str(suffix);
    result
}

/// Pad a string with spaces to exactly `width` display columns
///
/// Longer strings are truncated first.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let mut out = truncate_string(s, width);
    let w = display_width(&out);
    if w < width {
        out.push_str(&" ".repeat(width - w));
    }
    out
}

/// Wrap text to fit within a maximum display width
///
/// Existing line breaks are kept; each line is split at the width limit.
/// Always returns at least one line.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();

    for line in text.lines() {
        if line.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut used = 0;
        for c in line.chars() {
            let w = UnicodeWidthChar::width(c).unwrap_or(0);
            if used + w > max_width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                used = 0;
            }
            current.push(c);
            used += w;
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
