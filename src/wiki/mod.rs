//! Line-oriented wiki document primitives
//!
//! This module contains the text-level building blocks shared by the task
//! migrator, the template builder and the period advancer:
//! - `section`: locating a heading's section inside a buffer
//! - `line`: task markers, date annotations and indented blocks

pub mod line;
pub mod section;

pub use line::{TaskStatus, indent_of, is_blank, status_of};
pub use section::{Section, find_section, is_heading};

/// Headings used across planner documents
pub mod headings {
    pub const TOMORROW: &str = "TOMORROW:";
    pub const SCHEDULED: &str = "SCHEDULED:";
    pub const AGENDA: &str = "AGENDA:";
    pub const NOTES: &str = "NOTES:";
    pub const CHECKPOINTS: &str = "CHECKPOINTS:";
    pub const TIME_SPENT: &str = "TIME SPENT ON PLANNER: ";
}

/// Make sure non-empty text ends with a newline
///
/// Text that already uses CRLF line endings gets a CRLF.
pub fn ensure_newline(text: &mut String) {
    if text.is_empty() || text.ends_with('\n') {
        return;
    }
    if text.contains("\r\n") {
        text.push_str("\r\n");
    } else {
        text.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_newline_keeps_line_ending_style() {
        let mut text = String::from("[ ] a\n[ ] b");
        ensure_newline(&mut text);
        assert_eq!(text, "[ ] a\n[ ] b\n");

        let mut text = String::from("[ ] a\r\n[ ] b");
        ensure_newline(&mut text);
        assert_eq!(text, "[ ] a\r\n[ ] b\r\n");

        let mut text = String::new();
        ensure_newline(&mut text);
        assert!(text.is_empty());
    }
}
