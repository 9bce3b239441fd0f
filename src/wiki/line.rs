//! Task line model
//!
//! Task lines start (after any leading tabs) with a bracketed status marker.
//! Detail lines belonging to a task follow it, indented one tab deeper.
//! Blocked tasks end with a date annotation: `[$...$]` once resolved,
//! `[...]` before.

use regex::Regex;
use std::sync::LazyLock;

pub const BLOCKED_MARKER: &str = "[o]";
pub const UNCHECKED_MARKER: &str = "[ ]";

static RE_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\s*\[\$?([^\[\]$]+?)\$?\]\s*$").unwrap());

/// Status marker of a task line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// `[x]` or `[-]`
    Done,
    /// `[ ]`
    Undone,
    /// `[\]`
    Partial,
    /// `[o]`
    Blocked,
}

/// Number of leading tabs
pub fn indent_of(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b'\t').count()
}

/// Status of a task line, if it is one
pub fn status_of(line: &str) -> Option<TaskStatus> {
    let text = line.trim_start_matches('\t');
    let marker = text.get(..3)?;
    match marker {
        "[x]" | "[X]" | "[-]" => Some(TaskStatus::Done),
        "[ ]" => Some(TaskStatus::Undone),
        "[\\]" => Some(TaskStatus::Partial),
        "[o]" | "[O]" => Some(TaskStatus::Blocked),
        _ => None,
    }
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Split a blocked task line into the text before its date annotation and
/// the annotation's expression
///
/// # Returns
/// `(text, expression)` where `text` includes the indent and the marker and
/// has trailing whitespace removed, or None if the line has no annotation
pub fn split_annotation(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_end_matches(['\n', '\r']);
    let marker_end = indent_of(line) + BLOCKED_MARKER.len();
    let rest = line.get(marker_end..)?;
    let caps = RE_ANNOTATION.captures(rest)?;
    let text_end = marker_end + caps.get(1)?.end();
    Some((&line[..text_end], caps.get(2)?.as_str().trim()))
}

/// The `\n` or `\r\n` that ends a line, or "" for an unterminated last line
pub fn line_ending(line: &str) -> &str {
    if line.ends_with("\r\n") {
        &line[line.len() - 2..]
    } else if line.ends_with('\n') {
        &line[line.len() - 1..]
    } else {
        ""
    }
}

/// Render a blocked task line with a resolved annotation
pub fn with_annotation(text: &str, canonical: &str) -> String {
    format!("{} [${}$]", text, canonical)
}

/// Group lines into blocks: a line plus the following lines indented deeper
/// than it
///
/// Blank lines always stand alone.
pub fn blocks<'a>(lines: &[&'a str]) -> Vec<Vec<&'a str>> {
    let mut out: Vec<Vec<&str>> = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let head = lines[i];
        let mut block = vec![head];
        i += 1;
        if !is_blank(head) {
            let base = indent_of(head);
            while i < lines.len() && !is_blank(lines[i]) && indent_of(lines[i]) > base {
                block.push(lines[i]);
                i += 1;
            }
        }
        out.push(block);
    }
    out
}

/// Remove `depth` leading tabs from a line, where present
pub fn dedent(line: &str, depth: usize) -> &str {
    let tabs = indent_of(line).min(depth);
    &line[tabs..]
}
