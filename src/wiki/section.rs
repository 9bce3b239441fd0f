//! Section scanning
//!
//! A section is the run of lines below a heading line, ending at the next
//! line that starts with three or more capital letters (the next heading)
//! or at the end of the buffer. Sections are never cached; every access
//! scans the buffer from the start.

/// A buffer split around one section
///
/// Concatenating `before`, `heading`, `body` and `after` gives back the
/// original buffer exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    pub before: &'a str,
    pub heading: &'a str,
    pub body: &'a str,
    pub after: &'a str,
}

impl<'a> Section<'a> {
    /// Rebuild the buffer with a different section body
    pub fn with_body(&self, body: &str) -> String {
        let mut out = String::with_capacity(
            self.before.len() + self.heading.len() + body.len() + self.after.len() + 1,
        );
        out.push_str(self.before);
        out.push_str(self.heading);
        if !body.is_empty() && !self.heading.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(body);
        if !self.after.is_empty() && !body.is_empty() && !body.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(self.after);
        out
    }

    /// Lines of the body, each with its line terminator
    pub fn body_lines(&self) -> Vec<&'a str> {
        self.body.split_inclusive('\n').collect()
    }

    /// Check if the body has any non-whitespace content
    pub fn has_content(&self) -> bool {
        !self.body.trim().is_empty()
    }
}

/// Check if a line starts a new section
pub fn is_heading(line: &str) -> bool {
    line.bytes().take_while(|b| b.is_ascii_uppercase()).count() >= 3
}

/// Locate the section introduced by `heading`
///
/// # Arguments
/// * `buffer` - Document text
/// * `heading` - Heading prefix, matched case-insensitively against the
///   start of each line (e.g. "SCHEDULED:")
///
/// # Returns
/// The split buffer, or None if no line starts with the heading
pub fn find_section<'a>(buffer: &'a str, heading: &str) -> Option<Section<'a>> {
    let target = heading.to_uppercase();
    let mut offset = 0;
    let mut heading_span: Option<(usize, usize)> = None;

    for line in buffer.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        match heading_span {
            None => {
                if line.to_uppercase().starts_with(&target) {
                    heading_span = Some((start, offset));
                }
            }
            Some((heading_start, body_start)) => {
                if is_heading(line) {
                    return Some(Section {
                        before: &buffer[..heading_start],
                        heading: &buffer[heading_start..body_start],
                        body: &buffer[body_start..start],
                        after: &buffer[start..],
                    });
                }
            }
        }
    }

    heading_span.map(|(heading_start, body_start)| Section {
        before: &buffer[..heading_start],
        heading: &buffer[heading_start..body_start],
        body: &buffer[body_start..],
        after: "",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASKS: &str = "TOMORROW:\n[ ] buy milk\n\t2 litres\n\nTHIS WEEK:\n[ ] taxes\n\nSCHEDULED:\n[o] dentist [$DECEMBER 12, 2012$]\n";

    #[test]
    fn test_find_section_middle() {
        let s = find_section(TASKS, "this week:").unwrap();
        assert_eq!(s.heading, "THIS WEEK:\n");
        assert_eq!(s.body, "[ ] taxes\n\n");
        assert!(s.after.starts_with("SCHEDULED:"));
        assert_eq!(format!("{}{}{}{}", s.before, s.heading, s.body, s.after), TASKS);
    }

    #[test]
    fn test_find_section_at_end() {
        let s = find_section(TASKS, "SCHEDULED:").unwrap();
        assert_eq!(s.body, "[o] dentist [$DECEMBER 12, 2012$]\n");
        assert_eq!(s.after, "");
    }

    #[test]
    fn test_continuation_lines_are_not_headings() {
        let s = find_section(TASKS, "TOMORROW:").unwrap();
        assert_eq!(s.body_lines(), vec!["[ ] buy milk\n", "\t2 litres\n", "\n"]);
    }

    #[test]
    fn test_missing_section() {
        assert!(find_section(TASKS, "AGENDA:").is_none());
        assert!(find_section("", "AGENDA:").is_none());
    }

    #[test]
    fn test_is_heading() {
        assert!(is_heading("NOTES:\n"));
        assert!(is_heading("TIME SPENT ON PLANNER: "));
        assert!(!is_heading("Notes:\n"));
        assert!(!is_heading("OK then\n"));
        assert!(!is_heading("[ ] TODO\n"));
    }

    #[test]
    fn test_with_body_round_trip() {
        let s = find_section(TASKS, "THIS WEEK:").unwrap();
        assert_eq!(s.with_body(s.body), TASKS);
        let replaced = s.with_body("[x] taxes\n\n");
        assert!(replaced.contains("THIS WEEK:\n[x] taxes\n\nSCHEDULED:"));
    }

    #[test]
    fn test_with_body_heading_without_newline() {
        let s = find_section("AGENDA:", "AGENDA:").unwrap();
        assert_eq!(s.body, "");
        assert_eq!(s.with_body("[ ] a\n"), "AGENDA:\n[ ] a\n");
    }
}
