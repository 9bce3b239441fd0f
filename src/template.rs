//! Period document templates
//!
//! Builds the fresh document for a new period and splices links to new
//! child periods into documents that stay open.

use crate::error::{PlannerError, PlannerResult};
use crate::period::{Period, weekday_name};
use crate::wiki::line::UNCHECKED_MARKER;
use crate::wiki::{ensure_newline, headings};
use chrono::Weekday;

/// Inputs for one fresh period document
#[derive(Debug, Clone)]
pub struct TemplateSpec<'a> {
    pub period: Period,
    pub title: Option<String>,
    /// Day theme line, placed under the title
    pub theme: Option<String>,
    /// Link to the first child period
    pub entry: Option<String>,
    pub checkpoints: &'a str,
    pub periodic_goals: &'a str,
    pub agenda: &'a str,
}

/// Lines of a checkpoint or periodic-goal source that go into a template
///
/// Lines keep their own terminator; an unterminated last line gets one.
pub fn unchecked_lines(source: &str) -> String {
    let mut out = String::new();
    for line in source
        .split_inclusive('\n')
        .filter(|l| l.starts_with(UNCHECKED_MARKER))
    {
        out.push_str(line);
        ensure_newline(&mut out);
    }
    out
}

/// Assemble a fresh period document
///
/// The layout is the same for every period: title (and theme), the link to
/// the first child, CHECKPOINTS, AGENDA, the periodic goals, NOTES and the
/// planner-time marker, which is left for the user to fill in.
pub fn build_template(spec: &TemplateSpec<'_>) -> String {
    let mut doc = String::new();

    if let Some(title) = &spec.title {
        doc.push_str(title);
        doc.push('\n');
    }
    if let Some(theme) = &spec.theme {
        doc.push_str(theme);
        doc.push('\n');
    }
    if spec.title.is_some() || spec.theme.is_some() {
        doc.push('\n');
    }
    if let Some(entry) = &spec.entry {
        doc.push_str(entry);
        doc.push_str("\n\n");
    }

    doc.push_str(headings::CHECKPOINTS);
    doc.push('\n');
    doc.push_str(&unchecked_lines(spec.checkpoints));
    doc.push('\n');

    doc.push_str(headings::AGENDA);
    doc.push('\n');
    let mut agenda = spec.agenda.to_string();
    ensure_newline(&mut agenda);
    doc.push_str(&agenda);
    doc.push('\n');

    doc.push_str(spec.period.goals_heading());
    doc.push('\n');
    doc.push_str(&unchecked_lines(spec.periodic_goals));
    doc.push('\n');

    doc.push_str(headings::NOTES);
    doc.push_str("\n\n\n");
    doc.push_str(headings::TIME_SPENT);
    doc
}

/// Forward-reference entry line for a child link
pub fn entry_line(bullet: char, link: &str) -> String {
    format!("{} {}", bullet, link)
}

/// Theme line for `day` from a day-themes document
///
/// The document lists one `<WEEKDAY>: <theme>` per line; the weekday name is
/// matched case-insensitively.
pub fn day_theme(themes: &str, day: Weekday) -> Option<String> {
    let name = weekday_name(day);
    themes.lines().find_map(|line| {
        let (key, theme) = line.split_once(':')?;
        let theme = theme.trim();
        (key.trim().eq_ignore_ascii_case(name) && !theme.is_empty())
            .then(|| format!("Theme: *{}*", theme))
    })
}

/// Insert a forward reference into a document that stays open
///
/// The entry goes on its own line right before the line holding the first
/// occurrence of `marker`, so the newest child is listed first.
///
/// # Arguments
/// * `document` - The open parent document
/// * `period` - Period of the parent, for error reporting
/// * `marker` - Text identifying the most recent existing entry
/// * `entry` - Line to insert, without a newline
///
/// # Returns
/// The rewritten document, or `TemplateLayout` if `marker` is absent
pub fn splice_forward_reference(
    document: &str,
    period: Period,
    marker: &str,
    entry: &str,
) -> PlannerResult<String> {
    let at = document
        .find(marker)
        .ok_or_else(|| PlannerError::TemplateLayout {
            period,
            marker: marker.to_string(),
        })?;
    let line_start = document[..at].rfind('\n').map_or(0, |i| i + 1);

    let mut out = String::with_capacity(document.len() + entry.len() + 1);
    out.push_str(&document[..line_start]);
    out.push_str(entry);
    out.push('\n');
    out.push_str(&document[line_start..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_week_template() {
        let doc = build_template(&TemplateSpec {
            period: Period::Week,
            title: Some("= WEEK OF DECEMBER 9, 2012 =".to_string()),
            theme: None,
            entry: Some("* [[December 9, 2012]]".to_string()),
            checkpoints: "[ ] plan week\n[x] not copied\n [ ] nor this\n[ ] review",
            periodic_goals: "WEEKLYs:\n[ ] run 3 times\n",
            agenda: "",
        });
        assert_eq!(
            doc,
            "= WEEK OF DECEMBER 9, 2012 =\n\n\
             * [[December 9, 2012]]\n\n\
             CHECKPOINTS:\n[ ] plan week\n[ ] review\n\n\
             AGENDA:\n\n\
             WEEKLYs:\n[ ] run 3 times\n\n\
             NOTES:\n\n\n\
             TIME SPENT ON PLANNER: "
        );
    }

    #[test]
    fn test_build_day_template_with_theme_and_agenda() {
        let doc = build_template(&TemplateSpec {
            period: Period::Day,
            title: Some("= THURSDAY DECEMBER 6, 2012 =".to_string()),
            theme: Some("Theme: *WORK*".to_string()),
            entry: None,
            checkpoints: "[ ] 7:00am wake up\n",
            periodic_goals: "[ ] exercise\n",
            agenda: "[ ] buy milk\n[o] parcel [$DECEMBER 6, 2012$]",
        });
        assert!(doc.starts_with("= THURSDAY DECEMBER 6, 2012 =\nTheme: *WORK*\n\nCHECKPOINTS:\n"));
        assert!(doc.contains("AGENDA:\n[ ] buy milk\n[o] parcel [$DECEMBER 6, 2012$]\n\nDAILYs:\n[ ] exercise\n\nNOTES:"));
        assert!(doc.ends_with("TIME SPENT ON PLANNER: "));
    }

    #[test]
    fn test_unchecked_lines_keep_terminators() {
        assert_eq!(
            unchecked_lines("[ ] wake up\r\n[x] skip\r\n[ ] sleep"),
            "[ ] wake up\r\n[ ] sleep\r\n"
        );
        assert_eq!(unchecked_lines("[ ] run\n[ ] swim"), "[ ] run\n[ ] swim\n");
    }

    #[test]
    fn test_day_theme() {
        let themes = "MONDAY: Work\nsaturday: Errands\nSunday:\n";
        assert_eq!(day_theme(themes, Weekday::Mon), Some("Theme: *Work*".to_string()));
        assert_eq!(day_theme(themes, Weekday::Sat), Some("Theme: *Errands*".to_string()));
        assert_eq!(day_theme(themes, Weekday::Sun), None);
        assert_eq!(day_theme(themes, Weekday::Tue), None);
    }

    #[test]
    fn test_splice_before_most_recent() {
        let month = "= DECEMBER 2012 =\n\n* [[Week of December 2, 2012]]\n* [[Month of December, 2012]]\n\nCHECKPOINTS:\n";
        let spliced = splice_forward_reference(
            month,
            Period::Month,
            "[[Week of",
            "* [[Week of December 9, 2012]]",
        )
        .unwrap();
        assert_eq!(
            spliced,
            "= DECEMBER 2012 =\n\n* [[Week of December 9, 2012]]\n* [[Week of December 2, 2012]]\n* [[Month of December, 2012]]\n\nCHECKPOINTS:\n"
        );
    }

    #[test]
    fn test_splice_missing_marker() {
        let err = splice_forward_reference("= 2012 =\n\nCHECKPOINTS:\n", Period::Year, "[[Q", "* [[Q2 2012]]")
            .unwrap_err();
        assert_eq!(
            err,
            PlannerError::TemplateLayout {
                period: Period::Year,
                marker: "[[Q".into()
            }
        );
    }

    #[test]
    fn test_splice_at_document_start() {
        let spliced =
            splice_forward_reference("* [[Q1 2012]]\n", Period::Year, "[[Q", "* [[Q2 2012]]").unwrap();
        assert_eq!(spliced, "* [[Q2 2012]]\n* [[Q1 2012]]\n");
    }
}
