//! Task migration
//!
//! Moves blocked (deferred, dated) tasks between the task list's TOMORROW,
//! SCHEDULED and free sections and the day log's AGENDA. Every function is
//! a pure transformation: it takes document text and returns the rewritten
//! text together with whatever it extracted.

use crate::config::CheckingMode;
use crate::dates::{self, ResolvedDate};
use crate::error::{PlannerError, PlannerResult};
use crate::wiki::line::{
    BLOCKED_MARKER, TaskStatus, blocks, dedent, indent_of, is_blank, line_ending,
    split_annotation, status_of, with_annotation,
};
use crate::wiki::{Section, ensure_newline, find_section, headings};
use chrono::{Duration, NaiveDate};

/// Tasks under a log's AGENDA, bucketed by status
///
/// Each bucket holds the task lines with their detail lines, in document
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Agenda {
    /// `[x]` and `[-]`
    pub done: String,
    /// `[ ]` and `[\]`
    pub undone: String,
    /// `[o]`
    pub blocked: String,
}

/// Number of tasks (not detail lines) in a run of task blocks
fn count_tasks(tasks: &str) -> usize {
    tasks
        .lines()
        .filter(|l| indent_of(l) == 0 && status_of(l).is_some())
        .count()
}

impl Agenda {
    pub fn done_count(&self) -> usize {
        count_tasks(&self.done)
    }

    pub fn undone_count(&self) -> usize {
        count_tasks(&self.undone)
    }

    pub fn blocked_count(&self) -> usize {
        count_tasks(&self.blocked)
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_empty() && self.undone.is_empty() && self.blocked.is_empty()
    }
}

fn scheduled_section(task_list: &str) -> PlannerResult<Section<'_>> {
    find_section(task_list, headings::SCHEDULED)
        .ok_or_else(|| PlannerError::TasklistLayout("SCHEDULED".to_string()))
}

fn not_scheduled(line: &str) -> PlannerError {
    PlannerError::BlockedTaskNotScheduled(line.trim().to_string())
}

/// Resolve a blocked line's annotation and render it canonically
fn normalize_blocked(
    line: &str,
    reference: Option<NaiveDate>,
) -> PlannerResult<(String, ResolvedDate)> {
    let (text, expression) = split_annotation(line).ok_or_else(|| not_scheduled(line))?;
    let resolved = dates::resolve(expression, reference)?;
    let mut rendered = with_annotation(text, &resolved.canonical);
    rendered.push_str(line_ending(line));
    Ok((rendered, resolved))
}

/// Index just past the detail lines of the task at `start`
fn block_end(lines: &[&str], start: usize) -> usize {
    let depth = indent_of(lines[start]);
    let mut end = start + 1;
    while end < lines.len() && !is_blank(lines[end]) && indent_of(lines[end]) > depth {
        end += 1;
    }
    end
}

/// Pull every blocked task (at any depth) out of `text`
///
/// # Returns
/// The remaining text and the extracted tasks, each normalized, moved to
/// top level and newline-terminated
fn extract_blocked(
    text: &str,
    reference: Option<NaiveDate>,
) -> PlannerResult<(String, Vec<String>)> {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let mut remaining = String::with_capacity(text.len());
    let mut moved = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        if status_of(lines[i]) != Some(TaskStatus::Blocked) {
            remaining.push_str(lines[i]);
            i += 1;
            continue;
        }

        let end = block_end(&lines, i);
        relocate(&lines[i..end], reference, &mut moved)?;
        i = end;
    }

    Ok((remaining, moved))
}

/// Turn one blocked task block into top-level SCHEDULED entries
///
/// The task keeps its plain detail lines. Blocked tasks nested among them
/// carry their own dates, so each becomes a separate entry right after its
/// parent.
fn relocate(
    block: &[&str],
    reference: Option<NaiveDate>,
    moved: &mut Vec<String>,
) -> PlannerResult<()> {
    let depth = indent_of(block[0]);
    let (head, _) = normalize_blocked(block[0], reference)?;
    let mut entry = dedent(&head, depth).to_string();
    ensure_newline(&mut entry);

    let mut nested = Vec::new();
    let mut j = 1;
    while j < block.len() {
        if status_of(block[j]) == Some(TaskStatus::Blocked) {
            let end = block_end(block, j);
            relocate(&block[j..end], reference, &mut nested)?;
            j = end;
        } else {
            entry.push_str(dedent(block[j], depth));
            j += 1;
        }
    }
    ensure_newline(&mut entry);

    moved.push(entry);
    moved.extend(nested);
    Ok(())
}

/// Normalize the entries already under SCHEDULED in place
fn normalize_scheduled(body: &str, reference: Option<NaiveDate>) -> PlannerResult<String> {
    let mut out = String::with_capacity(body.len());
    for line in body.split_inclusive('\n') {
        if is_blank(line) || indent_of(line) > 0 {
            out.push_str(line);
            continue;
        }
        if status_of(line) != Some(TaskStatus::Blocked) {
            return Err(PlannerError::BlockedTaskNotScheduled(format!(
                "'{}' under SCHEDULED does not start with {}",
                line.trim(),
                BLOCKED_MARKER
            )));
        }
        let (rendered, _) = normalize_blocked(line, reference)?;
        out.push_str(&rendered);
    }
    Ok(out)
}

/// Insert `entries` after the last non-blank line of `body`
fn append_after_content(body: &str, entries: &[String]) -> String {
    if entries.is_empty() {
        return body.to_string();
    }
    let lines: Vec<&str> = body.split_inclusive('\n').collect();
    let end = lines.iter().rposition(|l| !is_blank(l)).map_or(0, |i| i + 1);

    let mut out = String::with_capacity(body.len() + entries.iter().map(String::len).sum::<usize>());
    for line in &lines[..end] {
        out.push_str(line);
    }
    ensure_newline(&mut out);
    for entry in entries {
        out.push_str(entry);
    }
    for line in &lines[end..] {
        out.push_str(line);
    }
    out
}

/// Normalize blocked tasks and gather them under SCHEDULED
///
/// Every blocked task in the task list and in the day log's AGENDA has its
/// date annotation resolved against `reference` and rewritten as
/// `[$<canonical>$]`. Tasks outside SCHEDULED move there (with their detail
/// lines), after the section's existing content. Running this twice gives
/// the same documents as running it once.
///
/// # Arguments
/// * `task_list` - Task list document
/// * `day_log` - Current day log document
/// * `reference` - The planner's current date
///
/// # Returns
/// The rewritten task list and day log
pub fn schedule_tasks(
    task_list: &str,
    day_log: &str,
    reference: NaiveDate,
) -> PlannerResult<(String, String)> {
    let reference = Some(reference);
    let section = scheduled_section(task_list)?;

    let (before, mut relocated) = extract_blocked(section.before, reference)?;
    let (after, from_after) = extract_blocked(section.after, reference)?;
    relocated.extend(from_after);

    let agenda = find_section(day_log, headings::AGENDA)
        .ok_or_else(|| PlannerError::LogfileLayout("AGENDA".to_string()))?;
    let (agenda_body, from_agenda) = extract_blocked(agenda.body, reference)?;
    relocated.extend(from_agenda);

    let body = normalize_scheduled(section.body, reference)?;
    let body = append_after_content(&body, &relocated);

    if !relocated.is_empty() {
        tracing::info!(count = relocated.len(), "moved blocked tasks to SCHEDULED");
    }

    let task_list = Section {
        before: &before,
        heading: section.heading,
        body: "",
        after: &after,
    }
    .with_body(&body);
    let day_log = agenda.with_body(&agenda_body);
    Ok((task_list, day_log))
}

/// Take the scheduled tasks that are due
///
/// Annotations that were never normalized are resolved as of the day before
/// `for_day`.
///
/// # Arguments
/// * `task_list` - Task list document
/// * `for_day` - Tasks dated on or before this day are due
///
/// # Returns
/// The task list without the due tasks, and the due tasks (with detail
/// lines) in their original order
pub fn get_scheduled_tasks(task_list: &str, for_day: NaiveDate) -> PlannerResult<(String, String)> {
    let section = scheduled_section(task_list)?;
    let reference = Some(for_day - Duration::days(1));
    let lines = section.body_lines();

    let mut kept = String::with_capacity(section.body.len());
    let mut due = String::new();
    for block in blocks(&lines) {
        let head = block[0];
        if is_blank(head) || indent_of(head) > 0 {
            block.iter().for_each(|l| kept.push_str(l));
            continue;
        }
        if status_of(head) != Some(TaskStatus::Blocked) {
            return Err(not_scheduled(head));
        }
        let (_, expression) = split_annotation(head).ok_or_else(|| not_scheduled(head))?;
        let resolved = dates::resolve(expression, reference)?;

        let target = if resolved.date <= for_day {
            &mut due
        } else {
            &mut kept
        };
        block.iter().for_each(|l| target.push_str(l));
        ensure_newline(target);
    }

    tracing::debug!(count = count_tasks(&due), %for_day, "scheduled tasks due");
    Ok((section.with_body(&kept), due))
}

/// Take every task listed under TOMORROW
///
/// # Arguments
/// * `task_list` - Task list document
/// * `mode` - In strict mode an empty TOMORROW section is an error
///
/// # Returns
/// The task list without those tasks, and the tasks with their detail lines
pub fn get_tasks_for_tomorrow(
    task_list: &str,
    mode: CheckingMode,
) -> PlannerResult<(String, String)> {
    let section = find_section(task_list, headings::TOMORROW)
        .ok_or_else(|| PlannerError::TasklistLayout("TOMORROW".to_string()))?;
    let lines = section.body_lines();

    let mut kept = String::with_capacity(section.body.len());
    let mut tasks = String::new();
    for block in blocks(&lines) {
        let head = block[0];
        if indent_of(head) == 0 && status_of(head).is_some() {
            block.iter().for_each(|l| tasks.push_str(l));
            ensure_newline(&mut tasks);
        } else {
            block.iter().for_each(|l| kept.push_str(l));
        }
    }

    if tasks.is_empty() && mode.is_strict() {
        return Err(PlannerError::TomorrowIsEmpty);
    }
    Ok((section.with_body(&kept), tasks))
}

/// Classify the tasks under a log's AGENDA
pub fn extract_agenda(log: &str) -> PlannerResult<Agenda> {
    let section = find_section(log, headings::AGENDA)
        .ok_or_else(|| PlannerError::LogfileLayout("AGENDA".to_string()))?;
    let lines = section.body_lines();

    let mut agenda = Agenda::default();
    for block in blocks(&lines) {
        let head = block[0];
        if indent_of(head) > 0 {
            continue;
        }
        let bucket = match status_of(head) {
            Some(TaskStatus::Done) => &mut agenda.done,
            Some(TaskStatus::Undone | TaskStatus::Partial) => &mut agenda.undone,
            Some(TaskStatus::Blocked) => &mut agenda.blocked,
            None => continue,
        };
        block.iter().for_each(|l| bucket.push_str(l));
        ensure_newline(bucket);
    }
    Ok(agenda)
}
