//! Period advancement
//!
//! Decides which periods roll over between the planner's current date and
//! the wall clock, then builds the new documents. A day ends at 18:00; a
//! week starts on Sunday unless that would leave a week shorter than
//! [`MIN_WEEK_LENGTH`] days at either end of the month; a month always
//! starts a new week.

use crate::config::Config;
use crate::error::{PlannerError, PlannerResult};
use crate::period::{MIN_WEEK_LENGTH, Period, TemplateKind};
use crate::planner::PlannerState;
use crate::tasks;
use crate::template::{self, TemplateSpec};
use crate::wiki::{find_section, headings};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Weekday};

/// Hour at which the current day is considered over
pub const END_OF_DAY_HOUR: u32 = 18;

/// Result of a successful advance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    /// Highest period that rolled over
    pub decision: Period,
    /// The planner's new current date
    pub next_date: NaiveDate,
    /// Periods that got a fresh document, ascending
    pub created: Vec<Period>,
    /// Open parent period that received a forward reference
    pub spliced: Option<Period>,
    /// Final text of each superseded document, as it stood when closed
    pub superseded: Vec<(Period, String)>,
}

fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|first| (first - Duration::days(1)).day())
        .unwrap_or(31)
}

/// Check if a new week starts on `next_day`, ignoring month boundaries
fn starts_week(next_day: NaiveDate) -> bool {
    next_day.weekday() == Weekday::Sun
        && next_day.day() > MIN_WEEK_LENGTH
        && days_in_month(next_day) - next_day.day() >= MIN_WEEK_LENGTH - 1
}

/// Decide the highest period that rolls over
///
/// # Arguments
/// * `current` - The planner's current date
/// * `now` - Wall-clock time
///
/// # Returns
/// The decision, or `DayStillInProgress` / `PlannerIsInTheFuture` when the
/// day cannot be advanced
pub fn decide(current: NaiveDate, now: NaiveDateTime) -> PlannerResult<Period> {
    let today = now.date();
    if current > today {
        return Err(PlannerError::PlannerIsInTheFuture {
            planner: current.to_string(),
            today: today.to_string(),
        });
    }
    if current == today && now.hour() < END_OF_DAY_HOUR {
        return Err(PlannerError::DayStillInProgress(
            now.format("%H:%M").to_string(),
        ));
    }

    let next_day = current + Duration::days(1);
    let month = next_day.day() == 1;
    let week = month || starts_week(next_day);
    let quarter = month && matches!(next_day.month(), 1 | 4 | 7 | 10);
    let year = quarter && next_day.month() == 1;

    let decision = if year {
        Period::Year
    } else if quarter {
        Period::Quarter
    } else if month {
        Period::Month
    } else if week {
        Period::Week
    } else {
        Period::Day
    };
    Ok(decision)
}

/// Make sure every log that is about to be superseded has NOTES
fn check_completion(state: &PlannerState, decision: Period, config: &Config) -> PlannerResult<()> {
    if !config.completion_checking.is_strict() {
        return Ok(());
    }
    for period in decision.up_to() {
        let notes = find_section(state.log(period), headings::NOTES)
            .ok_or_else(|| PlannerError::LogfileLayout(format!("NOTES ({} log)", period)))?;
        if !notes.has_content() {
            return Err(PlannerError::LogfileNotCompleted(period));
        }
    }
    Ok(())
}

/// Fresh document for the period starting on `start`
fn build_document(
    state: &PlannerState,
    period: Period,
    start: NaiveDate,
    agenda: &str,
    bullet: char,
) -> String {
    let sources = state.template(TemplateKind::for_period(period, start));
    let theme = match period {
        Period::Day => state
            .day_themes
            .as_deref()
            .and_then(|themes| template::day_theme(themes, start.weekday())),
        _ => None,
    };
    template::build_template(&TemplateSpec {
        period,
        title: Some(period.title(start)),
        theme,
        entry: period
            .child()
            .map(|child| template::entry_line(bullet, &child.link(start))),
        checkpoints: &sources.checkpoints,
        periodic_goals: &sources.periodic_goals,
        agenda,
    })
}

/// Start a planner on `start` with a fresh document for every period
///
/// The task list and templates of `state` are kept. TOMORROW and scheduled
/// tasks are left in place; they are picked up by the first advance.
pub fn initialize(state: &mut PlannerState, start: NaiveDate, config: &Config) {
    for period in Period::ALL {
        let document = build_document(state, period, start, "", config.preferred_bullet_char);
        state.set_log(period, document);
    }
    state.current_date = start;
    tracing::info!(%start, "planner initialized");
}

/// Roll the planner over to the next day and every period that ends with
/// the current one
///
/// Completion of the outgoing logs is checked first. The new day's agenda is
/// the TOMORROW tasks followed by the scheduled tasks that are due; higher
/// periods start with an empty agenda. Each new document links to its first
/// child, and the open parent of the highest new period gets a link to it.
/// Nothing in `state` changes unless every step succeeds.
///
/// # Arguments
/// * `state` - Planner to advance
/// * `now` - Wall-clock time
/// * `config` - Checking modes and bullet character
pub fn advance_period(
    state: &mut PlannerState,
    now: NaiveDateTime,
    config: &Config,
) -> PlannerResult<Advance> {
    let decision = decide(state.current_date, now)?;
    let next_day = state.current_date + Duration::days(1);
    check_completion(state, decision, config)?;

    if let Ok(agenda) = tasks::extract_agenda(&state.day_log) {
        tracing::info!(
            done = agenda.done_count(),
            undone = agenda.undone_count(),
            blocked = agenda.blocked_count(),
            "closing day {}",
            state.current_date
        );
    }

    let (task_list, tomorrow) =
        tasks::get_tasks_for_tomorrow(&state.task_list, config.tomorrow_checking)?;
    let (task_list, scheduled) = tasks::get_scheduled_tasks(&task_list, next_day)?;
    let day_agenda = format!("{}{}", tomorrow, scheduled);

    let bullet = config.preferred_bullet_char;
    let documents: Vec<(Period, String)> = decision
        .up_to()
        .map(|period| {
            let agenda = if period == Period::Day { day_agenda.as_str() } else { "" };
            (period, build_document(state, period, next_day, agenda, bullet))
        })
        .collect();

    let spliced = match decision.parent() {
        Some(parent) => {
            let marker = parent
                .splice_marker(state.current_date)
                .unwrap_or_default();
            let entry = template::entry_line(bullet, &decision.link(next_day));
            let document =
                template::splice_forward_reference(state.log(parent), parent, &marker, &entry)?;
            Some((parent, document))
        }
        None => None,
    };

    // Commit
    let created: Vec<Period> = documents.iter().map(|(p, _)| *p).collect();
    let superseded: Vec<(Period, String)> = created
        .iter()
        .map(|p| (*p, state.log(*p).to_string()))
        .collect();
    for (period, document) in documents {
        state.set_log(period, document);
    }
    let spliced = spliced.map(|(parent, document)| {
        state.set_log(parent, document);
        parent
    });
    state.task_list = task_list;
    state.current_date = next_day;

    tracing::info!(decision = %decision, next = %next_day, "planner advanced");
    Ok(Advance {
        decision,
        next_date: next_day,
        created,
        spliced,
        superseded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn evening(d: NaiveDate) -> NaiveDateTime {
        d.and_hms_opt(19, 0, 0).unwrap()
    }

    #[test]
    fn test_decision_fixtures() {
        let cases = [
            (date(2012, 12, 5), Period::Day),
            (date(2012, 12, 8), Period::Week),
            (date(2012, 11, 30), Period::Month),
            (date(2012, 3, 31), Period::Quarter),
            (date(2012, 12, 31), Period::Year),
        ];
        for (current, expected) in cases {
            assert_eq!(decide(current, evening(current)).unwrap(), expected, "{}", current);
        }
    }

    #[test]
    fn test_short_weeks_do_not_roll_over() {
        // Sunday March 4: the first week would be March 1-3
        assert_eq!(decide(date(2012, 3, 3), evening(date(2012, 3, 3))).unwrap(), Period::Day);
        // Sunday September 30: the last week would be one day
        assert_eq!(decide(date(2012, 9, 29), evening(date(2012, 9, 29))).unwrap(), Period::Day);
        // Sunday December 30, 2012: two days left
        assert_eq!(decide(date(2012, 12, 29), evening(date(2012, 12, 29))).unwrap(), Period::Day);
    }

    #[test]
    fn test_borderline_weeks() {
        // Sunday May 6, 2012: first week May 1-5 is exactly five days
        assert_eq!(decide(date(2012, 5, 5), evening(date(2012, 5, 5))).unwrap(), Period::Week);
        // Sunday December 27, 2015: last week December 27-31 is five days
        assert_eq!(decide(date(2015, 12, 26), evening(date(2015, 12, 26))).unwrap(), Period::Week);
        // Sunday February 26, 2012: 26-29 is four days
        assert_eq!(decide(date(2012, 2, 25), evening(date(2012, 2, 25))).unwrap(), Period::Day);
    }

    #[test]
    fn test_day_boundaries() {
        let current = date(2012, 12, 5);
        assert_eq!(
            decide(current, current.and_hms_opt(17, 59, 0).unwrap()),
            Err(PlannerError::DayStillInProgress("17:59".into()))
        );
        assert_eq!(decide(current, current.and_hms_opt(18, 0, 0).unwrap()).unwrap(), Period::Day);
        // a past day rolls over at any hour
        assert_eq!(
            decide(current, date(2012, 12, 7).and_hms_opt(8, 0, 0).unwrap()).unwrap(),
            Period::Day
        );
        assert!(matches!(
            decide(current, date(2012, 12, 4).and_hms_opt(20, 0, 0).unwrap()),
            Err(PlannerError::PlannerIsInTheFuture { .. })
        ));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(date(2012, 2, 10)), 29);
        assert_eq!(days_in_month(date(2013, 2, 10)), 28);
        assert_eq!(days_in_month(date(2012, 12, 31)), 31);
        assert_eq!(days_in_month(date(2012, 4, 1)), 30);
    }
}
