//! Date expression resolution
//!
//! Turns the free-form date annotations found on blocked tasks
//! (`DECEMBER 12`, `next week`, `WED`, `12/09/2012`, ...) into a concrete
//! [`NaiveDate`] plus a canonical string that re-parses to the same date.
//!
//! Grammars are kept in an ordered table, [`GRAMMARS`]. Each entry is a pure
//! matcher from the normalized expression to [`Parsed`] components; the
//! first matcher that accepts the expression wins. Resolution of relative
//! components against the reference date happens afterwards in [`resolve`].

use crate::error::{PlannerError, PlannerResult};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

// ── Regex patterns ──────────────────────────────────────────────────────

static RE_MONTH_DAY_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]+) (\d{1,2}),? ?(\d{4})$").unwrap());

static RE_DAY_MONTH_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}) ([A-Z]+),? ?(\d{4})$").unwrap());

static RE_MONTH_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]+) (\d{1,2})$").unwrap());

static RE_DAY_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}) ([A-Z]+)$").unwrap());

static RE_MONTH_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]+),? ?(\d{4})$").unwrap());

static RE_MONTH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([A-Z]+)$").unwrap());

static RE_SLASHED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").unwrap());

static RE_DASHED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})-(\d{2})-(\d{4})$").unwrap());

const MONTH_NAMES: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

const WEEKDAYS: [(&str, Weekday); 7] = [
    ("MONDAY", Weekday::Mon),
    ("TUESDAY", Weekday::Tue),
    ("WEDNESDAY", Weekday::Wed),
    ("THURSDAY", Weekday::Thu),
    ("FRIDAY", Weekday::Fri),
    ("SATURDAY", Weekday::Sat),
    ("SUNDAY", Weekday::Sun),
];

const WEEK_OF_PREFIX: &str = "WEEK OF ";

// ── Types ───────────────────────────────────────────────────────────────

/// A date expression resolved to a concrete date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDate {
    pub date: NaiveDate,
    /// Canonical rendering, e.g. `DECEMBER 12, 2012` or
    /// `WEEK OF DECEMBER 9, 2012`
    pub canonical: String,
}

impl fmt::Display for ResolvedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

/// Components extracted by a grammar matcher, before resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parsed {
    /// Fully specified calendar date
    Date { year: i32, month: u32, day: u32 },
    /// Month and day; the year comes from the reference date
    MonthDay { month: u32, day: u32 },
    /// The week containing a date, optionally without a year
    WeekOf {
        year: Option<i32>,
        month: u32,
        day: u32,
    },
    /// First of a month, optionally without a year
    Month { year: Option<i32>, month: u32 },
    Tomorrow,
    NextWeek,
    NextMonth,
    Weekday(Weekday),
}

/// One entry of the grammar table
pub struct Grammar {
    pub name: &'static str,
    pub matcher: fn(&str) -> Option<Parsed>,
}

/// Supported grammars in priority order
pub const GRAMMARS: &[Grammar] = &[
    Grammar { name: "MONTH DD, YYYY", matcher: month_day_year },
    Grammar { name: "DD MONTH, YYYY", matcher: day_month_year },
    Grammar { name: "MONTH DD", matcher: month_day },
    Grammar { name: "DD MONTH", matcher: day_month },
    Grammar { name: "WEEK OF MONTH DD, YYYY", matcher: week_of_month_day_year },
    Grammar { name: "WEEK OF DD MONTH, YYYY", matcher: week_of_day_month_year },
    Grammar { name: "WEEK OF MONTH DD", matcher: week_of_month_day },
    Grammar { name: "WEEK OF DD MONTH", matcher: week_of_day_month },
    Grammar { name: "MONTH, YYYY", matcher: month_year },
    Grammar { name: "MONTH", matcher: month_only },
    Grammar { name: "MM/DD/YYYY", matcher: slashed },
    Grammar { name: "MM-DD-YYYY", matcher: dashed },
    Grammar { name: "TOMORROW", matcher: tomorrow },
    Grammar { name: "NEXT WEEK", matcher: next_week },
    Grammar { name: "NEXT MONTH", matcher: next_month },
    Grammar { name: "WEEKDAY", matcher: weekday_full },
    Grammar { name: "WKD", matcher: weekday_abbreviated },
];

// ── Matchers ────────────────────────────────────────────────────────────

/// Month number (1-12) for a full or 3-letter month name
fn month_number(word: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|name| *name == word || (word.len() == 3 && name.starts_with(word)))
        .map(|i| i as u32 + 1)
}

fn number<T: std::str::FromStr>(text: &str) -> Option<T> {
    text.parse().ok()
}

fn month_day_year(s: &str) -> Option<Parsed> {
    let caps = RE_MONTH_DAY_YEAR.captures(s)?;
    Some(Parsed::Date {
        month: month_number(&caps[1])?,
        day: number(&caps[2])?,
        year: number(&caps[3])?,
    })
}

fn day_month_year(s: &str) -> Option<Parsed> {
    let caps = RE_DAY_MONTH_YEAR.captures(s)?;
    Some(Parsed::Date {
        day: number(&caps[1])?,
        month: month_number(&caps[2])?,
        year: number(&caps[3])?,
    })
}

fn month_day(s: &str) -> Option<Parsed> {
    let caps = RE_MONTH_DAY.captures(s)?;
    Some(Parsed::MonthDay {
        month: month_number(&caps[1])?,
        day: number(&caps[2])?,
    })
}

fn day_month(s: &str) -> Option<Parsed> {
    let caps = RE_DAY_MONTH.captures(s)?;
    Some(Parsed::MonthDay {
        day: number(&caps[1])?,
        month: month_number(&caps[2])?,
    })
}

/// Apply a plain date matcher to the remainder of a `WEEK OF` expression
fn week_of(s: &str, matcher: fn(&str) -> Option<Parsed>) -> Option<Parsed> {
    match matcher(s.strip_prefix(WEEK_OF_PREFIX)?)? {
        Parsed::Date { year, month, day } => Some(Parsed::WeekOf {
            year: Some(year),
            month,
            day,
        }),
        Parsed::MonthDay { month, day } => Some(Parsed::WeekOf {
            year: None,
            month,
            day,
        }),
        _ => None,
    }
}

fn week_of_month_day_year(s: &str) -> Option<Parsed> {
    week_of(s, month_day_year)
}

fn week_of_day_month_year(s: &str) -> Option<Parsed> {
    week_of(s, day_month_year)
}

fn week_of_month_day(s: &str) -> Option<Parsed> {
    week_of(s, month_day)
}

fn week_of_day_month(s: &str) -> Option<Parsed> {
    week_of(s, day_month)
}

fn month_year(s: &str) -> Option<Parsed> {
    let caps = RE_MONTH_YEAR.captures(s)?;
    Some(Parsed::Month {
        month: month_number(&caps[1])?,
        year: Some(number(&caps[2])?),
    })
}

fn month_only(s: &str) -> Option<Parsed> {
    let caps = RE_MONTH.captures(s)?;
    Some(Parsed::Month {
        month: month_number(&caps[1])?,
        year: None,
    })
}

fn numeric(re: &Regex, s: &str) -> Option<Parsed> {
    let caps = re.captures(s)?;
    Some(Parsed::Date {
        month: number(&caps[1])?,
        day: number(&caps[2])?,
        year: number(&caps[3])?,
    })
}

fn slashed(s: &str) -> Option<Parsed> {
    numeric(&RE_SLASHED, s)
}

fn dashed(s: &str) -> Option<Parsed> {
    numeric(&RE_DASHED, s)
}

fn tomorrow(s: &str) -> Option<Parsed> {
    (s == "TOMORROW").then_some(Parsed::Tomorrow)
}

fn next_week(s: &str) -> Option<Parsed> {
    (s == "NEXT WEEK").then_some(Parsed::NextWeek)
}

fn next_month(s: &str) -> Option<Parsed> {
    (s == "NEXT MONTH").then_some(Parsed::NextMonth)
}

fn weekday_full(s: &str) -> Option<Parsed> {
    WEEKDAYS
        .iter()
        .find(|(name, _)| *name == s)
        .map(|(_, day)| Parsed::Weekday(*day))
}

fn weekday_abbreviated(s: &str) -> Option<Parsed> {
    if s.len() != 3 {
        return None;
    }
    WEEKDAYS
        .iter()
        .find(|(name, _)| name.starts_with(s))
        .map(|(_, day)| Parsed::Weekday(*day))
}

// ── Resolution ──────────────────────────────────────────────────────────

/// Upper-case and collapse whitespace so matchers see one shape
fn normalize(expression: &str) -> String {
    expression
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Find the first grammar accepting `expression`
///
/// # Returns
/// The grammar name and the parsed components, or None if nothing matches
pub fn match_expression(expression: &str) -> Option<(&'static str, Parsed)> {
    let normalized = normalize(expression);
    GRAMMARS
        .iter()
        .find_map(|g| (g.matcher)(&normalized).map(|parsed| (g.name, parsed)))
}

/// Resolve a date expression to a concrete date and canonical string
///
/// # Arguments
/// * `expression` - Raw date expression, case-insensitive
/// * `reference` - Date that relative expressions are resolved against
///
/// # Returns
/// The resolved date, or `DateFormat` if no grammar matches (or the
/// components name an impossible date) and `RelativeDate` if a relative
/// expression is given without a reference
pub fn resolve(expression: &str, reference: Option<NaiveDate>) -> PlannerResult<ResolvedDate> {
    let (grammar, parsed) = match_expression(expression)
        .ok_or_else(|| PlannerError::DateFormat(expression.trim().to_string()))?;

    let invalid = || PlannerError::DateFormat(expression.trim().to_string());
    let anchor = || {
        reference.ok_or_else(|| PlannerError::RelativeDate(expression.trim().to_string()))
    };

    let resolved = match parsed {
        Parsed::Date { year, month, day } => {
            plain(NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?)
        }
        Parsed::MonthDay { month, day } => {
            plain(infer_year(month, day, anchor()?).ok_or_else(invalid)?)
        }
        Parsed::WeekOf { year, month, day } => {
            let named = match year {
                Some(y) => NaiveDate::from_ymd_opt(y, month, day),
                None => infer_year(month, day, anchor()?),
            }
            .ok_or_else(invalid)?;
            week_of_date(named)
        }
        Parsed::Month { year, month } => {
            let first = match year {
                Some(y) => NaiveDate::from_ymd_opt(y, month, 1),
                None => infer_year(month, 1, anchor()?),
            }
            .ok_or_else(invalid)?;
            plain(first)
        }
        Parsed::Tomorrow => plain(anchor()? + Duration::days(1)),
        Parsed::NextWeek => {
            let sunday = first_after(anchor()?, 7, |d| d.weekday() == Weekday::Sun)
                .ok_or_else(invalid)?;
            week_of_date(sunday)
        }
        Parsed::NextMonth => plain(
            first_after(anchor()?, 31, |d| d.day() == 1).ok_or_else(invalid)?,
        ),
        Parsed::Weekday(target) => plain(
            first_after(anchor()?, 7, |d| d.weekday() == target)
                .ok_or_else(invalid)?,
        ),
    };

    tracing::trace!(expression, grammar, canonical = %resolved.canonical, "resolved date");
    Ok(resolved)
}

/// Soonest date with this month and day that is not before `reference`
///
/// February 29 can be up to eight years away (across a skipped century
/// leap year), so that many years are tried.
fn infer_year(month: u32, day: u32, reference: NaiveDate) -> Option<NaiveDate> {
    (0..=8)
        .filter_map(|offset| NaiveDate::from_ymd_opt(reference.year() + offset, month, day))
        .find(|d| *d >= reference)
}

/// First date in the `window` days after `reference` satisfying `pred`
fn first_after(
    reference: NaiveDate,
    window: i64,
    pred: impl Fn(NaiveDate) -> bool,
) -> Option<NaiveDate> {
    (1..=window)
        .map(|i| reference + Duration::days(i))
        .find(|d| pred(*d))
}

/// Start of the week containing `date`: the Sunday on or before it, except
/// that the 1st of a month stands for itself
pub fn week_start(date: NaiveDate) -> NaiveDate {
    if date.day() == 1 {
        return date;
    }
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

fn canonical_date(date: NaiveDate) -> String {
    format!(
        "{} {}, {}",
        MONTH_NAMES[date.month0() as usize],
        date.day(),
        date.year()
    )
}

fn plain(date: NaiveDate) -> ResolvedDate {
    ResolvedDate {
        date,
        canonical: canonical_date(date),
    }
}

fn week_of_date(named: NaiveDate) -> ResolvedDate {
    let date = week_start(named);
    ResolvedDate {
        date,
        canonical: format!("{}{}", WEEK_OF_PREFIX, canonical_date(date)),
    }
}
