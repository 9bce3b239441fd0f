//! Period vocabulary
//!
//! The five nested time periods the planner tracks, together with the names,
//! titles and wiki links used for their documents.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shortest week the planner will create at either end of a month
pub const MIN_WEEK_LENGTH: u32 = 5;

/// A planner period, ordered from shortest to longest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Period {
    /// All periods in ascending order
    pub const ALL: [Period; 5] = [
        Period::Day,
        Period::Week,
        Period::Month,
        Period::Quarter,
        Period::Year,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Quarter => "quarter",
            Period::Year => "year",
        }
    }

    /// The period that contains this one, if any
    pub fn parent(&self) -> Option<Period> {
        match self {
            Period::Day => Some(Period::Week),
            Period::Week => Some(Period::Month),
            Period::Month => Some(Period::Quarter),
            Period::Quarter => Some(Period::Year),
            Period::Year => None,
        }
    }

    /// The period whose documents this one links to
    pub fn child(&self) -> Option<Period> {
        match self {
            Period::Day => None,
            Period::Week => Some(Period::Day),
            Period::Month => Some(Period::Week),
            Period::Quarter => Some(Period::Month),
            Period::Year => Some(Period::Quarter),
        }
    }

    /// Periods from `Day` up to and including `self`
    pub fn up_to(self) -> impl Iterator<Item = Period> {
        Period::ALL.into_iter().filter(move |p| *p <= self)
    }

    /// Heading for the periodic goals block of this period's template
    pub fn goals_heading(&self) -> &'static str {
        match self {
            Period::Day => "DAILYs:",
            Period::Week => "WEEKLYs:",
            Period::Month => "MONTHLYs:",
            Period::Quarter => "QUARTERLYs:",
            Period::Year => "YEARLYs:",
        }
    }

    /// Name of the document for the period starting on `date`
    ///
    /// The name doubles as the wiki link text, so `[[<name>]]` in a parent
    /// document points at this file.
    pub fn document_name(&self, date: NaiveDate) -> String {
        match self {
            Period::Day => date.format("%B %-d, %Y").to_string(),
            Period::Week => format!("Week of {}", date.format("%B %-d, %Y")),
            Period::Month => format!("Month of {}", date.format("%B, %Y")),
            Period::Quarter => format!("Q{} {}", quarter_of(date), date.year()),
            Period::Year => date.year().to_string(),
        }
    }

    /// Wiki link to the document for the period starting on `date`
    pub fn link(&self, date: NaiveDate) -> String {
        format!("[[{}]]", self.document_name(date))
    }

    /// Title line of a fresh document for the period starting on `date`
    pub fn title(&self, date: NaiveDate) -> String {
        let title = match self {
            Period::Day => format!(
                "{} {}",
                weekday_name(date.weekday()),
                date.format("%B %-d, %Y")
            ),
            Period::Week => format!("WEEK OF {}", date.format("%B %-d, %Y")),
            Period::Month => date.format("%B %Y").to_string(),
            Period::Quarter => format!("Q{} {}", quarter_of(date), date.year()),
            Period::Year => date.year().to_string(),
        };
        format!("= {} =", title.to_uppercase())
    }

    /// Text that identifies the most recent forward reference in this
    /// period's document
    ///
    /// Children are listed most recent first, so the first occurrence is
    /// where a new child's entry goes. A week lists days; the marker is the
    /// link of the day being closed.
    pub fn splice_marker(&self, closing_day: NaiveDate) -> Option<String> {
        match self {
            Period::Day => None,
            Period::Week => Some(Period::Day.link(closing_day)),
            Period::Month => Some("[[Week of".to_string()),
            Period::Quarter => Some("[[Month of".to_string()),
            Period::Year => Some("[[Q".to_string()),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "quarter" => Ok(Period::Quarter),
            "year" => Ok(Period::Year),
            _ => Err(format!(
                "Invalid period '{}'. Valid options are: day, week, month, quarter, year",
                s
            )),
        }
    }
}

/// Which checkpoint / periodic-goal template set applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Weekday,
    Weekend,
    Week,
    Month,
    Quarter,
    Year,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 6] = [
        TemplateKind::Weekday,
        TemplateKind::Weekend,
        TemplateKind::Week,
        TemplateKind::Month,
        TemplateKind::Quarter,
        TemplateKind::Year,
    ];

    /// Template set for a document of `period` starting on `date`
    pub fn for_period(period: Period, date: NaiveDate) -> Self {
        match period {
            Period::Day => match date.weekday() {
                Weekday::Sat | Weekday::Sun => TemplateKind::Weekend,
                _ => TemplateKind::Weekday,
            },
            Period::Week => TemplateKind::Week,
            Period::Month => TemplateKind::Month,
            Period::Quarter => TemplateKind::Quarter,
            Period::Year => TemplateKind::Year,
        }
    }

    /// Stem used in template file names
    pub fn file_stem(&self) -> &'static str {
        match self {
            TemplateKind::Weekday => "Weekday",
            TemplateKind::Weekend => "Weekend",
            TemplateKind::Week => "Week",
            TemplateKind::Month => "Month",
            TemplateKind::Quarter => "Quarter",
            TemplateKind::Year => "Year",
        }
    }
}

/// Calendar quarter (1-4) containing `date`
pub fn quarter_of(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

/// Upper-case full weekday name
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
        Weekday::Sun => "SUNDAY",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_ordering() {
        assert!(Period::Day < Period::Week);
        assert!(Period::Quarter < Period::Year);
        let upto: Vec<Period> = Period::Month.up_to().collect();
        assert_eq!(upto, vec![Period::Day, Period::Week, Period::Month]);
    }

    #[test]
    fn test_document_names() {
        let d = date(2012, 12, 9);
        assert_eq!(Period::Day.document_name(d), "December 9, 2012");
        assert_eq!(Period::Week.document_name(d), "Week of December 9, 2012");
        assert_eq!(Period::Month.document_name(d), "Month of December, 2012");
        assert_eq!(Period::Quarter.document_name(d), "Q4 2012");
        assert_eq!(Period::Year.document_name(d), "2012");
        assert_eq!(Period::Week.link(d), "[[Week of December 9, 2012]]");
    }

    #[test]
    fn test_titles() {
        let d = date(2012, 12, 9);
        assert_eq!(Period::Day.title(d), "= SUNDAY DECEMBER 9, 2012 =");
        assert_eq!(Period::Week.title(d), "= WEEK OF DECEMBER 9, 2012 =");
        assert_eq!(Period::Month.title(d), "= DECEMBER 2012 =");
        assert_eq!(Period::Quarter.title(d), "= Q4 2012 =");
        assert_eq!(Period::Year.title(d), "= 2012 =");
    }

    #[test]
    fn test_template_kind_for_day() {
        assert_eq!(
            TemplateKind::for_period(Period::Day, date(2012, 12, 8)),
            TemplateKind::Weekend
        );
        assert_eq!(
            TemplateKind::for_period(Period::Day, date(2012, 12, 10)),
            TemplateKind::Weekday
        );
        assert_eq!(
            TemplateKind::for_period(Period::Quarter, date(2012, 10, 1)),
            TemplateKind::Quarter
        );
    }

    #[test]
    fn test_period_from_str() {
        assert_eq!("Week".parse::<Period>().unwrap(), Period::Week);
        assert!("fortnight".parse::<Period>().is_err());
    }
}
