//! Integration tests for date resolution and task scheduling

mod common;

use chrono::{Datelike, Duration, Weekday};
use common::*;
use wiki_planner::tasks::{get_scheduled_tasks, schedule_tasks};
use wiki_planner::{PlannerError, resolve};

const EXPRESSIONS: [&str; 10] = [
    "tomorrow",
    "next week",
    "next month",
    "sat",
    "Thursday",
    "DEC 25",
    "3 june",
    "week of jan 6",
    "12/20/2012",
    "MARCH",
];

// 正規化した日付をもう一度解決しても同じ結果になる
#[test]
fn test_canonical_forms_resolve_to_themselves() {
    let mut reference = date(2012, 1, 1);
    while reference.year() == 2012 {
        for expression in EXPRESSIONS {
            let resolved = resolve(expression, Some(reference)).unwrap();
            let again = resolve(&resolved.canonical, Some(reference)).unwrap();
            assert_eq!(again, resolved, "{} on {}", expression, reference);
        }
        reference += Duration::days(11);
    }
}

#[test]
fn test_weekday_is_one_to_seven_days_ahead() {
    let reference = date(2012, 12, 5);
    for (name, weekday) in [
        ("mon", Weekday::Mon),
        ("tue", Weekday::Tue),
        ("wed", Weekday::Wed),
        ("thu", Weekday::Thu),
        ("fri", Weekday::Fri),
        ("sat", Weekday::Sat),
        ("sun", Weekday::Sun),
    ] {
        let resolved = resolve(name, Some(reference)).unwrap();
        let ahead = (resolved.date - reference).num_days();
        assert!((1..=7).contains(&ahead), "{} is {} days ahead", name, ahead);
        assert_eq!(resolved.date.weekday(), weekday);
    }
    // the same weekday is a full week away
    assert_eq!(resolve("wednesday", Some(reference)).unwrap().date, date(2012, 12, 12));
}

#[test]
fn test_relative_dates_need_a_reference() {
    assert_eq!(
        resolve("tomorrow", None),
        Err(PlannerError::RelativeDate("tomorrow".into()))
    );
    assert_eq!(resolve("DECEMBER 9, 2012", None).unwrap().date, date(2012, 12, 9));
    assert!(matches!(
        resolve("someday", Some(date(2012, 12, 5))),
        Err(PlannerError::DateFormat(_))
    ));
}

// 予定タスクは日付順ではなく元の順序で取り出される
#[test]
fn test_schedule_then_take_due_tasks() {
    let task_list = "TOMORROW:\n[ ] buy milk\n[o] pick up parcel [sat]\n\nSCHEDULED:\n[o] renew passport [next month]\n[o] dentist [12/07/2012]\n";
    let day_log = "AGENDA:\n[o] call plumber [tomorrow]\n\tabout the sink\n[x] groceries\n\nNOTES:\n";

    let (task_list, day_log) = schedule_tasks(task_list, day_log, date(2012, 12, 5)).unwrap();
    assert_eq!(day_log, "AGENDA:\n[x] groceries\n\nNOTES:\n");
    assert_eq!(
        schedule_tasks(&task_list, &day_log, date(2012, 12, 5)).unwrap(),
        (task_list.clone(), day_log.clone())
    );

    let (rest, due) = get_scheduled_tasks(&task_list, date(2012, 12, 7)).unwrap();
    assert_eq!(
        due,
        "[o] dentist [$DECEMBER 7, 2012$]\n[o] call plumber [$DECEMBER 6, 2012$]\n\tabout the sink\n"
    );
    assert!(rest.ends_with(
        "SCHEDULED:\n[o] renew passport [$JANUARY 1, 2013$]\n[o] pick up parcel [$DECEMBER 8, 2012$]\n"
    ));
}
