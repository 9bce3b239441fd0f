//! Common test utilities for integration tests

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;
use wiki_planner::{
    Config, Period, PlannerState, TemplateKind, TemplateSources, WikiStore, advance,
};

pub const TASK_LIST: &str = "TOMORROW:\n[ ] buy milk\n\nTHIS WEEK:\n[ ] file taxes\n\nSCHEDULED:\n[o] dentist [$DECEMBER 20, 2012$]\n";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 19:00 on the given day, after the day has ended
pub fn evening(d: NaiveDate) -> NaiveDateTime {
    d.and_hms_opt(19, 0, 0).unwrap()
}

/// Template sources for every kind; kinds without content are empty
pub fn sample_templates() -> HashMap<TemplateKind, TemplateSources> {
    let mut templates: HashMap<TemplateKind, TemplateSources> = TemplateKind::ALL
        .into_iter()
        .map(|kind| (kind, TemplateSources::default()))
        .collect();
    templates.insert(
        TemplateKind::Weekday,
        TemplateSources {
            checkpoints: "[ ] 7:00am wake up\n[ ] 10:00pm sleep\n".to_string(),
            periodic_goals: "[ ] exercise\n".to_string(),
        },
    );
    templates.insert(
        TemplateKind::Weekend,
        TemplateSources {
            checkpoints: "[ ] 9:00am wake up\n".to_string(),
            periodic_goals: "[ ] rest\n".to_string(),
        },
    );
    templates.insert(
        TemplateKind::Week,
        TemplateSources {
            checkpoints: String::new(),
            periodic_goals: "[ ] review finances\n".to_string(),
        },
    );
    templates
}

/// Planner started on `start` with the sample task list and templates
pub fn sample_planner(start: NaiveDate) -> PlannerState {
    let mut state = PlannerState::new(start);
    state.task_list = TASK_LIST.to_string();
    state.templates = sample_templates();
    advance::initialize(&mut state, start, &Config::default());
    state
}

/// Write something under NOTES in the log of `period`
pub fn complete_log(state: &mut PlannerState, period: Period) {
    let document = state.log(period).replacen("NOTES:\n\n", "NOTES:\nall done\n", 1);
    state.set_log(period, document);
}

/// Write something under NOTES in every current log
pub fn complete_logs(state: &mut PlannerState) {
    for period in Period::ALL {
        complete_log(state, period);
    }
}

/// Put a task line at the top of the day log's AGENDA
pub fn add_agenda_task(state: &mut PlannerState, task: &str) {
    state.day_log = state
        .day_log
        .replacen("AGENDA:\n", &format!("AGENDA:\n{}\n", task), 1);
}

/// Create a wiki directory holding the sample task list and templates
pub fn sample_wiki() -> (TempDir, WikiStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = WikiStore::new(temp_dir.path());

    fs::write(store.document_path("Tasks"), TASK_LIST).unwrap();
    for (kind, sources) in sample_templates() {
        if !sources.checkpoints.is_empty() {
            fs::write(
                store.document_path(&WikiStore::checkpoints_name(kind)),
                &sources.checkpoints,
            )
            .unwrap();
        }
        if !sources.periodic_goals.is_empty() {
            fs::write(
                store.document_path(&WikiStore::periodic_goals_name(kind)),
                &sources.periodic_goals,
            )
            .unwrap();
        }
    }
    (temp_dir, store)
}

/// Initialize a planner on `start` inside a sample wiki
pub fn initialized_wiki(start: NaiveDate) -> (TempDir, WikiStore) {
    let (temp_dir, store) = sample_wiki();
    let mut state = store.load_sources(start).unwrap();
    advance::initialize(&mut state, start, &Config::default());
    store.save_initialized(&state).unwrap();
    (temp_dir, store)
}
