//! The planner aggregate
//!
//! [`PlannerState`] holds every document an invocation works on, fully
//! loaded in memory. The engine rewrites these buffers; persisting them is
//! left to the caller.

use crate::advance::{self, Advance};
use crate::config::{Config, ScheduleMode};
use crate::error::PlannerResult;
use crate::period::{Period, TemplateKind};
use crate::tasks;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;

/// Checkpoint and periodic-goal sources for one template kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSources {
    pub checkpoints: String,
    pub periodic_goals: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerState {
    /// The day the planner currently represents
    pub current_date: NaiveDate,
    pub task_list: String,
    pub day_log: String,
    pub week_log: String,
    pub month_log: String,
    pub quarter_log: String,
    pub year_log: String,
    pub templates: HashMap<TemplateKind, TemplateSources>,
    pub day_themes: Option<String>,
}

impl PlannerState {
    /// Create a planner at `current_date` with empty documents
    pub fn new(current_date: NaiveDate) -> Self {
        Self {
            current_date,
            task_list: String::new(),
            day_log: String::new(),
            week_log: String::new(),
            month_log: String::new(),
            quarter_log: String::new(),
            year_log: String::new(),
            templates: HashMap::new(),
            day_themes: None,
        }
    }

    /// Current document for a period
    pub fn log(&self, period: Period) -> &str {
        match period {
            Period::Day => &self.day_log,
            Period::Week => &self.week_log,
            Period::Month => &self.month_log,
            Period::Quarter => &self.quarter_log,
            Period::Year => &self.year_log,
        }
    }

    /// Replace the current document for a period
    pub fn set_log(&mut self, period: Period, document: String) {
        let slot = match period {
            Period::Day => &mut self.day_log,
            Period::Week => &mut self.week_log,
            Period::Month => &mut self.month_log,
            Period::Quarter => &mut self.quarter_log,
            Period::Year => &mut self.year_log,
        };
        *slot = document;
    }

    /// Template sources for a kind; missing sources are empty
    pub fn template(&self, kind: TemplateKind) -> TemplateSources {
        self.templates.get(&kind).cloned().unwrap_or_default()
    }

    /// Normalize blocked tasks and gather them under SCHEDULED
    pub fn schedule_tasks(&mut self) -> PlannerResult<()> {
        let (task_list, day_log) =
            tasks::schedule_tasks(&self.task_list, &self.day_log, self.current_date)?;
        self.task_list = task_list;
        self.day_log = day_log;
        Ok(())
    }

    /// Roll the planner forward to `now`; see [`advance::advance_period`]
    pub fn advance(&mut self, now: NaiveDateTime, config: &Config) -> PlannerResult<Advance> {
        advance::advance_period(self, now, config)
    }

    /// Schedule tasks, then advance, committing only if both succeed
    ///
    /// Scheduling is skipped when the schedule mode is `off`.
    pub fn run(&mut self, now: NaiveDateTime, config: &Config) -> PlannerResult<Advance> {
        let mut next = self.clone();
        if config.schedule_mode == ScheduleMode::Standard {
            next.schedule_tasks()?;
        }
        let advance = next.advance(now, config)?;
        *self = next;
        Ok(advance)
    }

    /// Run the full pipeline on a disposable copy
    ///
    /// # Returns
    /// The would-be state and advance; `self` is left untouched
    pub fn simulate(&self, now: NaiveDateTime, config: &Config) -> PlannerResult<(Self, Advance)> {
        let mut copy = self.clone();
        let advance = copy.run(now, config)?;
        Ok((copy, advance))
    }
}
