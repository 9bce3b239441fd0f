//! Filesystem wiki store
//!
//! Documents live as `<name>.wiki` files in one directory. Which documents
//! are current is recorded in `planner.toml`, written after all documents
//! so a failed save never points at a missing file.

use crate::advance::Advance;
use crate::error::PlannerError;
use crate::period::{Period, TemplateKind};
use crate::planner::{PlannerState, TemplateSources};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const POINTER_FILE: &str = "planner.toml";
pub const TASKS_DOCUMENT: &str = "Tasks";
pub const DAY_THEMES_DOCUMENT: &str = "Day_Themes";
const EXTENSION: &str = "wiki";
const TASK_LIST_SKELETON: &str = "TOMORROW:\n\nSCHEDULED:\n";

/// Current document for each period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerRecord {
    pub current_date: NaiveDate,
    pub day: String,
    pub week: String,
    pub month: String,
    pub quarter: String,
    pub year: String,
}

impl PointerRecord {
    /// Pointers to fresh documents for every period starting on `date`
    pub fn starting(date: NaiveDate) -> Self {
        Self {
            current_date: date,
            day: Period::Day.document_name(date),
            week: Period::Week.document_name(date),
            month: Period::Month.document_name(date),
            quarter: Period::Quarter.document_name(date),
            year: Period::Year.document_name(date),
        }
    }

    pub fn get(&self, period: Period) -> &str {
        match period {
            Period::Day => &self.day,
            Period::Week => &self.week,
            Period::Month => &self.month,
            Period::Quarter => &self.quarter,
            Period::Year => &self.year,
        }
    }

    pub fn set(&mut self, period: Period, name: String) {
        let slot = match period {
            Period::Day => &mut self.day,
            Period::Week => &mut self.week,
            Period::Month => &mut self.month,
            Period::Quarter => &mut self.quarter,
            Period::Year => &mut self.year,
        };
        *slot = name;
    }
}

pub struct WikiStore {
    root: PathBuf,
}

impl WikiStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document with the given name
    pub fn document_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, EXTENSION))
    }

    pub fn checkpoints_name(kind: TemplateKind) -> String {
        format!("Checkpoints_{}", kind.file_stem())
    }

    pub fn periodic_goals_name(kind: TemplateKind) -> String {
        format!("Periodic_{}", kind.file_stem())
    }

    pub fn load_pointers(&self) -> Result<PointerRecord> {
        let path = self.root.join(POINTER_FILE);
        let content = fs::read_to_string(&path).with_context(|| {
            format!(
                "Failed to read {}; run `planner init` first",
                path.display()
            )
        })?;
        let pointers: PointerRecord = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(pointers)
    }

    fn save_pointers(&self, pointers: &PointerRecord) -> Result<PathBuf> {
        let path = self.root.join(POINTER_FILE);
        let content = toml::to_string_pretty(pointers)?;
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    fn read_document(&self, name: &str) -> Result<String> {
        let path = self.document_path(name);
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    fn read_optional(&self, name: &str) -> Result<Option<String>> {
        let path = self.document_path(name);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(self.read_document(name)?))
    }

    fn write_document(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.document_path(name);
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), "wrote document");
        Ok(path)
    }

    /// Write a document only if its content differs from what is on disk
    fn write_if_changed(&self, name: &str, content: &str) -> Result<Option<PathBuf>> {
        if self.read_optional(name)?.as_deref() == Some(content) {
            return Ok(None);
        }
        self.write_document(name, content).map(Some)
    }

    fn load_templates(&self) -> Result<HashMap<TemplateKind, TemplateSources>> {
        let mut templates = HashMap::new();
        for kind in TemplateKind::ALL {
            let sources = TemplateSources {
                checkpoints: self
                    .read_optional(&Self::checkpoints_name(kind))?
                    .unwrap_or_default(),
                periodic_goals: self
                    .read_optional(&Self::periodic_goals_name(kind))?
                    .unwrap_or_default(),
            };
            templates.insert(kind, sources);
        }
        Ok(templates)
    }

    /// Load every document the engine needs
    pub fn load(&self) -> Result<PlannerState> {
        let pointers = self.load_pointers()?;
        let mut state = PlannerState::new(pointers.current_date);
        state.task_list = self.read_document(TASKS_DOCUMENT)?;
        for period in Period::ALL {
            let document = self
                .read_document(pointers.get(period))
                .with_context(|| format!("Current {} log is missing", period))?;
            state.set_log(period, document);
        }
        state.templates = self.load_templates()?;
        state.day_themes = self.read_optional(DAY_THEMES_DOCUMENT)?;
        Ok(state)
    }

    /// Load only what `planner init` needs: the task list and templates
    pub fn load_sources(&self, start: NaiveDate) -> Result<PlannerState> {
        let mut state = PlannerState::new(start);
        state.task_list = self
            .read_optional(TASKS_DOCUMENT)?
            .unwrap_or_else(|| TASK_LIST_SKELETON.to_string());
        state.templates = self.load_templates()?;
        state.day_themes = self.read_optional(DAY_THEMES_DOCUMENT)?;
        Ok(state)
    }

    /// Make sure none of the documents an advance creates exists yet
    pub fn check_new_documents(&self, advance: &Advance) -> Result<()> {
        for period in &advance.created {
            let name = period.document_name(advance.next_date);
            let path = self.document_path(&name);
            if path.exists() {
                return Err(PlannerError::PlannerState(format!(
                    "{} log '{}' already exists",
                    period,
                    path.display()
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Persist the result of an advance
    ///
    /// Superseded documents are written back first (scheduling may have
    /// changed them), then the new documents, the spliced parent, the task
    /// list and finally the pointer record.
    ///
    /// # Returns
    /// Paths of every file written
    pub fn save_advance(&self, state: &PlannerState, advance: &Advance) -> Result<Vec<PathBuf>> {
        let mut pointers = self.load_pointers()?;
        self.check_new_documents(advance)?;

        let mut written = Vec::new();
        for (period, document) in &advance.superseded {
            written.extend(self.write_if_changed(pointers.get(*period), document)?);
        }
        for period in &advance.created {
            let name = period.document_name(advance.next_date);
            written.push(self.write_document(&name, state.log(*period))?);
            pointers.set(*period, name);
        }
        if let Some(parent) = advance.spliced {
            written.push(self.write_document(pointers.get(parent), state.log(parent))?);
        }
        written.extend(self.write_if_changed(TASKS_DOCUMENT, &state.task_list)?);

        pointers.current_date = advance.next_date;
        written.push(self.save_pointers(&pointers)?);
        Ok(written)
    }

    /// Persist the task list and current day log after scheduling
    pub fn save_scheduled(&self, state: &PlannerState) -> Result<Vec<PathBuf>> {
        let pointers = self.load_pointers()?;
        let mut written = Vec::new();
        written.extend(self.write_if_changed(TASKS_DOCUMENT, &state.task_list)?);
        written.extend(self.write_if_changed(pointers.get(Period::Day), &state.day_log)?);
        Ok(written)
    }

    /// Write a freshly initialized planner
    ///
    /// Fails without writing anything if a pointer record or any of the new
    /// documents already exists.
    pub fn save_initialized(&self, state: &PlannerState) -> Result<Vec<PathBuf>> {
        let pointers = PointerRecord::starting(state.current_date);
        if self.root.join(POINTER_FILE).exists() {
            return Err(PlannerError::PlannerState(format!(
                "a planner already exists in {}",
                self.root.display()
            ))
            .into());
        }
        for period in Period::ALL {
            if self.document_path(pointers.get(period)).exists() {
                return Err(PlannerError::PlannerState(format!(
                    "{} log '{}' already exists",
                    period,
                    pointers.get(period)
                ))
                .into());
            }
        }

        let mut written = Vec::new();
        for period in Period::ALL {
            written.push(self.write_document(pointers.get(period), state.log(period))?);
        }
        written.extend(self.write_if_changed(TASKS_DOCUMENT, &state.task_list)?);
        written.push(self.save_pointers(&pointers)?);
        Ok(written)
    }
}
