//! Wiki Planner Library
//!
//! This library maintains a personal planner kept as plain-text wiki
//! documents: one log per active day, week, month, quarter and year, a task
//! list, and checkpoint / periodic-goal templates for each kind of period.
//! It resolves the dates attached to deferred tasks, moves those tasks
//! between the task list and the logs, and rolls the logs forward across
//! period boundaries.
//!
//! # Architecture
//!
//! The library follows a 3-layer architecture:
//! - **Engine Layer**: `dates`, `tasks`, `template`, `advance` - Pure text
//!   transformations over in-memory documents
//! - **Domain Layer**: `planner` - The `PlannerState` aggregate and its
//!   schedule / advance / simulate operations
//! - **Persistence Layer**: `storage` and `git_ops` - Wiki directory with a
//!   pointer record, plus optional git snapshots
//!
//! # Example
//!
//! ```no_run
//! use wiki_planner::{Config, WikiStore};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let store = WikiStore::new("wiki");
//!     let mut state = store.load()?;
//!     let now = chrono::Local::now().naive_local();
//!     let advance = state.run(now, &Config::default())?;
//!     store.save_advance(&state, &advance)?;
//!     Ok(())
//! }
//! ```

pub mod advance;
pub mod config;
pub mod dates;
pub mod error;
pub mod git_ops;
pub mod period;
pub mod planner;
pub mod storage;
pub mod tasks;
pub mod template;
pub mod wiki;

// Re-export commonly used types
pub use advance::{Advance, advance_period, decide};
pub use config::{CheckingMode, Config, ScheduleMode};
pub use dates::{ResolvedDate, resolve};
pub use error::{Outcome, PlannerError, PlannerResult, Severity};
pub use git_ops::GitOps;
pub use period::{Period, TemplateKind};
pub use planner::{PlannerState, TemplateSources};
pub use storage::{PointerRecord, WikiStore};
pub use tasks::Agenda;
