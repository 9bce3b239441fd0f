//! Error taxonomy for the planner engine
//!
//! Every failure the engine can report is a [`PlannerError`]. Errors carry a
//! [`Severity`]: recoverable ones can be retried by the caller after relaxing
//! the configuration or finishing a log, fatal ones abort the invocation.
//! The engine itself never retries and never leaves a partial rewrite behind.

use crate::period::Period;
use thiserror::Error;

/// Result alias used throughout the engine
pub type PlannerResult<T> = Result<T, PlannerError>;

/// How a caller should treat a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Abort this invocation
    Fatal,
    /// Retry after relaxing checks or completing the offending document
    Recoverable,
}

/// Errors produced by the date resolver, task migrator, template builder and
/// period advancer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    #[error("date format not recognized: '{0}'")]
    DateFormat(String),

    #[error("relative date '{0}' needs a reference date")]
    RelativeDate(String),

    #[error("blocked task is not scheduled: {0}")]
    BlockedTaskNotScheduled(String),

    #[error("task list is missing the {0} section")]
    TasklistLayout(String),

    #[error("log file is missing the {0} section")]
    LogfileLayout(String),

    #[error("could not find '{marker}' in the {period} log to insert a forward reference")]
    TemplateLayout { period: Period, marker: String },

    #[error("no tasks found under TOMORROW in the task list")]
    TomorrowIsEmpty,

    #[error("the {0} log has no NOTES; complete it before advancing")]
    LogfileNotCompleted(Period),

    #[error("the day is still in progress ({0}); try again after 18:00")]
    DayStillInProgress(String),

    #[error("planner is at {planner} but it is only {today}")]
    PlannerIsInTheFuture { planner: String, today: String },

    #[error("planner state conflict: {0}")]
    PlannerState(String),
}

impl PlannerError {
    /// Classify this error for the caller's retry policy
    pub fn severity(&self) -> Severity {
        match self {
            PlannerError::TomorrowIsEmpty | PlannerError::LogfileNotCompleted(_) => {
                Severity::Recoverable
            }
            _ => Severity::Fatal,
        }
    }

    /// Check if the caller may relax checks and retry
    pub fn is_recoverable(&self) -> bool {
        self.severity() == Severity::Recoverable
    }
}

/// A failure tagged with how the caller should handle it
///
/// Built from a [`PlannerError`] so callers can pattern-match on the policy
/// instead of inspecting individual variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Fatal(PlannerError),
    Recoverable(PlannerError),
}

impl From<PlannerError> for Outcome {
    fn from(err: PlannerError) -> Self {
        match err.severity() {
            Severity::Fatal => Outcome::Fatal(err),
            Severity::Recoverable => Outcome::Recoverable(err),
        }
    }
}

impl Outcome {
    /// The underlying error, regardless of severity
    pub fn error(&self) -> &PlannerError {
        match self {
            Outcome::Fatal(e) | Outcome::Recoverable(e) => e,
        }
    }

    /// Hint shown to the user for recoverable failures
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Outcome::Fatal(_) => None,
            Outcome::Recoverable(PlannerError::TomorrowIsEmpty) => Some(
                "Add tasks under TOMORROW in the task list, or rerun with --lax-tomorrow",
            ),
            Outcome::Recoverable(_) => {
                Some("Write something under NOTES in the log, or rerun with --lax")
            }
        }
    }
}
