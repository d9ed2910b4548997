//! Assessment error types.
//!
//! These errors are returned by the session store, the catalog and the
//! session registry. None of them is fatal: each one leaves the state it
//! was raised against untouched.

use thiserror::Error;
use uuid::Uuid;

use crate::model::TestMode;

/// Errors that can occur while building a catalog or grading a session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssessmentError {
    /// A grade was set for an item that is not part of the active mode's checklist.
    #[error("unknown checklist item '{item_id}' for mode {mode}")]
    UnknownItem { item_id: String, mode: TestMode },

    /// Submit was requested before every item was graded.
    #[error("answer {remaining} more")]
    NotReady { remaining: usize },

    /// A test mode outside `G2`/`G` was requested.
    #[error("unknown test mode: {0}")]
    UnknownMode(String),

    /// A mode-specific extra names a category the catalog does not declare.
    #[error("unknown checklist category: {0}")]
    UnknownCategory(String),

    /// Two items in one mode's checklist share an id.
    #[error("duplicate checklist item '{item_id}' in mode {mode}")]
    DuplicateItem { item_id: String, mode: TestMode },

    /// The pass threshold is outside `[0, 100]`.
    #[error("pass threshold must be between 0 and 100, got {0}")]
    InvalidThreshold(f64),

    /// No session is registered under this id.
    #[error("no session with id {0}")]
    UnknownSession(Uuid),
}

impl AssessmentError {
    /// Returns `true` if the message is meant for the person doing the grading
    /// rather than for the calling code.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, AssessmentError::NotReady { .. })
    }

    /// Number of items still to grade, for `NotReady`.
    pub fn remaining(&self) -> Option<usize> {
        match self {
            AssessmentError::NotReady { remaining } => Some(*remaining),
            _ => None,
        }
    }
}
