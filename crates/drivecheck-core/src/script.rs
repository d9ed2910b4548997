//! Grading scripts: a recorded sequence of session actions.
//!
//! Scripts let a practice drive be replayed against a session without a UI,
//! e.g. from the `drivecheck run` command or in tests.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::AssessmentError;
use crate::model::{Answer, TestMode};
use crate::session::Session;

/// One user action against a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    SetMode { mode: TestMode },
    Grade { item: String, answer: Answer },
    /// Grade every item of the active mode that is still unanswered.
    GradeRemaining { answer: Answer },
    Reset,
    Submit,
    Edit,
}

/// A script file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradingScript {
    /// Mode to start in. Defaults to the configured mode.
    #[serde(default)]
    pub mode: Option<TestMode>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// What happened when an action was applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Outcome {
    Applied,
    /// Submit was refused; this many items were still unanswered.
    NotReady { remaining: usize },
}

impl GradingScript {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script: {}", path.display()))?;
        Self::from_str_with_source(&content, path)
    }

    pub fn from_str_with_source(content: &str, source_path: &Path) -> Result<Self> {
        toml::from_str(content)
            .with_context(|| format!("failed to parse script: {}", source_path.display()))
    }

    /// Apply every action in order.
    ///
    /// A refused submit is recorded and the replay continues; any other
    /// error stops the replay.
    pub fn replay(&self, session: &mut Session) -> Result<Vec<Outcome>> {
        if let Some(mode) = self.mode {
            session.set_mode(mode);
        }
        self.actions
            .iter()
            .enumerate()
            .map(|(index, action)| {
                apply(session, action)
                    .with_context(|| format!("action #{} ({action:?}) failed", index + 1))
            })
            .collect()
    }
}

/// Apply a single action to `session`.
pub fn apply(session: &mut Session, action: &Action) -> Result<Outcome, AssessmentError> {
    match action {
        Action::SetMode { mode } => session.set_mode(*mode),
        Action::Grade { item, answer } => session.set_grade(item, *answer)?,
        Action::GradeRemaining { answer } => {
            let pending: Vec<String> = session
                .definition()
                .item_ids()
                .filter(|id| !session.grade(id).is_answered())
                .map(String::from)
                .collect();
            for id in pending {
                session.set_grade(&id, *answer)?;
            }
        }
        Action::Reset => session.reset_mode(),
        Action::Submit => match session.submit() {
            Ok(()) => {}
            Err(AssessmentError::NotReady { remaining }) => {
                return Ok(Outcome::NotReady { remaining })
            }
            Err(e) => return Err(e),
        },
        Action::Edit => session.edit(),
    }
    Ok(Outcome::Applied)
}
