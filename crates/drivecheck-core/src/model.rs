//! Core data model types for drivecheck.
//!
//! These are the checklist shapes handed out by the catalog and the grade
//! values recorded against them by a session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AssessmentError;

/// The two license-test contexts a checklist can be run for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TestMode {
    G2,
    G,
}

impl TestMode {
    /// Every supported mode, in display order.
    pub const ALL: [TestMode; 2] = [TestMode::G2, TestMode::G];
}

impl fmt::Display for TestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestMode::G2 => write!(f, "G2"),
            TestMode::G => write!(f, "G"),
        }
    }
}

impl FromStr for TestMode {
    type Err = AssessmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "G2" => Ok(TestMode::G2),
            "G" => Ok(TestMode::G),
            _ => Err(AssessmentError::UnknownMode(s.to_string())),
        }
    }
}

/// A single driving behaviour being graded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Identifier, unique within a mode's checklist.
    pub id: String,
    /// Short label shown next to the Yes/No buttons.
    pub title: String,
    /// Longer explanation of what to watch for.
    #[serde(default)]
    pub detail: Option<String>,
    /// Modes this item applies to. `None` means every mode.
    #[serde(default)]
    pub modes: Option<Vec<TestMode>>,
}

impl ChecklistItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            detail: None,
            modes: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn only_for(mut self, modes: &[TestMode]) -> Self {
        self.modes = Some(modes.to_vec());
        self
    }

    /// Whether this item is part of the checklist for `mode`.
    pub fn applies_to(&self, mode: TestMode) -> bool {
        match &self.modes {
            None => true,
            Some(modes) => modes.contains(&mode),
        }
    }
}

/// A named group of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistCategory {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<ChecklistItem>,
}

/// The checklist for one mode, as handed to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistDefinition {
    pub mode: TestMode,
    pub categories: Vec<ChecklistCategory>,
    /// Minimum readiness percent for a pass verdict.
    pub pass_threshold_percent: f64,
}

impl ChecklistDefinition {
    /// Item ids in category order, then declaration order.
    pub fn item_ids(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .flat_map(|c| c.items.iter().map(|i| i.id.as_str()))
    }

    pub fn contains_item(&self, item_id: &str) -> bool {
        self.item_ids().any(|id| id == item_id)
    }

    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }

    pub fn category(&self, category_id: &str) -> Option<&ChecklistCategory> {
        self.categories.iter().find(|c| c.id == category_id)
    }
}

/// The recorded grade for one item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    #[default]
    Unanswered,
    Yes,
    No,
}

impl Grade {
    pub fn is_answered(self) -> bool {
        !matches!(self, Grade::Unanswered)
    }

    /// Badge text for the item row.
    pub fn label(self) -> &'static str {
        match self {
            Grade::Unanswered => "Unrated",
            Grade::Yes => "Yes",
            Grade::No => "No",
        }
    }
}

/// A value the person grading can pick. Grades can't be set back to unanswered
/// one item at a time; that only happens through a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
}

impl From<Answer> for Grade {
    fn from(answer: Answer) -> Self {
        match answer {
            Answer::Yes => Grade::Yes,
            Answer::No => Grade::No,
        }
    }
}

impl From<bool> for Answer {
    fn from(value: bool) -> Self {
        if value {
            Answer::Yes
        } else {
            Answer::No
        }
    }
}

impl FromStr for Answer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yes" | "y" | "true" => Ok(Answer::Yes),
            "no" | "n" | "false" => Ok(Answer::No),
            other => Err(format!("unknown answer: {other}")),
        }
    }
}
