//! Completion, readiness, and pass/fail scoring.
//!
//! Metrics are a pure function of a checklist definition and one mode's
//! grades. Nothing is cached; checklists hold a few dozen items at most.

use serde::{Deserialize, Serialize};

use crate::model::{ChecklistDefinition, Grade};
use crate::session::AssessmentState;

/// An item together with the category it was listed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedItem {
    pub item_id: String,
    pub title: String,
    pub category_id: String,
    pub category_title: String,
    pub grade: Grade,
}

/// Per-category breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMetrics {
    pub category_id: String,
    pub title: String,
    pub total: usize,
    pub answered: usize,
    pub yes: usize,
    pub readiness_percent: f64,
}

/// Derived values for one mode's checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub total: usize,
    pub answered: usize,
    pub yes: usize,
    pub no: usize,
    /// Share of items graded Yes or No, in `[0, 100]`. Unrounded.
    pub completion_percent: f64,
    /// Share of items graded Yes, in `[0, 100]`. Unrounded.
    pub readiness_percent: f64,
    pub pass_threshold_percent: f64,
    pub passes: bool,
    pub can_submit: bool,
    /// Items graded Yes, in checklist order.
    pub strengths: Vec<GradedItem>,
    /// Items graded No, in checklist order.
    pub improvements: Vec<GradedItem>,
    pub categories: Vec<CategoryMetrics>,
}

impl Metrics {
    /// Compute metrics for `state` against `definition`.
    ///
    /// Grades for ids outside the definition are ignored; ids missing from
    /// `state` count as unanswered.
    pub fn compute(definition: &ChecklistDefinition, state: &AssessmentState) -> Self {
        let all_items = flatten(definition, state);

        let total = all_items.len();
        let answered = all_items.iter().filter(|i| i.grade.is_answered()).count();
        let yes = all_items.iter().filter(|i| i.grade == Grade::Yes).count();
        let no = all_items.iter().filter(|i| i.grade == Grade::No).count();

        let completion_percent = percent(answered, total);
        let readiness_percent = percent(yes, total);
        let passes = readiness_percent >= definition.pass_threshold_percent;
        let can_submit = total > 0 && answered == total;

        let categories = definition
            .categories
            .iter()
            .map(|category| {
                let grades: Vec<Grade> = category
                    .items
                    .iter()
                    .map(|item| state.grade(&item.id))
                    .collect();
                let total = grades.len();
                let yes = grades.iter().filter(|g| **g == Grade::Yes).count();
                CategoryMetrics {
                    category_id: category.id.clone(),
                    title: category.title.clone(),
                    total,
                    answered: grades.iter().filter(|g| g.is_answered()).count(),
                    yes,
                    readiness_percent: percent(yes, total),
                }
            })
            .collect();

        let (strengths, rest): (Vec<_>, Vec<_>) =
            all_items.into_iter().partition(|i| i.grade == Grade::Yes);
        let improvements = rest.into_iter().filter(|i| i.grade == Grade::No).collect();

        Self {
            total,
            answered,
            yes,
            no,
            completion_percent,
            readiness_percent,
            pass_threshold_percent: definition.pass_threshold_percent,
            passes,
            can_submit,
            strengths,
            improvements,
            categories,
        }
    }

    /// Items still to grade before submit is allowed.
    pub fn remaining(&self) -> usize {
        self.total - self.answered
    }
}

fn flatten(definition: &ChecklistDefinition, state: &AssessmentState) -> Vec<GradedItem> {
    definition
        .categories
        .iter()
        .flat_map(|category| {
            category.items.iter().map(move |item| GradedItem {
                item_id: item.id.clone(),
                title: item.title.clone(),
                category_id: category.id.clone(),
                category_title: category.title.clone(),
                grade: state.grade(&item.id),
            })
        })
        .collect()
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Round a percentage half-up to a whole number for display.
pub fn display_percent(value: f64) -> u32 {
    (value + 0.5).floor().max(0.0) as u32
}

/// `"75%"`-style label.
pub fn format_percent(value: f64) -> String {
    format!("{}%", display_percent(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::model::{Answer, TestMode};

    fn g2() -> ChecklistDefinition {
        Catalog::builtin().definition(TestMode::G2)
    }

    fn grade_first(def: &ChecklistDefinition, yes: usize, no: usize) -> AssessmentState {
        let mut state = AssessmentState::seeded(def);
        let ids: Vec<String> = def.item_ids().map(String::from).collect();
        for id in &ids[..yes] {
            state.set(id, Answer::Yes.into());
        }
        for id in &ids[yes..yes + no] {
            state.set(id, Answer::No.into());
        }
        state
    }

    #[test]
    fn fresh_state_is_all_zero() {
        let def = g2();
        let m = Metrics::compute(&def, &AssessmentState::seeded(&def));
        assert_eq!(m.total, 16);
        assert_eq!(m.answered, 0);
        assert_eq!(m.completion_percent, 0.0);
        assert_eq!(m.readiness_percent, 0.0);
        assert!(!m.passes);
        assert!(!m.can_submit);
        assert_eq!(m.remaining(), 16);
        assert!(m.strengths.is_empty());
        assert!(m.improvements.is_empty());
    }

    #[test]
    fn all_yes_passes() {
        let def = g2();
        let m = Metrics::compute(&def, &grade_first(&def, 16, 0));
        assert_eq!(m.answered, 16);
        assert_eq!(m.readiness_percent, 100.0);
        assert!(m.passes);
        assert!(m.can_submit);
        assert_eq!(m.strengths.len(), 16);
    }

    #[test]
    fn twelve_of_sixteen_fails_at_eighty() {
        let def = g2();
        let m = Metrics::compute(&def, &grade_first(&def, 12, 4));
        assert_eq!(m.readiness_percent, 75.0);
        assert_eq!(m.completion_percent, 100.0);
        assert!(!m.passes);
        assert!(m.can_submit);
        assert_eq!(m.improvements.len(), 4);
        assert!(m.improvements.iter().all(|i| i.grade == Grade::No));
        assert_eq!(m.improvements[0].category_id, "turns_intersections");
        assert_eq!(m.improvements[0].category_title, "Turns / Intersections");
    }

    #[test]
    fn threshold_is_compared_unrounded() {
        // 15 of 19 = 78.947..., displays as 79 but still fails at 79
        let def = Catalog::builtin()
            .with_threshold(79.0)
            .unwrap()
            .definition(TestMode::G);
        let m = Metrics::compute(&def, &grade_first(&def, 15, 4));
        assert_eq!(display_percent(m.readiness_percent), 79);
        assert!(!m.passes);
    }

    #[test]
    fn exact_threshold_passes() {
        let def = Catalog::builtin()
            .with_threshold(75.0)
            .unwrap()
            .definition(TestMode::G2);
        let m = Metrics::compute(&def, &grade_first(&def, 12, 4));
        assert!(m.passes);
    }

    #[test]
    fn partial_grading() {
        let def = g2();
        let m = Metrics::compute(&def, &grade_first(&def, 3, 5));
        assert_eq!(m.answered, 8);
        assert_eq!(m.completion_percent, 50.0);
        assert_eq!(m.remaining(), 8);
        assert!(!m.can_submit);
    }

    #[test]
    fn empty_definition_cannot_submit() {
        let def = ChecklistDefinition {
            mode: TestMode::G2,
            categories: vec![],
            pass_threshold_percent: 0.0,
        };
        let m = Metrics::compute(&def, &AssessmentState::seeded(&def));
        assert_eq!(m.total, 0);
        assert_eq!(m.completion_percent, 0.0);
        assert!(!m.can_submit);
    }

    #[test]
    fn category_breakdown() {
        let def = g2();
        let m = Metrics::compute(&def, &grade_first(&def, 4, 0));
        let safety = &m.categories[0];
        assert_eq!(safety.category_id, "safety_starting");
        assert_eq!(safety.total, 4);
        assert_eq!(safety.yes, 4);
        assert_eq!(safety.readiness_percent, 100.0);
        assert_eq!(m.categories[1].answered, 0);
    }

    #[test]
    fn display_rounds_half_up() {
        assert_eq!(display_percent(0.0), 0);
        assert_eq!(display_percent(12.5), 13);
        assert_eq!(display_percent(78.947), 79);
        assert_eq!(display_percent(84.2), 84);
        assert_eq!(format_percent(100.0), "100%");
    }
}
