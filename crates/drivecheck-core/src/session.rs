//! Per-session grading state.
//!
//! A [`Session`] holds one [`AssessmentState`] per test mode. Both are seeded
//! from the catalog when the session is created and live side by side, so
//! switching modes never loses progress. Every mutation goes through the
//! active mode's state only.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::AssessmentError;
use crate::metrics::Metrics;
use crate::model::{Answer, ChecklistDefinition, Grade, TestMode};
use crate::report::SessionReport;

/// Grades for one mode, keyed by item id, plus the submitted flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentState {
    grades: BTreeMap<String, Grade>,
    submitted: bool,
}

impl AssessmentState {
    /// Every item of `definition` unanswered, not submitted.
    pub fn seeded(definition: &ChecklistDefinition) -> Self {
        Self {
            grades: definition
                .item_ids()
                .map(|id| (id.to_string(), Grade::Unanswered))
                .collect(),
            submitted: false,
        }
    }

    /// The grade for `item_id`; unknown ids read as unanswered.
    pub fn grade(&self, item_id: &str) -> Grade {
        self.grades.get(item_id).copied().unwrap_or_default()
    }

    pub fn grades(&self) -> &BTreeMap<String, Grade> {
        &self.grades
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.grades.contains_key(item_id)
    }

    pub fn len(&self) -> usize {
        self.grades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }

    /// Overwrite an existing entry. Ids not already present are ignored so the
    /// key set never drifts from the definition it was seeded from.
    pub(crate) fn set(&mut self, item_id: &str, grade: Grade) -> bool {
        match self.grades.get_mut(item_id) {
            Some(slot) => {
                *slot = grade;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ModeStates {
    g2: AssessmentState,
    g: AssessmentState,
}

impl ModeStates {
    fn get(&self, mode: TestMode) -> &AssessmentState {
        match mode {
            TestMode::G2 => &self.g2,
            TestMode::G => &self.g,
        }
    }

    fn get_mut(&mut self, mode: TestMode) -> &mut AssessmentState {
        match mode {
            TestMode::G2 => &mut self.g2,
            TestMode::G => &mut self.g,
        }
    }
}

/// One person's grading session across both modes.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: Arc<Catalog>,
    active_mode: TestMode,
    definition: ChecklistDefinition,
    states: ModeStates,
}

impl Session {
    /// Start a session in `G2` with both modes unanswered.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_mode(catalog, TestMode::G2)
    }

    /// Start a session in `mode` with both modes unanswered.
    pub fn with_mode(catalog: Arc<Catalog>, mode: TestMode) -> Self {
        let states = ModeStates {
            g2: AssessmentState::seeded(&catalog.definition(TestMode::G2)),
            g: AssessmentState::seeded(&catalog.definition(TestMode::G)),
        };
        let definition = catalog.definition(mode);
        Self {
            catalog,
            active_mode: mode,
            definition,
            states,
        }
    }

    pub fn active_mode(&self) -> TestMode {
        self.active_mode
    }

    /// The checklist for the active mode.
    pub fn definition(&self) -> &ChecklistDefinition {
        &self.definition
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The active mode's state.
    pub fn state(&self) -> &AssessmentState {
        self.states.get(self.active_mode)
    }

    pub fn state_for(&self, mode: TestMode) -> &AssessmentState {
        self.states.get(mode)
    }

    pub fn grade(&self, item_id: &str) -> Grade {
        self.state().grade(item_id)
    }

    pub fn is_submitted(&self) -> bool {
        self.state().is_submitted()
    }

    /// Switch the active mode. Grades in either mode are left as they are.
    pub fn set_mode(&mut self, mode: TestMode) {
        if mode == self.active_mode {
            return;
        }
        tracing::debug!(from = %self.active_mode, to = %mode, "switching test mode");
        self.active_mode = mode;
        self.definition = self.catalog.definition(mode);
    }

    /// Record a Yes/No grade for an item of the active mode.
    ///
    /// Returns `UnknownItem` and leaves the state untouched if the item is not
    /// part of the active checklist.
    pub fn set_grade(&mut self, item_id: &str, answer: Answer) -> Result<(), AssessmentError> {
        let mode = self.active_mode;
        if !self.states.get_mut(mode).set(item_id, answer.into()) {
            tracing::warn!(item_id, %mode, "ignoring grade for item outside the checklist");
            return Err(AssessmentError::UnknownItem {
                item_id: item_id.to_string(),
                mode,
            });
        }
        tracing::debug!(item_id, %mode, ?answer, "graded item");
        Ok(())
    }

    /// Clear every grade of the active mode and return it to editing.
    pub fn reset_mode(&mut self) {
        tracing::info!(mode = %self.active_mode, "resetting checklist");
        *self.states.get_mut(self.active_mode) = AssessmentState::seeded(&self.definition);
    }

    /// Mark the active mode as submitted once every item has a grade.
    ///
    /// Otherwise returns `NotReady` with the number of items left and changes
    /// nothing.
    pub fn submit(&mut self) -> Result<(), AssessmentError> {
        let metrics = self.metrics();
        if !metrics.can_submit {
            tracing::debug!(
                mode = %self.active_mode,
                remaining = metrics.remaining(),
                "submit rejected"
            );
            return Err(AssessmentError::NotReady {
                remaining: metrics.remaining(),
            });
        }
        tracing::info!(
            mode = %self.active_mode,
            readiness = metrics.readiness_percent,
            passes = metrics.passes,
            "checklist submitted"
        );
        self.states.get_mut(self.active_mode).submitted = true;
        Ok(())
    }

    /// Return a submitted checklist to editing without touching grades.
    pub fn edit(&mut self) {
        self.states.get_mut(self.active_mode).submitted = false;
    }

    /// Metrics for the active mode.
    pub fn metrics(&self) -> Metrics {
        Metrics::compute(&self.definition, self.state())
    }

    /// Summary of the active mode, suitable for printing or serialising.
    pub fn report(&self) -> SessionReport {
        SessionReport::new(&self.definition, self.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Arc::new(Catalog::builtin()))
    }

    fn grade_all(session: &mut Session, answer: Answer) {
        let ids: Vec<String> = session.definition().item_ids().map(String::from).collect();
        for id in ids {
            session.set_grade(&id, answer).unwrap();
        }
    }

    fn keys_match_definition(session: &Session, mode: TestMode) {
        let def = session.catalog().definition(mode);
        let expected: Vec<&str> = {
            let mut ids: Vec<&str> = def.item_ids().collect();
            ids.sort_unstable();
            ids
        };
        let actual: Vec<&str> = session
            .state_for(mode)
            .grades()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn new_session_seeds_both_modes() {
        let s = session();
        assert_eq!(s.active_mode(), TestMode::G2);
        assert_eq!(s.state_for(TestMode::G2).len(), 16);
        assert_eq!(s.state_for(TestMode::G).len(), 19);
        keys_match_definition(&s, TestMode::G2);
        keys_match_definition(&s, TestMode::G);
        assert!(s
            .state()
            .grades()
            .values()
            .all(|g| *g == Grade::Unanswered));
    }

    #[test]
    fn first_switch_to_mode_is_unanswered() {
        let mut s = session();
        s.set_grade("seatbelt_check", Answer::Yes).unwrap();
        s.set_mode(TestMode::G);
        let m = s.metrics();
        assert_eq!(m.answered, 0);
        assert_eq!(m.completion_percent, 0.0);
        assert_eq!(m.total, 19);
        assert!(s.state().grades().values().all(|g| !g.is_answered()));
    }

    #[test]
    fn switching_modes_keeps_progress() {
        let mut s = session();
        s.set_grade("seatbelt_check", Answer::Yes).unwrap();
        s.set_mode(TestMode::G);
        s.set_grade("seatbelt_check", Answer::No).unwrap();
        s.set_mode(TestMode::G2);
        assert_eq!(s.grade("seatbelt_check"), Grade::Yes);
        assert_eq!(s.state_for(TestMode::G).grade("seatbelt_check"), Grade::No);
    }

    #[test]
    fn unknown_item_is_rejected_without_mutation() {
        let mut s = session();
        let before = s.state().clone();
        let err = s.set_grade("highway_merge_speed", Answer::Yes).unwrap_err();
        assert_eq!(
            err,
            AssessmentError::UnknownItem {
                item_id: "highway_merge_speed".into(),
                mode: TestMode::G2,
            }
        );
        assert_eq!(s.state(), &before);
        assert!(!s.state().contains("highway_merge_speed"));
    }

    #[test]
    fn latest_grade_wins() {
        let mut s = session();
        s.set_grade("complete_stops", Answer::Yes).unwrap();
        assert_eq!(s.metrics().yes, 1);
        s.set_grade("complete_stops", Answer::No).unwrap();
        assert_eq!(s.metrics().yes, 0);
        assert_eq!(s.metrics().no, 1);
        s.set_grade("complete_stops", Answer::Yes).unwrap();
        let m = s.metrics();
        assert_eq!(m.yes, 1);
        assert_eq!(m.answered, 1);
        assert_eq!(m.readiness_percent, 100.0 / 16.0);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut s = session();
        grade_all(&mut s, Answer::Yes);
        s.submit().unwrap();
        s.reset_mode();
        let once = s.state().clone();
        s.reset_mode();
        assert_eq!(s.state(), &once);
        assert!(!s.is_submitted());
        assert_eq!(s.metrics().answered, 0);
        keys_match_definition(&s, TestMode::G2);
    }

    #[test]
    fn reset_only_touches_active_mode() {
        let mut s = session();
        s.set_grade("seatbelt_check", Answer::Yes).unwrap();
        s.set_mode(TestMode::G);
        s.set_grade("seatbelt_check", Answer::Yes).unwrap();
        s.reset_mode();
        assert_eq!(s.grade("seatbelt_check"), Grade::Unanswered);
        assert_eq!(s.state_for(TestMode::G2).grade("seatbelt_check"), Grade::Yes);
    }

    #[test]
    fn submit_requires_every_item() {
        let mut s = session();
        let ids: Vec<String> = s.definition().item_ids().map(String::from).collect();
        for id in &ids[..15] {
            s.set_grade(id, Answer::Yes).unwrap();
        }
        let before = s.state().clone();
        assert_eq!(s.submit(), Err(AssessmentError::NotReady { remaining: 1 }));
        assert!(!s.is_submitted());
        assert_eq!(s.state(), &before);

        s.set_grade(&ids[15], Answer::No).unwrap();
        s.submit().unwrap();
        assert!(s.is_submitted());
    }

    #[test]
    fn submit_on_fresh_session_reports_all_remaining() {
        let mut s = session();
        assert_eq!(s.submit(), Err(AssessmentError::NotReady { remaining: 16 }));
    }

    #[test]
    fn all_yes_scenario_passes() {
        let mut s = session();
        grade_all(&mut s, Answer::Yes);
        s.submit().unwrap();
        let m = s.metrics();
        assert_eq!(m.answered, 16);
        assert_eq!(m.readiness_percent, 100.0);
        assert!(m.passes);
    }

    #[test]
    fn edit_then_resubmit_round_trip() {
        let mut s = session();
        grade_all(&mut s, Answer::Yes);
        s.set_grade("lane_positioning", Answer::No).unwrap();
        s.submit().unwrap();
        let submitted_metrics = s.metrics();
        let grades = s.state().grades().clone();

        s.edit();
        assert!(!s.is_submitted());
        assert_eq!(s.state().grades(), &grades);

        s.submit().unwrap();
        assert!(s.is_submitted());
        assert_eq!(s.metrics(), submitted_metrics);
    }

    #[test]
    fn submitted_flag_is_per_mode() {
        let mut s = session();
        grade_all(&mut s, Answer::Yes);
        s.submit().unwrap();
        s.set_mode(TestMode::G);
        assert!(!s.is_submitted());
        s.set_mode(TestMode::G2);
        assert!(s.is_submitted());
    }

    #[test]
    fn g_mode_items_can_be_graded_in_g() {
        let mut s = Session::with_mode(Arc::new(Catalog::builtin()), TestMode::G);
        s.set_grade("highway_merge_speed", Answer::Yes).unwrap();
        assert_eq!(s.grade("highway_merge_speed"), Grade::Yes);
        keys_match_definition(&s, TestMode::G);
    }
}
