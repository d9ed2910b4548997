//! Results summary for a graded checklist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::{display_percent, CategoryMetrics, GradedItem, Metrics};
use crate::model::{ChecklistDefinition, TestMode};
use crate::session::AssessmentState;

/// Overall outcome against the pass threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    NeedsWork,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Pass => write!(f, "Pass"),
            Verdict::NeedsWork => write!(f, "Needs work"),
        }
    }
}

/// A snapshot of one mode's checklist results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub mode: TestMode,
    pub submitted: bool,
    pub total: usize,
    pub answered: usize,
    /// Completion, rounded for display.
    pub completion_percent: u32,
    /// Readiness, rounded for display.
    pub readiness_percent: u32,
    pub pass_threshold_percent: f64,
    pub verdict: Verdict,
    pub categories: Vec<CategoryMetrics>,
    /// Empty until the checklist is submitted.
    pub strengths: Vec<GradedItem>,
    /// Empty until the checklist is submitted.
    pub improvements: Vec<GradedItem>,
}

impl SessionReport {
    pub fn new(definition: &ChecklistDefinition, state: &AssessmentState) -> Self {
        let metrics = Metrics::compute(definition, state);
        let submitted = state.is_submitted();
        let verdict = if metrics.passes {
            Verdict::Pass
        } else {
            Verdict::NeedsWork
        };

        let (strengths, improvements) = if submitted {
            (metrics.strengths, metrics.improvements)
        } else {
            (Vec::new(), Vec::new())
        };

        Self {
            created_at: Utc::now(),
            mode: definition.mode,
            submitted,
            total: metrics.total,
            answered: metrics.answered,
            completion_percent: display_percent(metrics.completion_percent),
            readiness_percent: display_percent(metrics.readiness_percent),
            pass_threshold_percent: metrics.pass_threshold_percent,
            verdict,
            categories: metrics.categories,
            strengths,
            improvements,
        }
    }

    /// Items left to grade.
    pub fn remaining(&self) -> usize {
        self.total - self.answered
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("## Passenger Checklist ({})\n\n", self.mode));
        md.push_str(&format!(
            "**Progress:** {}/{} ({}%)\n\n",
            self.answered, self.total, self.completion_percent
        ));

        if !self.submitted {
            if self.remaining() > 0 {
                md.push_str(&format!("_Answer {} more to submit._\n", self.remaining()));
            } else {
                md.push_str(&format!(
                    "_Ready to submit ({}% readiness)._\n",
                    self.readiness_percent
                ));
            }
            return md;
        }

        md.push_str(&format!(
            "**Readiness Score:** {}% (pass >= {}%) - **{}**\n\n",
            self.readiness_percent, self.pass_threshold_percent, self.verdict
        ));

        md.push_str("| Category | Answered | Yes | Readiness |\n");
        md.push_str("|----------|----------|-----|-----------|\n");
        for c in &self.categories {
            md.push_str(&format!(
                "| {} | {}/{} | {} | {}% |\n",
                c.title,
                c.answered,
                c.total,
                c.yes,
                display_percent(c.readiness_percent)
            ));
        }
        md.push('\n');

        md.push_str("### Strengths\n\n");
        if self.strengths.is_empty() {
            md.push_str("No strengths recorded yet.\n");
        }
        for item in &self.strengths {
            md.push_str(&format!("- {} · {}\n", item.title, item.category_title));
        }
        md.push('\n');

        md.push_str("### Areas to improve\n\n");
        if self.improvements.is_empty() {
            md.push_str("No issues flagged.\n");
        }
        for item in &self.improvements {
            md.push_str(&format!("- {} · {}\n", item.title, item.category_title));
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::model::Answer;
    use crate::session::Session;
    use std::sync::Arc;

    fn graded_session(no_items: &[&str]) -> Session {
        let mut s = Session::new(Arc::new(Catalog::builtin()));
        let ids: Vec<String> = s.definition().item_ids().map(String::from).collect();
        for id in &ids {
            let answer = if no_items.contains(&id.as_str()) {
                Answer::No
            } else {
                Answer::Yes
            };
            s.set_grade(id, answer).unwrap();
        }
        s
    }

    #[test]
    fn unsubmitted_report_hides_strengths() {
        let s = graded_session(&["complete_stops"]);
        let report = s.report();
        assert!(!report.submitted);
        assert!(report.strengths.is_empty());
        assert!(report.improvements.is_empty());
        assert!(report.to_markdown().contains("Ready to submit (94% readiness)"));
    }

    #[test]
    fn submitted_report_lists_items() {
        let mut s = graded_session(&[
            "complete_stops",
            "pedestrian_priority",
            "lane_positioning",
            "blind_spot_checks",
        ]);
        s.submit().unwrap();
        let report = s.report();
        assert_eq!(report.readiness_percent, 75);
        assert_eq!(report.verdict, Verdict::NeedsWork);
        assert_eq!(report.strengths.len(), 12);
        assert_eq!(report.improvements.len(), 4);
        assert_eq!(report.improvements[0].item_id, "blind_spot_checks");

        let md = report.to_markdown();
        assert!(md.contains("Readiness Score:** 75%"));
        assert!(md.contains("Needs work"));
        assert!(md.contains("- Complete stops · Turns / Intersections"));
    }

    #[test]
    fn partial_report_asks_for_more() {
        let mut s = Session::new(Arc::new(Catalog::builtin()));
        s.set_grade("seatbelt_check", Answer::Yes).unwrap();
        let md = s.report().to_markdown();
        assert!(md.contains("1/16 (6%)"));
        assert!(md.contains("Answer 15 more"));
    }

    #[test]
    fn json_roundtrip() {
        let mut s = graded_session(&[]);
        s.submit().unwrap();
        let json = serde_json::to_string(&s.report()).unwrap();
        let loaded: SessionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.verdict, Verdict::Pass);
        assert_eq!(loaded.mode, TestMode::G2);
        assert_eq!(loaded.categories.len(), 4);
        assert!(json.contains("\"verdict\":\"pass\""));
    }
}
