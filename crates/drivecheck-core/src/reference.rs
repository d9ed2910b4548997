//! Per-mode quick-reference notes shown above the checklist.

use serde::Serialize;

use crate::model::TestMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickReference {
    pub title: &'static str,
    pub bullets: &'static [&'static str],
    pub note: &'static str,
}

const G2_REFERENCE: QuickReference = QuickReference {
    title: "Quick Reference (Ontario G2)",
    bullets: &[
        "Zero blood alcohol required (no drinking and driving).",
        "Follow posted speed limits and road conditions at all times.",
        "For drivers 19 and under, passenger limits may apply at night and during the first months of G2.",
        "No hand-held devices while driving; keep distractions minimal.",
    ],
    note: "Passenger restrictions vary by age/time and can change. Verify with official Ontario sources.",
};

const G_REFERENCE: QuickReference = QuickReference {
    title: "Quick Reference (Ontario G)",
    bullets: &[
        "Never drive impaired; alcohol and drugs slow reaction time.",
        "Always signal, check mirrors/blind spots, and keep safe following distance.",
        "Highway driving: merge smoothly and match traffic speed safely.",
        "No hand-held devices while driving; keep distractions minimal.",
    ],
    note: "This is a study aid, not legal advice. Confirm current rules with official sources.",
};

pub fn quick_reference(mode: TestMode) -> &'static QuickReference {
    match mode {
        TestMode::G2 => &G2_REFERENCE,
        TestMode::G => &G_REFERENCE,
    }
}
