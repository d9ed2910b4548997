//! Checklist catalog and per-mode definitions.
//!
//! A catalog is built once from base categories plus an association list of
//! mode-specific extras. The extras are appended to their categories at
//! construction time, so `Catalog::definition` is a plain filter over
//! immutable data.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::AssessmentError;
use crate::model::{ChecklistCategory, ChecklistDefinition, ChecklistItem, TestMode};

/// Default pass threshold for the built-in catalog.
pub const PASS_THRESHOLD_PERCENT: f64 = 80.0;

/// Items to append to one category, usually restricted to a single mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryExtras {
    /// Id of the base category the items are appended to.
    pub category_id: String,
    pub items: Vec<ChecklistItem>,
}

/// The full set of categories and items across all modes.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    categories: Vec<ChecklistCategory>,
    pass_threshold_percent: f64,
}

impl Catalog {
    /// Build a catalog, appending each extras entry to its category.
    ///
    /// Fails if an extras entry names a category that is not in `base`, if
    /// two items applying to the same mode share an id, or if the threshold
    /// is outside `[0, 100]`.
    pub fn new(
        base: Vec<ChecklistCategory>,
        extras: Vec<CategoryExtras>,
        pass_threshold_percent: f64,
    ) -> Result<Self, AssessmentError> {
        check_threshold(pass_threshold_percent)?;

        let mut categories = base;
        for extra in extras {
            let Some(category) = categories.iter_mut().find(|c| c.id == extra.category_id) else {
                return Err(AssessmentError::UnknownCategory(extra.category_id));
            };
            category.items.extend(extra.items);
        }

        let catalog = Self {
            categories,
            pass_threshold_percent,
        };
        catalog.check_unique_items()?;
        Ok(catalog)
    }

    /// The built-in Ontario G2/G passenger checklist.
    pub fn builtin() -> Self {
        Self::new(builtin_categories(), builtin_extras(), PASS_THRESHOLD_PERCENT)
            .expect("built-in catalog is well formed")
    }

    // Grades are keyed by item id, so ids must be unique within each mode.
    fn check_unique_items(&self) -> Result<(), AssessmentError> {
        for mode in TestMode::ALL {
            let mut seen = HashSet::new();
            let items = self
                .categories
                .iter()
                .flat_map(|c| &c.items)
                .filter(|item| item.applies_to(mode));
            for item in items {
                if !seen.insert(item.id.as_str()) {
                    return Err(AssessmentError::DuplicateItem {
                        item_id: item.id.clone(),
                        mode,
                    });
                }
            }
        }
        Ok(())
    }

    /// Replace the pass threshold.
    pub fn with_threshold(mut self, pass_threshold_percent: f64) -> Result<Self, AssessmentError> {
        check_threshold(pass_threshold_percent)?;
        self.pass_threshold_percent = pass_threshold_percent;
        Ok(self)
    }

    /// All categories with base and extra items, unfiltered.
    pub fn categories(&self) -> &[ChecklistCategory] {
        &self.categories
    }

    pub fn pass_threshold_percent(&self) -> f64 {
        self.pass_threshold_percent
    }

    /// The checklist for `mode`.
    ///
    /// Every category is returned in catalog order, even if no item applies to
    /// `mode`; item order is base items first, then extras as declared.
    pub fn definition(&self, mode: TestMode) -> ChecklistDefinition {
        let categories = self
            .categories
            .iter()
            .map(|category| ChecklistCategory {
                id: category.id.clone(),
                title: category.title.clone(),
                description: category.description.clone(),
                items: category
                    .items
                    .iter()
                    .filter(|item| item.applies_to(mode))
                    .cloned()
                    .collect(),
            })
            .collect();

        ChecklistDefinition {
            mode,
            categories,
            pass_threshold_percent: self.pass_threshold_percent,
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn check_threshold(value: f64) -> Result<(), AssessmentError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(AssessmentError::InvalidThreshold(value))
    }
}

fn category(
    id: &str,
    title: &str,
    description: &str,
    items: Vec<ChecklistItem>,
) -> ChecklistCategory {
    ChecklistCategory {
        id: id.into(),
        title: title.into(),
        description: Some(description.into()),
        items,
    }
}

fn item(id: &str, title: &str, detail: &str) -> ChecklistItem {
    ChecklistItem::new(id, title).with_detail(detail)
}

fn builtin_categories() -> Vec<ChecklistCategory> {
    vec![
        category(
            "safety_starting",
            "Safety / Starting",
            "Pre-drive checks and safe setup before moving.",
            vec![
                item(
                    "seatbelt_check",
                    "Seatbelt check",
                    "Confirms driver + passengers are buckled before moving.",
                ),
                item(
                    "mirror_adjustments",
                    "Mirror adjustments",
                    "Mirrors set before driving; minimal adjusting while moving.",
                ),
                item(
                    "signal_usage_general",
                    "Signal usage (consistent)",
                    "Signals early and cancels signal after completing action.",
                ),
                item(
                    "speed_maintenance",
                    "Speed maintenance",
                    "Maintains appropriate speed for posted limit and conditions.",
                ),
            ],
        ),
        category(
            "mirrors_blind_spots",
            "Mirrors / Blind Spots",
            "Observation habits and awareness of hazards.",
            vec![
                item(
                    "regular_mirror_checks",
                    "Regular mirror checks",
                    "Checks mirrors frequently and before braking/turning.",
                ),
                item(
                    "blind_spot_checks",
                    "Blind spot checks",
                    "Shoulder checks before moving, lane changes, or merging.",
                ),
                item(
                    "intersection_scanning",
                    "Intersection scanning",
                    "Scans left-right-left and watches for pedestrians.",
                ),
            ],
        ),
        category(
            "lane_changes",
            "Lane Changes",
            "Safe lane changes and merges.",
            vec![
                item(
                    "lane_change_signal",
                    "Signals before lane change",
                    "Signals early (about 3-5 seconds) before moving over.",
                ),
                item(
                    "lane_change_msm",
                    "Mirror-signal-shoulder check",
                    "Uses mirror + signal + blind spot check before changing lanes.",
                ),
                item(
                    "lane_change_safe_gap",
                    "Safe gap selection",
                    "Changes lanes only with a safe following distance/space.",
                ),
                item(
                    "lane_positioning",
                    "Lane positioning",
                    "Stays centered and maintains steady lane control.",
                ),
            ],
        ),
        category(
            "turns_intersections",
            "Turns / Intersections",
            "Turns, right-of-way, and control at intersections.",
            vec![
                item(
                    "turn_signal_timing",
                    "Signals before turns",
                    "Signals with enough time for others to react.",
                ),
                item(
                    "correct_lane_for_turn",
                    "Correct lane for turns",
                    "Gets into the correct lane early and turns into proper lane.",
                ),
                item(
                    "complete_stops",
                    "Complete stops",
                    "Full stop at stop signs / red lights when required.",
                ),
                item(
                    "pedestrian_priority",
                    "Pedestrian awareness",
                    "Checks crosswalks and yields appropriately.",
                ),
                item(
                    "smooth_controlled_turns",
                    "Smooth, controlled turns",
                    "Steers smoothly; appropriate speed through turn.",
                ),
            ],
        ),
    ]
}

fn builtin_extras() -> Vec<CategoryExtras> {
    vec![
        CategoryExtras {
            category_id: "lane_changes".into(),
            items: vec![
                item(
                    "highway_merge_speed",
                    "Highway merge speed (G)",
                    "Accelerates to match traffic speed while merging safely.",
                )
                .only_for(&[TestMode::G]),
                item(
                    "highway_following_distance",
                    "Safe following distance at higher speeds (G)",
                    "Maintains space cushion and avoids tailgating.",
                )
                .only_for(&[TestMode::G]),
            ],
        },
        CategoryExtras {
            category_id: "mirrors_blind_spots".into(),
            items: vec![item(
                "highway_mirror_awareness",
                "Mirror awareness on faster roads (G)",
                "Checks mirrors before speed changes and lane adjustments.",
            )
            .only_for(&[TestMode::G])],
        },
    ]
}
