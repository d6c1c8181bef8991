//! Visibility rule engine
//!
//! Derives show/hide decisions for every declared target from the current
//! category toggles. The engine keeps no state between calls: the same
//! toggles always produce the same decision set.

use super::category::{Category, CategoryToggleSet};
use std::collections::BTreeMap;

/// Identifier of a field, row or section whose display state is derived
pub type TargetId = &'static str;

/// Which categories own a visibility target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetOwner {
    /// Always visible
    Unowned,
    /// Visible iff the category is enabled
    Single(Category),
    /// Aggregate: visible iff at least one category is enabled
    Any(Vec<Category>),
}

impl TargetOwner {
    fn is_visible(&self, toggles: &CategoryToggleSet) -> bool {
        match self {
            Self::Unowned => true,
            Self::Single(category) => toggles.is_enabled(*category),
            Self::Any(categories) => toggles.any_enabled(categories),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityTarget {
    pub id: TargetId,
    pub owner: TargetOwner,
}

impl VisibilityTarget {
    pub fn unowned(id: TargetId) -> Self {
        Self {
            id,
            owner: TargetOwner::Unowned,
        }
    }

    pub fn single(id: TargetId, category: Category) -> Self {
        Self {
            id,
            owner: TargetOwner::Single(category),
        }
    }

    pub fn any(id: TargetId, categories: &[Category]) -> Self {
        Self {
            id,
            owner: TargetOwner::Any(categories.to_vec()),
        }
    }
}

/// Exclusive choice group gating a dependent block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceGroup {
    /// Name of the choice field
    pub field: &'static str,
    /// Selected value that reveals the dependent block
    pub affirmative: &'static str,
}

/// Visible/hidden decision for every declared target
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisibilityDecisionSet {
    decisions: BTreeMap<TargetId, bool>,
}

impl VisibilityDecisionSet {
    /// Decision for `id`; undeclared targets are hidden
    pub fn is_visible(&self, id: &str) -> bool {
        self.decisions.get(id).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TargetId, bool)> + '_ {
        self.decisions.iter().map(|(id, visible)| (*id, *visible))
    }
}

#[derive(Debug, Clone, Default)]
pub struct VisibilityEngine {
    targets: Vec<VisibilityTarget>,
    groups: Vec<ChoiceGroup>,
}

impl VisibilityEngine {
    pub fn new(targets: Vec<VisibilityTarget>, groups: Vec<ChoiceGroup>) -> Self {
        Self { targets, groups }
    }

    pub fn targets(&self) -> &[VisibilityTarget] {
        &self.targets
    }

    pub fn groups(&self) -> &[ChoiceGroup] {
        &self.groups
    }

    pub fn evaluate(&self, toggles: &CategoryToggleSet) -> VisibilityDecisionSet {
        let decisions = self
            .targets
            .iter()
            .map(|target| (target.id, target.owner.is_visible(toggles)))
            .collect();
        VisibilityDecisionSet { decisions }
    }

    /// Whether the block gated by `group` is visible for the given selection.
    /// No selection counts as "no".
    pub fn evaluate_choice(&self, group: &str, selected: Option<&str>) -> bool {
        self.groups
            .iter()
            .find(|g| g.field == group)
            .is_some_and(|g| selected == Some(g.affirmative))
    }
}
