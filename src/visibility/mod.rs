//! Conditional visibility: category toggles, choice-gated blocks and
//! mutually exclusive boolean pairs

mod category;
mod engine;
mod exclusion;

pub use category::{Category, CategoryToggleSet};
pub use engine::{
    ChoiceGroup, TargetId, TargetOwner, VisibilityDecisionSet, VisibilityEngine,
    VisibilityTarget,
};
pub use exclusion::{ExclusionRule, ExclusivePair};
