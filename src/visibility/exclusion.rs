//! Mutual exclusion between paired boolean fields

/// Two boolean fields that may never both be true
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusivePair {
    pub first: &'static str,
    pub second: &'static str,
}

impl ExclusivePair {
    pub const fn new(first: &'static str, second: &'static str) -> Self {
        Self { first, second }
    }

    /// The other member of the pair, if `name` belongs to it
    pub fn sibling_of(&self, name: &str) -> Option<&'static str> {
        if name == self.first {
            Some(self.second)
        } else if name == self.second {
            Some(self.first)
        } else {
            None
        }
    }
}

/// The set of exclusive pairs declared by a form
#[derive(Debug, Clone, Default)]
pub struct ExclusionRule {
    pairs: Vec<ExclusivePair>,
}

impl ExclusionRule {
    pub fn new(pairs: Vec<ExclusivePair>) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[ExclusivePair] {
        &self.pairs
    }

    /// Field that must be forced off when `name` is set to `value`.
    ///
    /// Only a `true` write forces the sibling; clearing a member never
    /// touches the other one, so both-false stays reachable.
    pub fn forced_off(&self, name: &str, value: bool) -> Option<&'static str> {
        if !value {
            return None;
        }
        self.pairs.iter().find_map(|pair| pair.sibling_of(name))
    }
}
