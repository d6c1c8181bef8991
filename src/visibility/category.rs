//! Program categories and the toggle set that filters the form

const CATEGORY_COUNT: usize = 8;

/// Top-level program category offered by a school
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Kindergarten,
    Elementary,
    Jhs,
    Shs,
    Sped,
    Homeschool,
    Hei,
    International,
}

impl Category {
    /// Every declared category, in display order
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Kindergarten,
        Category::Elementary,
        Category::Jhs,
        Category::Shs,
        Category::Sped,
        Category::Homeschool,
        Category::Hei,
        Category::International,
    ];

    /// The four basic education programs that drive the aggregate sections
    pub const BASIC_EDUCATION: [Category; 4] = [
        Category::Kindergarten,
        Category::Elementary,
        Category::Jhs,
        Category::Shs,
    ];

    fn position(self) -> usize {
        self as usize
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Kindergarten => "kindergarten",
            Self::Elementary => "elementary",
            Self::Jhs => "jhs",
            Self::Shs => "shs",
            Self::Sped => "sped",
            Self::Homeschool => "homeschool",
            Self::Hei => "hei",
            Self::International => "international",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Kindergarten => "Kindergarten",
            Self::Elementary => "Elementary",
            Self::Jhs => "Junior High School",
            Self::Shs => "Senior High School",
            Self::Sped => "SPED/SNEd",
            Self::Homeschool => "Homeschooling",
            Self::Hei => "HEI",
            Self::International => "International School",
        }
    }

    /// Name of the boolean form field backing this category's toggle
    pub fn toggle_field(&self) -> &'static str {
        match self {
            Self::Kindergarten => "filterKindergarten",
            Self::Elementary => "filterElementary",
            Self::Jhs => "filterJHS",
            Self::Shs => "filterSHS",
            Self::Sped => "filterSPED",
            Self::Homeschool => "filterHomeschool",
            Self::Hei => "filterHEI",
            Self::International => "filterInternational",
        }
    }

    pub fn from_toggle_field(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.toggle_field() == name)
    }
}

/// One boolean per declared category. Defaults to every category enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryToggleSet {
    enabled: [bool; CATEGORY_COUNT],
}

impl Default for CategoryToggleSet {
    fn default() -> Self {
        Self::all_enabled()
    }
}

impl CategoryToggleSet {
    pub fn all_enabled() -> Self {
        Self {
            enabled: [true; CATEGORY_COUNT],
        }
    }

    pub fn none_enabled() -> Self {
        Self {
            enabled: [false; CATEGORY_COUNT],
        }
    }

    /// Toggle set with exactly the given categories enabled
    pub fn only(categories: &[Category]) -> Self {
        let mut set = Self::none_enabled();
        for category in categories {
            set.set(*category, true);
        }
        set
    }

    pub fn is_enabled(&self, category: Category) -> bool {
        self.enabled[category.position()]
    }

    pub fn set(&mut self, category: Category, enabled: bool) {
        self.enabled[category.position()] = enabled;
    }

    pub fn with(mut self, category: Category, enabled: bool) -> Self {
        self.set(category, enabled);
        self
    }

    /// True if at least one of `categories` is enabled
    pub fn any_enabled(&self, categories: &[Category]) -> bool {
        categories.iter().any(|c| self.is_enabled(*c))
    }

    pub fn enabled_categories(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL
            .into_iter()
            .filter(move |c| self.is_enabled(*c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_everything() {
        let toggles = CategoryToggleSet::default();
        assert!(Category::ALL.iter().all(|c| toggles.is_enabled(*c)));
    }

    #[test]
    fn test_only_enables_listed_categories() {
        let toggles = CategoryToggleSet::only(&[Category::Jhs, Category::Hei]);
        let enabled: Vec<_> = toggles.enabled_categories().collect();
        assert_eq!(enabled, vec![Category::Jhs, Category::Hei]);
    }

    #[test]
    fn test_any_enabled() {
        let toggles = CategoryToggleSet::only(&[Category::Shs]);
        assert!(toggles.any_enabled(&Category::BASIC_EDUCATION));
        assert!(!toggles.any_enabled(&[Category::Sped, Category::Hei]));
        assert!(!toggles.any_enabled(&[]));
    }

    #[test]
    fn test_toggle_field_round_trip() {
        for category in Category::ALL {
            assert_eq!(
                Category::from_toggle_field(category.toggle_field()),
                Some(category)
            );
        }
        assert_eq!(Category::from_toggle_field("filterNursery"), None);
    }

    #[test]
    fn test_with_is_builder_style() {
        let toggles = CategoryToggleSet::none_enabled().with(Category::Elementary, true);
        assert!(toggles.is_enabled(Category::Elementary));
        assert!(!toggles.is_enabled(Category::Kindergarten));
    }
}
