//! Form field value objects

use chrono::NaiveDate;

/// Storage format for date fields
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Input kind of a declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Multiline,
    Number,
    Date,
    /// Dropdown restricted to the listed options (empty means "not chosen")
    Select(&'static [&'static str]),
    Boolean,
    /// Radio-style group: at most one option selected
    Choice(&'static [&'static str]),
}

impl FieldKind {
    pub fn default_value(&self) -> FieldValue {
        match self {
            Self::Boolean => FieldValue::Flag(false),
            Self::Choice(_) => FieldValue::Choice(None),
            _ => FieldValue::Text(String::new()),
        }
    }

    pub fn options(&self) -> &'static [&'static str] {
        match self {
            Self::Select(options) | Self::Choice(options) => options,
            _ => &[],
        }
    }

    /// Free-text kinds are edited keystroke by keystroke
    pub fn is_typed(&self) -> bool {
        matches!(
            self,
            Self::Text | Self::Multiline | Self::Number | Self::Date
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Multiline => "multiline text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Select(_) => "selection",
            Self::Boolean => "checkbox",
            Self::Choice(_) => "choice",
        }
    }
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Text, multiline, number, date and select fields
    Text(String),
    Flag(bool),
    Choice(Option<String>),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn choice(value: impl Into<String>) -> Self {
        FieldValue::Choice(Some(value.into()))
    }
}

/// True for an empty string or a finite decimal number
pub fn is_numeric(value: &str) -> bool {
    value.is_empty()
        || (!value.starts_with('+')
            && value.trim() == value
            && value.parse::<f64>().is_ok_and(f64::is_finite))
}

/// True for an empty string or a `YYYY-MM-DD` calendar date
pub fn is_iso_date(value: &str) -> bool {
    value.is_empty()
        || (value.len() == 10 && NaiveDate::parse_from_str(value, DATE_FORMAT).is_ok())
}

/// Represents a single form field with its configuration and value
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub value: FieldValue,
}

impl FormField {
    pub fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            value: kind.default_value(),
        }
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self.kind, FieldKind::Multiline)
    }

    /// Get the text value (empty for booleans and unselected choices)
    pub fn as_text(&self) -> &str {
        match &self.value {
            FieldValue::Text(s) => s,
            FieldValue::Choice(Some(s)) => s,
            FieldValue::Choice(None) | FieldValue::Flag(_) => "",
        }
    }

    pub fn as_flag(&self) -> bool {
        matches!(self.value, FieldValue::Flag(true))
    }

    /// Selected option of a choice or select field
    pub fn selected(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Choice(selected) => selected.as_deref(),
            FieldValue::Text(s) if matches!(self.kind, FieldKind::Select(_)) && !s.is_empty() => {
                Some(s.as_str())
            }
            _ => None,
        }
    }

    /// Whether `value` is acceptable for this field's kind
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match (self.kind, value) {
            (FieldKind::Boolean, FieldValue::Flag(_)) => true,
            (FieldKind::Choice(options), FieldValue::Choice(selected)) => selected
                .as_deref()
                .map_or(true, |s| options.contains(&s)),
            (FieldKind::Select(options), FieldValue::Text(s)) => {
                s.is_empty() || options.contains(&s.as_str())
            }
            (FieldKind::Number, FieldValue::Text(s)) => {
                s.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-')
            }
            (FieldKind::Date, FieldValue::Text(s)) => {
                s.len() <= 10 && s.chars().all(|c| c.is_ascii_digit() || c == '-')
            }
            (FieldKind::Text | FieldKind::Multiline, FieldValue::Text(_)) => true,
            _ => false,
        }
    }

    /// Value after typing `c`, or `None` if the kind does not take that character
    pub fn with_char(&self, c: char) -> Option<FieldValue> {
        let current = match &self.value {
            FieldValue::Text(s) => s,
            _ => return None,
        };
        let allowed = match self.kind {
            FieldKind::Text => c != '\n',
            FieldKind::Multiline => true,
            FieldKind::Number => c.is_ascii_digit() || (c == '.' && !current.contains('.')),
            FieldKind::Date => (c.is_ascii_digit() || c == '-') && current.len() < 10,
            _ => false,
        };
        if !allowed {
            return None;
        }
        let mut next = current.clone();
        next.push(c);
        Some(FieldValue::Text(next))
    }

    /// Value after a backspace
    pub fn without_last_char(&self) -> Option<FieldValue> {
        match &self.value {
            FieldValue::Text(s) if self.kind.is_typed() && !s.is_empty() => {
                let mut next = s.clone();
                next.pop();
                Some(FieldValue::Text(next))
            }
            _ => None,
        }
    }

    /// Value after flipping a checkbox
    pub fn toggled(&self) -> Option<FieldValue> {
        match self.value {
            FieldValue::Flag(b) => Some(FieldValue::Flag(!b)),
            _ => None,
        }
    }

    /// Value after moving to the next/previous option.
    ///
    /// Cycling passes through "nothing selected" between the last and
    /// first option.
    pub fn cycled(&self, forward: bool) -> Option<FieldValue> {
        let options = self.kind.options();
        if options.is_empty() {
            return None;
        }
        let current = options
            .iter()
            .position(|o| Some(*o) == self.selected());
        // Slot `options.len()` stands for "nothing selected"
        let slots = options.len() + 1;
        let slot = current.unwrap_or(options.len());
        let next = if forward {
            (slot + 1) % slots
        } else {
            (slot + slots - 1) % slots
        };
        let picked = options.get(next).map(|o| o.to_string());
        Some(match self.kind {
            FieldKind::Choice(_) => FieldValue::Choice(picked),
            _ => FieldValue::Text(picked.unwrap_or_default()),
        })
    }

    /// Reset the field to its kind's default
    pub fn clear(&mut self) {
        self.value = self.kind.default_value();
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Flag(true) => "[x]".to_string(),
            FieldValue::Flag(false) => "[ ]".to_string(),
            FieldValue::Choice(_) => self
                .kind
                .options()
                .iter()
                .map(|o| {
                    if self.selected() == Some(*o) {
                        format!("(•) {o}")
                    } else {
                        format!("( ) {o}")
                    }
                })
                .collect::<Vec<_>>()
                .join("  "),
        }
    }
}
