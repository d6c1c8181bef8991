//! Form state management

use super::field::{FieldValue, FormField};
use super::schema::{FormSchema, SchemaError, SectionDecl};
use crate::visibility::{Category, CategoryToggleSet, ExclusionRule, VisibilityDecisionSet, VisibilityEngine};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("unknown field `{0}`")]
    UnknownField(String),
    #[error("field `{name}` does not accept this value (expects {expected})")]
    Rejected { name: String, expected: &'static str },
}

/// The live form: declared fields, their values, and the cursor
#[derive(Debug, Clone)]
pub struct MonitoringForm {
    schema: FormSchema,
    exclusion: ExclusionRule,
    fields: Vec<FormField>,
    index: HashMap<String, usize>,
    /// Index into `fields` of the focused field
    pub active_field_index: usize,
}

impl MonitoringForm {
    /// Build a form from a validated schema. Category toggles start enabled.
    pub fn new(schema: FormSchema) -> Result<Self, SchemaError> {
        schema.validate()?;
        let fields: Vec<FormField> = schema
            .fields()
            .map(|decl| FormField::new(decl.name, decl.label, decl.kind))
            .collect();
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();
        let mut form = Self {
            exclusion: schema.exclusion_rule(),
            schema,
            fields,
            index,
            active_field_index: 0,
        };
        form.reset();
        Ok(form)
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.index.get(name).map(|i| &self.fields[*i])
    }

    pub fn active_field(&self) -> Option<&FormField> {
        self.fields.get(self.active_field_index)
    }

    /// Set a field's value, forcing an exclusive sibling off when needed.
    ///
    /// Returns the name of the sibling that was cleared, if any.
    pub fn set_value(
        &mut self,
        name: &str,
        value: FieldValue,
    ) -> Result<Option<&'static str>, FieldError> {
        let i = *self
            .index
            .get(name)
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
        let field = &mut self.fields[i];
        if !field.accepts(&value) {
            return Err(FieldError::Rejected {
                name: name.to_string(),
                expected: field.kind.label(),
            });
        }
        let forced = match value {
            FieldValue::Flag(flag) => self.exclusion.forced_off(name, flag),
            _ => None,
        };
        field.value = value;
        if let Some(sibling) = forced {
            if let Some(j) = self.index.get(sibling) {
                self.fields[*j].value = FieldValue::Flag(false);
            }
        }
        Ok(forced)
    }

    /// Current category toggles, read from their backing fields
    pub fn toggles(&self) -> CategoryToggleSet {
        let mut toggles = CategoryToggleSet::all_enabled();
        for category in Category::ALL {
            if let Some(field) = self.field(category.toggle_field()) {
                toggles.set(category, field.as_flag());
            }
        }
        toggles
    }

    /// Selected member of a choice group
    pub fn selected(&self, group: &str) -> Option<&str> {
        self.field(group).and_then(FormField::selected)
    }

    /// Clear every field to its default and re-enable all category toggles
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.clear();
        }
        for category in Category::ALL {
            if let Some(i) = self.index.get(category.toggle_field()) {
                self.fields[*i].value = FieldValue::Flag(true);
            }
        }
        self.active_field_index = 0;
    }

    /// Whether the field at `i` is shown under the given decisions.
    ///
    /// A field is shown when its section target, its own target and its
    /// gating choice group all allow it.
    pub fn is_field_visible(
        &self,
        i: usize,
        engine: &VisibilityEngine,
        decisions: &VisibilityDecisionSet,
    ) -> bool {
        let Some(field) = self.fields.get(i) else {
            return false;
        };
        let Some(decl) = self.schema.field(&field.name) else {
            return false;
        };
        let section_visible = self
            .section_of(i)
            .and_then(|s| s.target)
            .map_or(true, |t| decisions.is_visible(t));
        let own_visible = decl.target.map_or(true, |t| decisions.is_visible(t));
        let gate_open = decl
            .gate
            .map_or(true, |g| engine.evaluate_choice(g, self.selected(g)));
        section_visible && own_visible && gate_open
    }

    /// Indices of every field currently shown
    pub fn visible_indices(
        &self,
        engine: &VisibilityEngine,
        decisions: &VisibilityDecisionSet,
    ) -> Vec<usize> {
        (0..self.fields.len())
            .filter(|i| self.is_field_visible(*i, engine, decisions))
            .collect()
    }

    pub fn section_of(&self, i: usize) -> Option<&SectionDecl> {
        self.fields
            .get(i)
            .and_then(|f| self.schema.section_of(&f.name))
    }

    /// Move focus to the next shown field (wraps around)
    pub fn next_field(&mut self, visible: &[usize]) {
        if let Some(next) = visible
            .iter()
            .find(|i| **i > self.active_field_index)
            .or_else(|| visible.first())
        {
            self.active_field_index = *next;
        }
    }

    /// Move focus to the previous shown field (wraps around)
    pub fn prev_field(&mut self, visible: &[usize]) {
        if let Some(prev) = visible
            .iter()
            .rev()
            .find(|i| **i < self.active_field_index)
            .or_else(|| visible.last())
        {
            self.active_field_index = *prev;
        }
    }

    fn section_id(&self, i: usize) -> Option<&'static str> {
        self.section_of(i).map(|s| s.id)
    }

    /// Move focus to the first shown field of the next/previous section
    pub fn jump_section(&mut self, visible: &[usize], forward: bool) {
        let active = self.active_field_index;
        let current = self.section_id(active);
        let target = if forward {
            visible
                .iter()
                .copied()
                .find(|i| *i > active && self.section_id(*i) != current)
        } else {
            visible
                .iter()
                .rev()
                .copied()
                .filter(|i| *i < active)
                .find(|i| self.section_id(*i) != current)
                .map(|last| {
                    let section = self.section_id(last);
                    visible
                        .iter()
                        .copied()
                        .find(|i| self.section_id(*i) == section)
                        .unwrap_or(last)
                })
        };
        if let Some(i) = target {
            self.active_field_index = i;
        }
    }

    /// Keep focus on a shown field after visibility changed
    pub fn ensure_active_visible(&mut self, visible: &[usize]) {
        if visible.contains(&self.active_field_index) {
            return;
        }
        self.next_field(visible);
    }
}
