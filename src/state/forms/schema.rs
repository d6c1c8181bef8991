//! Declarative form schema and setup-time validation

use super::field::FieldKind;
use crate::visibility::{
    ChoiceGroup, ExclusionRule, ExclusivePair, TargetId, TargetOwner, VisibilityEngine,
    VisibilityTarget,
};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// A declared field and the visibility rules it participates in
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Visibility target owning this field, if any
    pub target: Option<TargetId>,
    /// Choice group whose affirmative answer reveals this field
    pub gate: Option<&'static str>,
}

impl FieldDecl {
    pub fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            target: None,
            gate: None,
        }
    }

    pub fn owned_by(mut self, target: TargetId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn gated_by(mut self, group: &'static str) -> Self {
        self.gate = Some(group);
        self
    }
}

/// A titled group of fields, optionally owned by a visibility target
#[derive(Debug, Clone)]
pub struct SectionDecl {
    pub id: &'static str,
    pub title: &'static str,
    pub target: Option<TargetId>,
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    pub sections: Vec<SectionDecl>,
    pub targets: Vec<VisibilityTarget>,
    pub groups: Vec<ChoiceGroup>,
    pub pairs: Vec<ExclusivePair>,
}

/// Configuration errors detected when a form is set up
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),
    #[error("target `{0}` is declared more than once")]
    DuplicateTarget(String),
    #[error("`{owner}` references undeclared target `{target}`")]
    UnknownTarget { owner: String, target: String },
    #[error("aggregate target `{0}` has no categories")]
    EmptyAggregate(String),
    #[error("choice group `{0}` does not name a choice field")]
    GroupNotChoice(String),
    #[error("choice group `{group}` affirmative value `{value}` is not one of its options")]
    UnknownAffirmative { group: String, value: String },
    #[error("field `{field}` is gated by undeclared choice group `{group}`")]
    UnknownGroup { field: String, group: String },
    #[error("exclusive pair `{first}`/`{second}` must name two distinct checkbox fields")]
    InvalidPair { first: String, second: String },
}

impl FormSchema {
    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields().find(|f| f.name == name)
    }

    /// Section that declares the field `name`
    pub fn section_of(&self, name: &str) -> Option<&SectionDecl> {
        self.sections
            .iter()
            .find(|s| s.fields.iter().any(|f| f.name == name))
    }

    pub fn engine(&self) -> VisibilityEngine {
        VisibilityEngine::new(self.targets.clone(), self.groups.clone())
    }

    pub fn exclusion_rule(&self) -> ExclusionRule {
        ExclusionRule::new(self.pairs.clone())
    }

    /// Check every cross-reference in the schema
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut kinds: HashMap<&str, FieldKind> = HashMap::new();
        for field in self.fields() {
            if kinds.insert(field.name, field.kind).is_some() {
                return Err(SchemaError::DuplicateField(field.name.to_string()));
            }
        }

        let mut target_ids = HashSet::new();
        for target in &self.targets {
            if !target_ids.insert(target.id) {
                return Err(SchemaError::DuplicateTarget(target.id.to_string()));
            }
            if matches!(&target.owner, TargetOwner::Any(categories) if categories.is_empty()) {
                return Err(SchemaError::EmptyAggregate(target.id.to_string()));
            }
        }

        let check_target = |owner: &str, target: Option<TargetId>| match target {
            Some(id) if !target_ids.contains(id) => Err(SchemaError::UnknownTarget {
                owner: owner.to_string(),
                target: id.to_string(),
            }),
            _ => Ok(()),
        };
        for section in &self.sections {
            check_target(section.id, section.target)?;
            for field in &section.fields {
                check_target(field.name, field.target)?;
            }
        }

        for group in &self.groups {
            match kinds.get(group.field) {
                Some(FieldKind::Choice(options)) => {
                    if !options.contains(&group.affirmative) {
                        return Err(SchemaError::UnknownAffirmative {
                            group: group.field.to_string(),
                            value: group.affirmative.to_string(),
                        });
                    }
                }
                _ => return Err(SchemaError::GroupNotChoice(group.field.to_string())),
            }
        }
        for field in self.fields() {
            if let Some(gate) = field.gate {
                if !self.groups.iter().any(|g| g.field == gate) {
                    return Err(SchemaError::UnknownGroup {
                        field: field.name.to_string(),
                        group: gate.to_string(),
                    });
                }
            }
        }

        for pair in &self.pairs {
            let is_flag = |name: &str| matches!(kinds.get(name), Some(FieldKind::Boolean));
            if pair.first == pair.second || !is_flag(pair.first) || !is_flag(pair.second) {
                return Err(SchemaError::InvalidPair {
                    first: pair.first.to_string(),
                    second: pair.second.to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visibility::Category;

    fn schema() -> FormSchema {
        FormSchema {
            sections: vec![SectionDecl {
                id: "subsidies",
                title: "Subsidies",
                target: None,
                fields: vec![
                    FieldDecl::new("voucherOffered", "Voucher", FieldKind::Choice(&["yes", "no"])),
                    FieldDecl::new("voucherCount", "Recipients", FieldKind::Number)
                        .gated_by("voucherOffered"),
                    FieldDecl::new("jhsLPT", "JHS LPT", FieldKind::Number).owned_by("jhsRow"),
                    FieldDecl::new("a_evident", "Evident", FieldKind::Boolean),
                    FieldDecl::new("a_not", "Not evident", FieldKind::Boolean),
                ],
            }],
            targets: vec![VisibilityTarget::single("jhsRow", Category::Jhs)],
            groups: vec![ChoiceGroup {
                field: "voucherOffered",
                affirmative: "yes",
            }],
            pairs: vec![ExclusivePair::new("a_evident", "a_not")],
        }
    }

    #[test]
    fn test_valid_schema_passes() {
        assert_eq!(schema().validate(), Ok(()));
    }

    #[test]
    fn test_duplicate_field() {
        let mut schema = schema();
        schema.sections[0]
            .fields
            .push(FieldDecl::new("jhsLPT", "Again", FieldKind::Text));
        assert_eq!(
            schema.validate(),
            Err(SchemaError::DuplicateField("jhsLPT".into()))
        );
    }

    #[test]
    fn test_unknown_target() {
        let mut schema = schema();
        schema.sections[0].target = Some("shsLabsSection");
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::UnknownTarget { .. })
        ));
    }

    #[test]
    fn test_empty_aggregate() {
        let mut schema = schema();
        schema.targets.push(VisibilityTarget::any("nothing", &[]));
        assert_eq!(
            schema.validate(),
            Err(SchemaError::EmptyAggregate("nothing".into()))
        );
    }

    #[test]
    fn test_group_must_be_choice() {
        let mut schema = schema();
        schema.groups.push(ChoiceGroup {
            field: "jhsLPT",
            affirmative: "yes",
        });
        assert_eq!(
            schema.validate(),
            Err(SchemaError::GroupNotChoice("jhsLPT".into()))
        );
    }

    #[test]
    fn test_affirmative_must_be_an_option() {
        let mut schema = schema();
        schema.groups[0].affirmative = "oo";
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::UnknownAffirmative { .. })
        ));
    }

    #[test]
    fn test_gate_must_name_a_group() {
        let mut schema = schema();
        schema.sections[0].fields[1].gate = Some("escOffered");
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::UnknownGroup { .. })
        ));
    }

    #[test]
    fn test_pair_must_be_two_checkboxes() {
        let mut schema = schema();
        schema.pairs.push(ExclusivePair::new("a_evident", "jhsLPT"));
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::InvalidPair { .. })
        ));
    }

    #[test]
    fn test_section_of() {
        let schema = schema();
        assert_eq!(schema.section_of("a_not").map(|s| s.id), Some("subsidies"));
        assert!(schema.section_of("missing").is_none());
    }
}
