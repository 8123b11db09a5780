//! Rule compilation.
//!
//! A [`Shape`] is the input-independent half of a transform: the ordered field set and the
//! rule of every field. It is compiled once per rule mapping and shared read-only (through an
//! `Arc`) by every output bound from it; per-instance memoization state lives in
//! [`crate::instance::Output`].
use std::{collections::HashMap, fmt};

use log::{debug, trace};

use crate::{
    input::InputRecord,
    rules::{RuleFn, Rules},
    utils::error::{TraphError, TraphResult},
    value::Value,
};

/// A compiled field: its name and the rule computing it.
pub struct FieldDef<I, V> {
    pub name: String,
    pub rule: RuleFn<I, V>,
}

pub struct Shape<I, V = Value> {
    fields: Vec<FieldDef<I, V>>,
    index: HashMap<String, usize>,
}

impl<I: InputRecord, V> Shape<I, V> {
    /// Compile a rule mapping.
    ///
    /// Declined entries are left out of the shape. Empty or repeated field names are rejected
    /// here rather than surfacing as confusing reads later.
    pub fn compile(rules: Rules<I, V>) -> TraphResult<Self> {
        let mut fields = Vec::with_capacity(rules.len());
        let mut index = HashMap::with_capacity(rules.len());
        let mut declined: Vec<String> = Vec::new();

        for (name, rule) in rules.entries {
            if name.is_empty() {
                return Err(TraphError::EmptyFieldName);
            }
            if index.contains_key(&name) || declined.contains(&name) {
                return Err(TraphError::DuplicateField { field: name });
            }

            match rule {
                Some(rule) => {
                    index.insert(name.clone(), fields.len());
                    fields.push(FieldDef { name, rule });
                }
                None => {
                    trace!("Field '{name}' declined");
                    declined.push(name);
                }
            }
        }

        debug!(
            "Compiled shape with {} field(s) [{}], {} declined",
            fields.len(),
            fields
                .iter()
                .map(|f| f.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            declined.len()
        );

        Ok(Shape { fields, index })
    }
}

impl<I, V> Shape<I, V> {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in definition order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn field(&self, index: usize) -> Option<&FieldDef<I, V>> {
        self.fields.get(index)
    }

    pub fn fields(&self) -> &[FieldDef<I, V>] {
        &self.fields
    }
}

impl<I, V> fmt::Debug for Shape<I, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("fields", &self.field_names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        input::{InputView, record::Record},
        instance::Output,
    };

    fn zero<'a>(_: &InputView<'a, Record>, _: &Output<'a, Record>) -> TraphResult<Value> {
        Ok(Value::Int(0))
    }

    #[test]
    fn keeps_definition_order() {
        let rules = Rules::<Record>::new()
            .rule("zeta", |_, _| Ok(Value::Int(1)))
            .rule("alpha", |_, _| Ok(Value::Int(2)))
            .rule("mid", zero);
        let shape = Shape::compile(rules).unwrap();

        assert_eq!(
            shape.field_names().collect::<Vec<_>>(),
            vec!["zeta", "alpha", "mid"]
        );
        assert_eq!(shape.index_of("alpha"), Some(1));
        assert!(!shape.contains("beta"));
    }

    #[test]
    fn declined_rules_are_omitted() {
        let rules = Rules::<Record>::new()
            .rule_opt("kept", Some(zero))
            .decline("dropped")
            .rule_opt("switched_off", Some(zero).filter(|_| false));
        let shape = Shape::compile(rules).unwrap();

        assert_eq!(shape.field_names().collect::<Vec<_>>(), vec!["kept"]);
        assert_eq!(shape.len(), 1);
    }

    #[test]
    fn rejects_duplicates_and_empty_names() {
        let rules = Rules::<Record>::new().rule("a", zero).rule("a", zero);
        match Shape::compile(rules).unwrap_err() {
            TraphError::DuplicateField { field } => assert_eq!(field, "a"),
            other => panic!("unexpected error {other:?}"),
        }

        let rules = Rules::<Record>::new().decline("a").rule("a", zero);
        assert!(Shape::compile(rules).unwrap_err().is_duplicate_field());

        let rules = Rules::<Record>::new().rule("", zero);
        assert!(Shape::compile(rules).unwrap_err().is_empty_field_name());
    }

    #[test]
    fn empty_mapping_compiles() {
        let shape = Shape::compile(Rules::<Record>::new()).unwrap();
        assert!(shape.is_empty());
    }
}
