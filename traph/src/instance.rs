//! Output instances: one input bound to a shared shape, with per-field memoization.
use std::{fmt, sync::Arc};

use log::trace;
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    input::{InputRecord, InputView},
    magic::WARN_VALIDATION_DISABLED,
    shape::Shape,
    utils::{
        conf::ValidationMode,
        diag::Diagnostics,
        error::{TraphError, TraphResult},
        lazy::MemoSlot,
    },
    value::Value,
};

/// A derived record bound to one input.
///
/// Every field of the shape is readable from creation on; reading one runs its rule the first
/// time and returns the cached value afterwards. Rules read sibling fields through the same
/// accessors, so dependencies are resolved by the reads themselves, in whatever order the
/// rules ask for them.
///
/// Instances never share memoization state: binding the same input twice yields two
/// independent outputs.
pub struct Output<'a, I, V = Value> {
    shape: Arc<Shape<I, V>>,
    input: InputView<'a, I>,
    slots: Box<[MemoSlot<V>]>,
}

impl<'a, I: InputRecord, V> Output<'a, I, V> {
    /// Bind `input` to `shape`. No rule runs here.
    ///
    /// Binding without validation reports [`WARN_VALIDATION_DISABLED`] to `diagnostics`.
    pub fn bind(
        shape: Arc<Shape<I, V>>,
        input: &'a I,
        validation: ValidationMode,
        diagnostics: &Diagnostics,
    ) -> Self {
        if validation == ValidationMode::PassThrough {
            diagnostics.warn_once(WARN_VALIDATION_DISABLED);
        }

        let slots = (0..shape.len()).map(|_| MemoSlot::new()).collect();
        Self {
            shape,
            input: InputView::new(input, validation),
            slots,
        }
    }

    /// Read field `field`, evaluating it on first access.
    pub fn get(&self, field: &str) -> TraphResult<&V> {
        let index = self
            .shape
            .index_of(field)
            .ok_or_else(|| TraphError::UnknownField {
                field: field.to_string(),
            })?;
        self.get_index(index)
    }

    fn get_index(&self, index: usize) -> TraphResult<&V> {
        let def = &self.shape.fields()[index];

        self.slots[index].get_or_evaluate(&def.name, || {
            trace!("Evaluating field '{}'", def.name);
            (def.rule)(&self.input, self)
        })
    }

    /// Force every field, in definition order.
    ///
    /// Stops at the first failing rule; fields evaluated before it keep their values.
    pub fn materialize(&self) -> TraphResult<()> {
        for index in 0..self.slots.len() {
            self.get_index(index)?;
        }
        Ok(())
    }
}

impl<'a, I, V> Output<'a, I, V> {
    /// Cached value of `field`, without evaluating it.
    pub fn peek(&self, field: &str) -> Option<&V> {
        let index = self.shape.index_of(field)?;
        self.slots[index].peek()
    }

    pub fn is_evaluated(&self, field: &str) -> bool {
        self.shape
            .index_of(field)
            .is_some_and(|index| self.slots[index].is_evaluated())
    }

    /// Every field name, evaluated or not, in definition order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.shape.field_names()
    }

    /// Names of the fields evaluated so far, in definition order.
    pub fn evaluated_keys(&self) -> Vec<&str> {
        self.evaluated().map(|(name, _)| name).collect()
    }

    /// Evaluated fields and their values, in definition order.
    pub fn evaluated(&self) -> impl Iterator<Item = (&str, &V)> {
        self.shape
            .fields()
            .iter()
            .zip(self.slots.iter())
            .filter_map(|(def, slot)| slot.peek().map(|value| (def.name.as_str(), value)))
    }

    pub fn input(&self) -> &InputView<'a, I> {
        &self.input
    }

    pub fn shape(&self) -> &Arc<Shape<I, V>> {
        &self.shape
    }

    /// Number of fields (evaluated or not).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Shows the evaluated fields only.
impl<'a, I, V: fmt::Debug> fmt::Debug for Output<'a, I, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.evaluated()).finish()
    }
}

/// Serializes the evaluated fields as a map.
impl<'a, I, V: Serialize> Serialize for Output<'a, I, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.evaluated().count()))?;
        for (name, value) in self.evaluated() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{input::record::Record, record, rules::Rules};

    fn chain_shape(calls: Arc<AtomicUsize>) -> Arc<Shape<Record>> {
        let rules = Rules::<Record>::new()
            .rule("a", move |i, _| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(i.get("x")?.clone())
            })
            .rule("b", |_, o| {
                let a = o
                    .get("a")?
                    .as_int()
                    .ok_or_else(|| TraphError::rule("a is not an int"))?;
                Ok(Value::Int(a + 1))
            });
        Arc::new(Shape::compile(rules).unwrap())
    }

    #[test]
    fn sibling_read_evaluates_dependency_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let shape = chain_shape(Arc::clone(&calls));
        let input = record! { "x" => 5 };
        let output = Output::bind(shape, &input, ValidationMode::Strict, &Diagnostics::new());

        assert!(output.evaluated_keys().is_empty());
        assert_eq!(output.get("b").unwrap(), &Value::Int(6));
        assert_eq!(output.evaluated_keys(), vec!["a", "b"]);
        assert_eq!(output.get("a").unwrap(), &Value::Int(5));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn evaluated_views_agree() {
        let shape = chain_shape(Arc::new(AtomicUsize::new(0)));
        let input = record! { "x" => 5 };
        let output = Output::bind(shape, &input, ValidationMode::Strict, &Diagnostics::new());

        output.get("a").unwrap();
        let evaluated = output.evaluated_keys();
        for key in output.keys() {
            let done = output.is_evaluated(key);
            assert_eq!(done, evaluated.contains(&key), "{key}");
            assert_eq!(done, output.peek(key).is_some(), "{key}");
        }
        assert_eq!(output.evaluated().count(), 1);
    }

    #[test]
    fn unknown_field_is_reported() {
        let shape = chain_shape(Arc::new(AtomicUsize::new(0)));
        let input = record! { "x" => 5 };
        let output = Output::bind(shape, &input, ValidationMode::Strict, &Diagnostics::new());

        assert!(output.get("c").unwrap_err().is_unknown_field());
        assert!(!output.is_evaluated("c"));
        assert_eq!(output.peek("c"), None);
    }

    #[test]
    fn pass_through_binding_warns_once_per_sink() {
        let shape = chain_shape(Arc::new(AtomicUsize::new(0)));
        let input = record! { "x" => 5 };
        let diagnostics = Diagnostics::new();

        let _first = Output::bind(
            Arc::clone(&shape),
            &input,
            ValidationMode::PassThrough,
            &diagnostics,
        );
        let _second = Output::bind(shape, &input, ValidationMode::PassThrough, &diagnostics);

        assert_eq!(diagnostics.messages(), vec![WARN_VALIDATION_DISABLED]);
    }

    #[test]
    fn debug_shows_evaluated_fields_only() {
        let shape = chain_shape(Arc::new(AtomicUsize::new(0)));
        let input = record! { "x" => 5 };
        let output = Output::bind(shape, &input, ValidationMode::Strict, &Diagnostics::new());

        assert_eq!(format!("{:?}", output), "{}");
        output.get("a").unwrap();
        assert_eq!(format!("{:?}", output), "{\"a\": Int(5)}");
    }
}
