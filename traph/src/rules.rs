use std::{fmt, sync::Arc};

use crate::{
    input::{InputRecord, InputView},
    instance::Output,
    utils::error::TraphResult,
    value::Value,
};

/// A derivation rule: computes one output field from the input view and the output itself.
///
/// Rules may read sibling fields through the output they receive; those fields are evaluated
/// on demand and cached like any other read.
pub type RuleFn<I, V> =
    Arc<dyn for<'a> Fn(&InputView<'a, I>, &Output<'a, I, V>) -> TraphResult<V> + Send + Sync>;

/// Ordered rule mapping, the source a [`crate::shape::Shape`] is compiled from.
///
/// Entries keep their definition order, which is also the enumeration and forcing order of
/// every output built from them. An entry without a rule (see [`Rules::decline`]) is dropped
/// at compile time and never shows up in outputs.
pub struct Rules<I, V = Value> {
    pub(crate) entries: Vec<(String, Option<RuleFn<I, V>>)>,
}

impl<I: InputRecord, V> Rules<I, V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Define field `name` with `rule`.
    pub fn rule<F>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: for<'a> Fn(&InputView<'a, I>, &Output<'a, I, V>) -> TraphResult<V>
            + Send
            + Sync
            + 'static,
    {
        let rule: RuleFn<I, V> = Arc::new(rule);
        self.entries.push((name.into(), Some(rule)));
        self
    }

    /// Define field `name` when `rule` is `Some`, decline it otherwise.
    pub fn rule_opt<F>(self, name: impl Into<String>, rule: Option<F>) -> Self
    where
        F: for<'a> Fn(&InputView<'a, I>, &Output<'a, I, V>) -> TraphResult<V>
            + Send
            + Sync
            + 'static,
    {
        match rule {
            Some(rule) => self.rule(name, rule),
            None => self.decline(name),
        }
    }

    /// Record that field `name` is deliberately left undefined.
    pub fn decline(mut self, name: impl Into<String>) -> Self {
        self.entries.push((name.into(), None));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of all entries, declined ones included.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl<I: InputRecord, V> Default for Rules<I, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, V> Clone for Rules<I, V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<I, V> fmt::Debug for Rules<I, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(name, rule)| (name, if rule.is_some() { "rule" } else { "declined" })),
            )
            .finish()
    }
}
