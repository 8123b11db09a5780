//! Input records and the validating view rules read them through.
use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

use crate::{
    utils::{
        conf::ValidationMode,
        error::{TraphError, TraphResult},
    },
    value::{NULL, Value},
};

pub mod record;

/// Read access to an input record.
pub trait InputRecord {
    /// Value stored under `key`, if any.
    fn field(&self, key: &str) -> Option<&Value>;

    /// Keys present in the record.
    fn field_names(&self) -> Vec<&str>;
}

impl<S: BuildHasher> InputRecord for HashMap<String, Value, S> {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }

    fn field_names(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }
}

impl InputRecord for BTreeMap<String, Value> {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }

    fn field_names(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }
}

/// Read-only view over an input record.
///
/// In [`ValidationMode::Strict`] reading an absent key fails fast with
/// [`TraphError::MissingInputField`]; in [`ValidationMode::PassThrough`] it yields the
/// `Value::Null` placeholder. The record itself is only borrowed.
pub struct InputView<'a, I> {
    record: &'a I,
    mode: ValidationMode,
}

impl<'a, I> Clone for InputView<'a, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, I> Copy for InputView<'a, I> {}

impl<'a, I: InputRecord> InputView<'a, I> {
    pub fn new(record: &'a I, mode: ValidationMode) -> Self {
        Self { record, mode }
    }

    /// Read `key`, checked according to the validation mode.
    pub fn get(&self, key: &str) -> TraphResult<&'a Value> {
        match self.record.field(key) {
            Some(value) => Ok(value),
            None => match self.mode {
                ValidationMode::Strict => Err(TraphError::MissingInputField {
                    key: key.to_string(),
                }),
                ValidationMode::PassThrough => Ok(&NULL),
            },
        }
    }

    /// Unchecked read, `None` when the key is absent regardless of the mode.
    pub fn try_get(&self, key: &str) -> Option<&'a Value> {
        self.record.field(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.record.field(key).is_some()
    }

    pub fn record(&self) -> &'a I {
        self.record
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }
}
