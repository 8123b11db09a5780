use smallvec::SmallVec;

use crate::{input::InputRecord, value::Value};

/// Ordered input record.
///
/// Keys keep their insertion order; inserting an existing key replaces its value in place.
/// Most records are small, so up to eight fields are kept inline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: SmallVec<(String, Value), 8>,
}

/// Build a [`Record`] from `key => value` pairs.
///
/// ```
/// let person = traph::record! { "first" => "caesar", "age" => 36 };
/// assert_eq!(person.get("age").and_then(|v| v.as_int()), Some(36));
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::input::record::Record::new()
    };
    (
        $( $key:expr => $value:expr ),+
        $(,)?
    ) => {
        {
            let mut record = $crate::input::record::Record::new();
            $(
                record.insert($key, $value);
            )+
            record
        }
    };
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Record::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a field, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();

        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl InputRecord for Record {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }

    fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(k, _)| k.as_str()).collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}
