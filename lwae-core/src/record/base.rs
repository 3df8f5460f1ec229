//! Base implementation of records for logging.
use crate::error::LwaeError;
use chrono::prelude::{DateTime, Local};
use std::{
    collections::{
        hash_map::{IntoIter, Iter, Keys},
        HashMap,
    },
    convert::Into,
    iter::IntoIterator,
};

/// Represents possible types of values in a [`Record`].
#[derive(Debug, Clone)]
pub enum RecordValue {
    /// A single floating-point value, typically a loss.
    Scalar(f32),

    /// A timestamp with local timezone.
    DateTime(DateTime<Local>),

    /// A text value.
    String(String),
}

/// A container of named values.
#[derive(Debug)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Returns an iterator over the keys in the record.
    pub fn keys(&self) -> Keys<String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Returns an iterator that consumes the record.
    pub fn into_iter_in_record(self) -> IntoIter<String, RecordValue> {
        self.0.into_iter()
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Returns `true` if the record has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merges two records, consuming both.
    ///
    /// If both records contain the same key, the value from `record`
    /// overwrites the value from `self`.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Gets a scalar value associated with the given key.
    pub fn get_scalar(&self, k: &str) -> Result<f32, LwaeError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            _ => Err(LwaeError::RecordValueTypeError(k.into())),
        }
    }

    /// Gets a string value associated with the given key.
    pub fn get_string(&self, k: &str) -> Result<String, LwaeError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            _ => Err(LwaeError::RecordValueTypeError(k.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Record, RecordValue::Scalar};

    #[test]
    fn test_merge_and_get() {
        let record = Record::from_slice(&[("a", Scalar(1.0)), ("b", Scalar(2.0))]);
        let record = record.merge(Record::from_scalar("b", 3.0));

        assert_eq!(record.get_scalar("a").unwrap(), 1.0);
        assert_eq!(record.get_scalar("b").unwrap(), 3.0);
        assert!(record.get_scalar("c").is_err());
    }
}
