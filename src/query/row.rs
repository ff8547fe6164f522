//! Result row type
//!
//! A row keeps its columns in backend order so positional access ("first column")
//! and name lookup both work.

use std::collections::HashMap;

/// One result record: column names mapped to nullable text values
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    columns: Vec<(String, Option<String>)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, keeping insertion order
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: Option<impl Into<String>>) {
        self.columns.push((name.into(), value.map(Into::into)));
    }

    /// Value of the named column. `None` when the column is absent,
    /// `Some(None)` when it is SQL NULL.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value.as_deref())
    }

    /// Value at a column position
    pub fn value_at(&self, index: usize) -> Option<Option<&str>> {
        self.columns.get(index).map(|(_, value)| value.as_deref())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate `(name, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    pub fn into_map(self) -> HashMap<String, Option<String>> {
        self.columns.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, Option<V>)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (name, value) in iter {
            row.push(name, value);
        }
        row
    }
}
