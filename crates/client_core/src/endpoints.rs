//! Index-addressed list editor used for contract endpoint names.
//!
//! Every edit returns a fresh list and leaves the receiver untouched, so an
//! index held by the caller keeps pointing at the same entry until the caller
//! adopts the new list.

use crate::error::StudioError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedList<T> {
    entries: Vec<T>,
    minimum: usize,
}

pub type EndpointList = OrderedList<String>;

impl<T: Clone> OrderedList<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            minimum: 0,
        }
    }

    pub fn from_entries(entries: impl IntoIterator<Item = T>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            minimum: 0,
        }
    }

    /// Sets the floor enforced by [`OrderedList::remove`]. The current entries
    /// are not padded; the floor only stops removals.
    pub fn with_minimum(mut self, minimum: usize) -> Self {
        self.minimum = minimum;
        self
    }

    pub fn minimum(&self) -> usize {
        self.minimum
    }

    pub fn insert_at_end(&self, value: T) -> Self {
        let mut entries = self.entries.clone();
        entries.push(value);
        Self {
            entries,
            minimum: self.minimum,
        }
    }

    pub fn update(&self, index: usize, value: T) -> Result<Self, StudioError> {
        self.check_index(index)?;
        let mut entries = self.entries.clone();
        entries[index] = value;
        Ok(Self {
            entries,
            minimum: self.minimum,
        })
    }

    pub fn remove(&self, index: usize) -> Result<Self, StudioError> {
        self.check_index(index)?;
        if self.entries.len() <= self.minimum {
            return Err(StudioError::BelowMinimum {
                minimum: self.minimum,
            });
        }
        let entries = self
            .entries
            .iter()
            .enumerate()
            .filter(|(position, _)| *position != index)
            .map(|(_, entry)| entry.clone())
            .collect();
        Ok(Self {
            entries,
            minimum: self.minimum,
        })
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.entries
    }

    fn check_index(&self, index: usize) -> Result<(), StudioError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(StudioError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }
}

impl<T: Clone> Default for OrderedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl EndpointList {
    /// The form starts with a single blank endpoint row.
    pub fn blank() -> Self {
        Self::from_entries([String::new()])
    }

    /// Entries with surrounding whitespace removed, blanks skipped.
    pub fn named(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .map(|entry| entry.trim())
            .filter(|entry| !entry.is_empty())
    }
}

impl<'a, T> IntoIterator for &'a OrderedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
#[path = "tests/endpoints_tests.rs"]
mod tests;
