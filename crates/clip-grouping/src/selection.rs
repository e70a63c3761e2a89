//! Multi-selection of clips across day, month and place views.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Set of selected clip identifiers.
///
/// Mutation goes through `&mut self`, so a selection has a single writer at a
/// time; share it behind a lock if several tasks need to update it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    ids: HashSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`, returning whether it is now selected
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// True iff every id is selected. Vacuously true for no ids, so callers
    /// showing a bucket checkmark must treat empty buckets separately.
    pub fn all_selected<I, S>(&self, ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter().all(|id| self.ids.contains(id.as_ref()))
    }

    /// True iff some but not all of the ids are selected
    pub fn partially_selected<I, S>(&self, ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (mut any, mut all) = (false, true);
        for id in ids {
            if self.ids.contains(id.as_ref()) {
                any = true;
            } else {
                all = false;
            }
        }
        any && !all
    }

    pub fn union<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ids.extend(ids.into_iter().map(|id| id.as_ref().to_string()));
    }

    pub fn subtract<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for id in ids {
            self.ids.remove(id.as_ref());
        }
    }

    /// Bucket checkbox: deselect the bucket when fully selected, otherwise
    /// select all of it. An empty bucket is left untouched.
    pub fn toggle_all<S: AsRef<str>>(&mut self, ids: &[S]) {
        if ids.is_empty() {
            return;
        }
        if self.all_selected(ids) {
            self.subtract(ids);
        } else {
            self.union(ids);
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
