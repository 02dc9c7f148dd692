//! # Selection Tracker
//!
//! Holds the ids of the checked rows, in the order they were checked. That
//! order is the order bulk mutations are dispatched in.
//!
//! "Select all" means every record passing the current filter, on every page,
//! not just the visible page and not the whole unfiltered dataset.
//!
//! Changing the filter does not prune the selection. Ids that no longer pass
//! the filter stay selected until the user clears them, commits, or deletes.

use crate::model::RecordId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<RecordId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[RecordId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.ids.contains(id)
    }

    /// Adds `id` if absent, removes it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &RecordId) -> bool {
        if let Some(pos) = self.ids.iter().position(|selected| selected == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id.clone());
            true
        }
    }

    /// True when the selection size equals a non-zero filtered count.
    pub fn is_all_selected(&self, filtered_count: usize) -> bool {
        filtered_count > 0 && self.ids.len() == filtered_count
    }

    /// Header checkbox: clears when everything is selected, otherwise selects
    /// exactly the filtered ids (replacing whatever was selected before).
    pub fn toggle_all<'a, I>(&mut self, filtered: I)
    where
        I: IntoIterator<Item = &'a RecordId>,
    {
        let filtered: Vec<RecordId> = filtered.into_iter().cloned().collect();
        if self.is_all_selected(filtered.len()) {
            self.clear();
        } else {
            self.ids = filtered;
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drops the given id if selected.
    pub fn remove(&mut self, id: &RecordId) {
        self.ids.retain(|selected| selected != id);
    }

    /// Takes the ids out, leaving the selection empty.
    pub fn take(&mut self) -> Vec<RecordId> {
        std::mem::take(&mut self.ids)
    }
}
