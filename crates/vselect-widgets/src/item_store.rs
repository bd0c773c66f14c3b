#![forbid(unsafe_code)]

//! Dataset and filtered view.
//!
//! The store owns the full dataset and the active filter text. The filtered
//! view is kept as ascending dataset indices, so it is always an
//! order-preserving subsequence of the dataset. Matching is a
//! case-insensitive substring test against each item's text; lowercased
//! texts are computed once per dataset.

use vselect_core::{Item, ItemId};

/// Full dataset plus the current filter.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    data: Vec<Item>,
    folded: Vec<String>,
    query: String,
    filtered: Vec<usize>,
}

impl ItemStore {
    /// Create a store with an unfiltered view of `data`.
    #[must_use]
    pub fn new(data: Vec<Item>) -> Self {
        let mut store = Self::default();
        store.set_data(data);
        store
    }

    /// Replace the dataset and re-apply the current filter.
    pub fn set_data(&mut self, data: Vec<Item>) {
        self.folded = data.iter().map(|item| item.text.to_lowercase()).collect();
        self.data = data;
        self.recompute();
    }

    /// Filter by `query` (case-insensitive substring). Empty shows everything.
    pub fn filter(&mut self, query: &str) {
        self.query = query.to_lowercase();
        self.recompute();
    }

    /// Clear the filter.
    pub fn reset_filter(&mut self) {
        self.query.clear();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.filtered.clear();
        if self.query.is_empty() {
            self.filtered.extend(0..self.data.len());
            return;
        }
        let query = self.query.as_str();
        self.filtered.extend(
            self.folded
                .iter()
                .enumerate()
                .filter(|(_, text)| text.contains(query))
                .map(|(i, _)| i),
        );
    }

    /// The dataset.
    #[must_use]
    pub fn data(&self) -> &[Item] {
        &self.data
    }

    /// Active filter text, lowercased.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Number of items in the filtered view.
    #[must_use]
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Item at `index` of the filtered view.
    #[must_use]
    pub fn filtered_get(&self, index: usize) -> Option<&Item> {
        self.filtered.get(index).map(|&i| &self.data[i])
    }

    /// Iterate the filtered view.
    pub fn filtered(&self) -> impl Iterator<Item = &Item> + '_ {
        self.filtered.iter().map(|&i| &self.data[i])
    }

    /// Dataset indices of the filtered view.
    #[must_use]
    pub fn filtered_indices(&self) -> &[usize] {
        &self.filtered
    }

    /// Items at filtered positions `start..end`, clamped.
    pub fn filtered_slice(&self, start: usize, end: usize) -> impl Iterator<Item = &Item> + '_ {
        let end = end.min(self.filtered.len());
        let start = start.min(end);
        self.filtered[start..end].iter().map(|&i| &self.data[i])
    }

    /// Position of `id` in the filtered view.
    #[must_use]
    pub fn filtered_position(&self, id: ItemId) -> Option<usize> {
        self.filtered.iter().position(|&i| self.data[i].id == id)
    }

    /// Find an item in the dataset by id.
    #[must_use]
    pub fn find(&self, id: ItemId) -> Option<&Item> {
        self.data.iter().find(|item| item.id == id)
    }
}
