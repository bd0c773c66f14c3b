#![forbid(unsafe_code)]

//! Selection state.
//!
//! An ordered list of selected items, unique by id. Insertion order is
//! display order for tags and decides which item counts as "first" when the
//! dropdown scrolls to the selection. In single mode the list never holds
//! more than one item.

use std::collections::HashSet;

use vselect_core::{Item, ItemId, SelectMode, SelectValue, serialize_ids};

use crate::item_store::ItemStore;

/// What [`Selection::toggle`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Multiple mode: the item was appended.
    Added,
    /// Multiple mode: the item was removed.
    Removed,
    /// Single mode: the item replaced the selection.
    Replaced,
}

/// Result of resolving a [`SelectValue`] against a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Resolved items, deduplicated, in value order.
    pub items: Vec<Item>,
    /// Tokens that matched no item (`None` for malformed tokens).
    pub unresolved: Vec<Option<ItemId>>,
}

/// Ordered, id-deduplicated selection.
#[derive(Debug, Clone)]
pub struct Selection {
    mode: SelectMode,
    items: Vec<Item>,
    ids: HashSet<ItemId>,
}

impl Selection {
    /// Empty selection in `mode`.
    #[must_use]
    pub fn new(mode: SelectMode) -> Self {
        Self {
            mode,
            items: Vec::new(),
            ids: HashSet::new(),
        }
    }

    /// The selection mode.
    #[must_use]
    pub fn mode(&self) -> SelectMode {
        self.mode
    }

    /// Selected items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// First selected item.
    #[must_use]
    pub fn first(&self) -> Option<&Item> {
        self.items.first()
    }

    /// Number of selected items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether `id` is selected.
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.ids.contains(&id)
    }

    /// Toggle `item`.
    ///
    /// Multiple mode removes a selected item and appends an unselected one.
    /// Single mode always replaces the selection with `item`.
    pub fn toggle(&mut self, item: Item) -> ToggleOutcome {
        match self.mode {
            SelectMode::Single => {
                self.ids.clear();
                self.ids.insert(item.id);
                self.items.clear();
                self.items.push(item);
                ToggleOutcome::Replaced
            }
            SelectMode::Multiple => {
                if self.remove(item.id) {
                    ToggleOutcome::Removed
                } else {
                    self.ids.insert(item.id);
                    self.items.push(item);
                    ToggleOutcome::Added
                }
            }
        }
    }

    /// Remove the item with `id`. Returns `false` if it was not selected.
    pub fn remove(&mut self, id: ItemId) -> bool {
        if !self.ids.remove(&id) {
            return false;
        }
        self.items.retain(|item| item.id != id);
        true
    }

    /// Remove everything. Returns `false` if already empty.
    pub fn clear(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.items.clear();
        self.ids.clear();
        true
    }

    /// Resolve `value` against the dataset without touching the selection.
    ///
    /// Unknown ids are reported in [`Resolution::unresolved`]; duplicates
    /// keep their first occurrence; single mode keeps the first resolved
    /// item. Resolved texts are whitespace-trimmed.
    #[must_use]
    pub fn resolve(&self, value: &SelectValue, store: &ItemStore) -> Resolution {
        let mut resolution = Resolution::default();
        let mut seen = HashSet::new();
        for token in value.tokens(self.mode) {
            match token.and_then(|id| store.find(id)) {
                Some(item) => {
                    if seen.insert(item.id) {
                        resolution.items.push(item.trimmed());
                    }
                }
                None => resolution.unresolved.push(token),
            }
        }
        if self.mode == SelectMode::Single {
            resolution.items.truncate(1);
        }
        resolution
    }

    /// Replace the whole selection at once.
    ///
    /// Duplicates are dropped and single mode keeps only the first item.
    pub fn replace(&mut self, items: Vec<Item>) {
        let mut ids = HashSet::with_capacity(items.len());
        let mut kept: Vec<Item> = items
            .into_iter()
            .filter(|item| ids.insert(item.id))
            .collect();
        if self.mode == SelectMode::Single && kept.len() > 1 {
            kept.truncate(1);
            ids.retain(|id| *id == kept[0].id);
        }
        self.items = kept;
        self.ids = ids;
    }

    /// Serialize in attribute format (see [`serialize_ids`]).
    #[must_use]
    pub fn serialize(&self) -> String {
        serialize_ids(&self.items, self.mode)
    }
}
