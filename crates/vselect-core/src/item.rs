#![forbid(unsafe_code)]

//! Selectable items.
//!
//! An [`Item`] is an `{ id, text }` pair. Identity is the [`ItemId`]: two
//! items with the same id are the same option, whatever their text.

use std::fmt;

/// Identifier of a selectable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemId(pub i64);

impl ItemId {
    /// Raw integer value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<i32> for ItemId {
    fn from(id: i32) -> Self {
        Self(i64::from(id))
    }
}

impl From<u32> for ItemId {
    fn from(id: u32) -> Self {
        Self(i64::from(id))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A selectable option.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    /// Unique identifier.
    pub id: ItemId,
    /// Display text, also the filter target.
    pub text: String,
}

impl Item {
    /// Create a new item.
    #[must_use]
    pub fn new(id: impl Into<ItemId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Copy of this item with surrounding whitespace removed from the text.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            id: self.id,
            text: self.text.trim().to_owned(),
        }
    }
}

impl<I: Into<ItemId>, S: Into<String>> From<(I, S)> for Item {
    fn from((id, text): (I, S)) -> Self {
        Self::new(id, text)
    }
}
