#![forbid(unsafe_code)]

//! Selection values: parsing, coercion, and serialization.
//!
//! A value can be given as a single id, a list of ids, or a string. Strings
//! follow the attribute format: in multiple mode a comma-joined id list
//! (`"1,2,3"`), in single mode one id. Tokens are read like a lenient
//! integer parse: leading whitespace and a sign are accepted, parsing stops
//! at the first non-digit, and a token without digits yields `None`, an
//! id that resolves to nothing.

use crate::item::{Item, ItemId};

/// Selection mode, fixed for the lifetime of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SelectMode {
    /// At most one selected item; picking an item closes the dropdown.
    #[default]
    Single,
    /// Any number of selected items, shown as tags.
    Multiple,
}

impl SelectMode {
    /// Whether this is [`SelectMode::Multiple`].
    #[inline]
    #[must_use]
    pub const fn is_multiple(self) -> bool {
        matches!(self, Self::Multiple)
    }

    /// Mode from the `multiple` flag.
    #[inline]
    #[must_use]
    pub const fn from_multiple(multiple: bool) -> Self {
        if multiple {
            Self::Multiple
        } else {
            Self::Single
        }
    }
}

/// A value accepted by `set_value`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum SelectValue {
    /// One id.
    Id(ItemId),
    /// An ordered list of ids.
    Ids(Vec<ItemId>),
    /// Attribute-style string.
    Text(String),
}

impl SelectValue {
    /// Parse into id tokens for the given mode.
    ///
    /// `None` entries stand for malformed tokens; they never resolve. Blank
    /// text has no tokens.
    #[must_use]
    pub fn tokens(&self, mode: SelectMode) -> Vec<Option<ItemId>> {
        match self {
            Self::Id(id) => vec![Some(*id)],
            Self::Ids(ids) => ids.iter().copied().map(Some).collect(),
            Self::Text(text) if text.trim().is_empty() => Vec::new(),
            Self::Text(text) => match mode {
                SelectMode::Multiple => text.split(',').map(parse_id).collect(),
                SelectMode::Single => vec![parse_id(text)],
            },
        }
    }

    /// Whether this value selects nothing before resolution.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Id(_) => false,
            Self::Ids(ids) => ids.is_empty(),
            Self::Text(text) => text.trim().is_empty(),
        }
    }
}

impl Default for SelectValue {
    fn default() -> Self {
        Self::Ids(Vec::new())
    }
}

impl From<ItemId> for SelectValue {
    fn from(id: ItemId) -> Self {
        Self::Id(id)
    }
}

impl From<i64> for SelectValue {
    fn from(id: i64) -> Self {
        Self::Id(ItemId(id))
    }
}

impl From<i32> for SelectValue {
    fn from(id: i32) -> Self {
        Self::Id(ItemId::from(id))
    }
}

impl From<Vec<ItemId>> for SelectValue {
    fn from(ids: Vec<ItemId>) -> Self {
        Self::Ids(ids)
    }
}

impl From<Vec<i64>> for SelectValue {
    fn from(ids: Vec<i64>) -> Self {
        Self::Ids(ids.into_iter().map(ItemId).collect())
    }
}

impl From<&[i64]> for SelectValue {
    fn from(ids: &[i64]) -> Self {
        Self::Ids(ids.iter().copied().map(ItemId).collect())
    }
}

impl<const N: usize> From<[i64; N]> for SelectValue {
    fn from(ids: [i64; N]) -> Self {
        Self::Ids(ids.into_iter().map(ItemId).collect())
    }
}

impl From<&str> for SelectValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for SelectValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Parse one id token.
///
/// Returns `None` when the token carries no leading integer or overflows.
#[must_use]
pub fn parse_id(token: &str) -> Option<ItemId> {
    let s = token.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    let mut value: i64 = 0;
    for b in digits[..len].bytes() {
        let d = i64::from(b - b'0');
        value = value.checked_mul(10)?;
        value = if negative {
            value.checked_sub(d)?
        } else {
            value.checked_add(d)?
        };
    }
    Some(ItemId(value))
}

/// Serialize selected items in attribute format.
///
/// Multiple mode joins every id with `,`; single mode writes the first id,
/// or an empty string when nothing is selected.
#[must_use]
pub fn serialize_ids(items: &[Item], mode: SelectMode) -> String {
    match mode {
        SelectMode::Multiple => {
            let mut out = String::new();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&item.id.to_string());
            }
            out
        }
        SelectMode::Single => items
            .first()
            .map(|item| item.id.to_string())
            .unwrap_or_default(),
    }
}
