#![forbid(unsafe_code)]

//! Display formatting for the collapsed control.
//!
//! In multiple mode the selection is shown as tags: the first
//! `max_tag_count` items get their own (possibly truncated) tag and the
//! rest collapse into a single `+N` tag whose hover title lists them; an
//! empty selection shows the placeholder in full. In single mode the
//! control shows the selected label or the placeholder, both truncated.
//!
//! Truncation counts grapheme clusters, so combining sequences and emoji
//! are never split.

use std::borrow::Cow;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;
use vselect_core::{Item, ItemId, SelectMode};

/// Appended to truncated labels.
pub const ELLIPSIS: &str = "...";

/// Truncate `text` to `max_graphemes` clusters, appending [`ELLIPSIS`].
///
/// Text that fits is borrowed unchanged.
///
/// ```
/// use vselect_widgets::tags::truncate_label;
///
/// assert_eq!(truncate_label("Pineapple", 4), "Pine...");
/// assert_eq!(truncate_label("Fig", 4), "Fig");
/// ```
#[must_use]
pub fn truncate_label(text: &str, max_graphemes: usize) -> Cow<'_, str> {
    match text.grapheme_indices(true).nth(max_graphemes) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + ELLIPSIS.len());
            out.push_str(&text[..cut]);
            out.push_str(ELLIPSIS);
            Cow::Owned(out)
        }
    }
}

/// Kind of tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// One selected item; removable.
    Item,
    /// The `+N` summary of items past `max_tag_count`.
    Overflow,
}

/// One rendered tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Item behind the tag. `None` for the overflow tag.
    pub id: Option<ItemId>,
    /// Text shown in the tag.
    pub label: String,
    /// Hover text.
    pub title: String,
    pub kind: TagKind,
}

impl Tag {
    /// Terminal cell width of the label.
    #[must_use]
    pub fn display_width(&self) -> usize {
        self.label.width()
    }

    /// Whether this is the overflow tag.
    #[must_use]
    pub fn is_overflow(&self) -> bool {
        self.kind == TagKind::Overflow
    }
}

/// What the collapsed control shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectDisplay {
    /// Nothing selected.
    Placeholder { text: String },
    /// Single mode with a selection.
    Label { text: String, title: String },
    /// Multiple mode with a selection.
    Tags(Vec<Tag>),
}

impl SelectDisplay {
    /// Whether the clear affordance should be visible.
    #[must_use]
    pub fn show_clear(&self) -> bool {
        !matches!(self, Self::Placeholder { .. })
    }

    /// Tags, if any.
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        match self {
            Self::Tags(tags) => tags,
            _ => &[],
        }
    }

    /// Visible labels in order. Handy for assertions and snapshots.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        match self {
            Self::Placeholder { text } | Self::Label { text, .. } => vec![text.as_str()],
            Self::Tags(tags) => tags.iter().map(|t| t.label.as_str()).collect(),
        }
    }
}

/// Formats the collapsed control for a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFormatter {
    pub mode: SelectMode,
    pub placeholder: String,
    /// `None` shows every selected item as a tag.
    pub max_tag_count: Option<usize>,
    pub tag_max_length: usize,
}

impl TagFormatter {
    /// Formatter for `mode` with the default placeholder and limits.
    #[must_use]
    pub fn new(mode: SelectMode) -> Self {
        Self {
            mode,
            placeholder: vselect_core::config::DEFAULT_PLACEHOLDER.to_string(),
            max_tag_count: None,
            tag_max_length: vselect_core::config::DEFAULT_TAG_MAX_LENGTH,
        }
    }

    /// Formatter matching a component configuration.
    #[must_use]
    pub fn from_config(config: &vselect_core::SelectConfig) -> Self {
        Self {
            mode: config.mode,
            placeholder: config.placeholder.clone(),
            max_tag_count: config.max_tag_count,
            tag_max_length: config.tag_max_length,
        }
    }

    #[must_use]
    pub fn max_tag_count(mut self, count: Option<usize>) -> Self {
        self.max_tag_count = count;
        self
    }

    #[must_use]
    pub fn tag_max_length(mut self, len: usize) -> Self {
        self.tag_max_length = len;
        self
    }

    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    /// Format `selected`.
    #[must_use]
    pub fn format(&self, selected: &[Item]) -> SelectDisplay {
        let Some(first) = selected.first() else {
            let text = match self.mode {
                SelectMode::Single => truncate_label(&self.placeholder, self.tag_max_length),
                SelectMode::Multiple => Cow::Borrowed(self.placeholder.as_str()),
            };
            return SelectDisplay::Placeholder {
                text: text.into_owned(),
            };
        };
        match self.mode {
            SelectMode::Single => SelectDisplay::Label {
                text: truncate_label(&first.text, self.tag_max_length).into_owned(),
                title: first.text.clone(),
            },
            SelectMode::Multiple => SelectDisplay::Tags(self.tags(selected)),
        }
    }

    /// Tags for a multiple-mode selection.
    #[must_use]
    pub fn tags(&self, selected: &[Item]) -> Vec<Tag> {
        let shown = self
            .max_tag_count
            .map_or(selected.len(), |max| max.min(selected.len()));
        let mut tags: Vec<Tag> = selected[..shown]
            .iter()
            .map(|item| Tag {
                id: Some(item.id),
                label: truncate_label(&item.text, self.tag_max_length).into_owned(),
                title: item.text.clone(),
                kind: TagKind::Item,
            })
            .collect();

        let rest = &selected[shown..];
        if !rest.is_empty() {
            let title = rest
                .iter()
                .map(|item| item.text.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tags.push(Tag {
                id: None,
                label: format!("+{}", rest.len()),
                title,
                kind: TagKind::Overflow,
            });
        }
        tags
    }
}
