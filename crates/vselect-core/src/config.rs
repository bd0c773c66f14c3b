#![forbid(unsafe_code)]

//! Component configuration.
//!
//! [`SelectConfig`] is the fully resolved option set a component is built
//! from. [`ConfigPatch`] is a sparse overlay: every field is optional and
//! only the fields that are set replace the base values. Layers are applied
//! lowest first:
//!
//! 1. built-in defaults (or a factory's base snapshot)
//! 2. host data attributes ([`ConfigPatch::from_attrs_with`])
//! 3. caller options
//!
//! Nothing here fails hard. Malformed attributes are skipped and reported as
//! [`ConfigError`] diagnostics; invalid numeric options fall back to the
//! defaults through [`SelectConfig::sanitized`].

use std::fmt;
use std::time::Duration;

use crate::item::Item;
use crate::value::{SelectMode, SelectValue};

/// Default placeholder text.
pub const DEFAULT_PLACEHOLDER: &str = "Select...";
/// Default row height in pixels.
pub const DEFAULT_ITEM_HEIGHT: u32 = 36;
/// Default number of rows the viewport is sized for.
pub const DEFAULT_VISIBLE_ITEMS: u32 = 10;
/// Default maximum tag label length, in grapheme clusters.
pub const DEFAULT_TAG_MAX_LENGTH: usize = 15;
/// Default filter quiescence window.
pub const DEFAULT_FILTER_DEBOUNCE: Duration = Duration::from_millis(100);

/// Attribute holding the `multiple` flag.
pub const ATTR_MULTIPLE: &str = "data-multiple";
/// Attribute holding the placeholder text.
pub const ATTR_PLACEHOLDER: &str = "data-placeholder";
/// Attribute holding the tag count limit.
pub const ATTR_MAX_TAG_COUNT: &str = "data-max-tag-count";
/// Attribute holding the tag label length limit.
pub const ATTR_TAG_MAX_LENGTH: &str = "data-tag-max-length";
/// Attribute holding the selected value.
pub const ATTR_VALUE: &str = "value";

/// A rejected configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Option name.
    pub field: &'static str,
    /// Offending value, as text.
    pub value: String,
    /// What was expected.
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Resolved configuration for a select component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectConfig {
    /// Single or multiple selection. Fixed once a component is built.
    pub mode: SelectMode,
    /// Text shown while nothing is selected.
    pub placeholder: String,
    /// The dataset.
    pub data: Vec<Item>,
    /// Initial selection.
    pub value: Option<SelectValue>,
    /// Row height in pixels.
    pub item_height: u32,
    /// Rows the viewport is sized for.
    pub visible_items: u32,
    /// Tags shown before collapsing into `+N`; `None` shows every tag.
    pub max_tag_count: Option<usize>,
    /// Tag label length before truncation.
    pub tag_max_length: usize,
    /// Filter input quiescence window.
    pub filter_debounce: Duration,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            mode: SelectMode::Single,
            placeholder: DEFAULT_PLACEHOLDER.to_owned(),
            data: Vec::new(),
            value: None,
            item_height: DEFAULT_ITEM_HEIGHT,
            visible_items: DEFAULT_VISIBLE_ITEMS,
            max_tag_count: None,
            tag_max_length: DEFAULT_TAG_MAX_LENGTH,
            filter_debounce: DEFAULT_FILTER_DEBOUNCE,
        }
    }
}

impl SelectConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set single or multiple mode.
    #[must_use]
    pub fn multiple(mut self, multiple: bool) -> Self {
        self.mode = SelectMode::from_multiple(multiple);
        self
    }

    /// Set the placeholder text.
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set the dataset.
    #[must_use]
    pub fn data(mut self, data: impl IntoIterator<Item = impl Into<Item>>) -> Self {
        self.data = data.into_iter().map(Into::into).collect();
        self
    }

    /// Set the initial value.
    #[must_use]
    pub fn value(mut self, value: impl Into<SelectValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the row height.
    #[must_use]
    pub fn item_height(mut self, height: u32) -> Self {
        self.item_height = height;
        self
    }

    /// Set the viewport size hint, in rows.
    #[must_use]
    pub fn visible_items(mut self, rows: u32) -> Self {
        self.visible_items = rows;
        self
    }

    /// Limit the number of tags shown before `+N`.
    #[must_use]
    pub fn max_tag_count(mut self, count: usize) -> Self {
        self.max_tag_count = Some(count);
        self
    }

    /// Set the tag label length limit.
    #[must_use]
    pub fn tag_max_length(mut self, len: usize) -> Self {
        self.tag_max_length = len;
        self
    }

    /// Set the filter quiescence window.
    #[must_use]
    pub fn filter_debounce(mut self, window: Duration) -> Self {
        self.filter_debounce = window;
        self
    }

    /// Viewport height implied by `visible_items`.
    #[must_use]
    pub fn preferred_viewport_height(&self) -> u32 {
        self.visible_items.saturating_mul(self.item_height)
    }

    /// Overlay a patch; fields set in the patch win.
    pub fn apply(&mut self, patch: &ConfigPatch) {
        if let Some(multiple) = patch.multiple {
            self.mode = SelectMode::from_multiple(multiple);
        }
        if let Some(placeholder) = &patch.placeholder {
            self.placeholder.clone_from(placeholder);
        }
        if let Some(data) = &patch.data {
            self.data.clone_from(data);
        }
        if let Some(value) = &patch.value {
            self.value = Some(value.clone());
        }
        if let Some(height) = patch.item_height {
            self.item_height = height;
        }
        if let Some(rows) = patch.visible_items {
            self.visible_items = rows;
        }
        if let Some(count) = patch.max_tag_count {
            self.max_tag_count = count;
        }
        if let Some(len) = patch.tag_max_length {
            self.tag_max_length = len;
        }
        if let Some(window) = patch.filter_debounce {
            self.filter_debounce = window;
        }
    }

    /// Builder form of [`SelectConfig::apply`].
    #[must_use]
    pub fn with_patch(mut self, patch: &ConfigPatch) -> Self {
        self.apply(patch);
        self
    }

    /// Validate constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        validate_positive("item_height", self.item_height as usize, &mut errors);
        validate_positive("visible_items", self.visible_items as usize, &mut errors);
        validate_positive("tag_max_length", self.tag_max_length, &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Replace invalid fields with their defaults.
    ///
    /// Returns the repaired configuration and the violations that were fixed.
    #[must_use]
    pub fn sanitized(mut self) -> (Self, Vec<ConfigError>) {
        let errors = match self.validate() {
            Ok(()) => return (self, Vec::new()),
            Err(errors) => errors,
        };
        for error in &errors {
            match error.field {
                "item_height" => self.item_height = DEFAULT_ITEM_HEIGHT,
                "visible_items" => self.visible_items = DEFAULT_VISIBLE_ITEMS,
                "tag_max_length" => self.tag_max_length = DEFAULT_TAG_MAX_LENGTH,
                _ => {}
            }
        }
        (self, errors)
    }
}

fn validate_positive(field: &'static str, value: usize, errors: &mut Vec<ConfigError>) {
    if value == 0 {
        errors.push(ConfigError::new(field, "0", "must be greater than zero"));
    }
}

/// Sparse configuration overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ConfigPatch {
    pub multiple: Option<bool>,
    pub placeholder: Option<String>,
    pub data: Option<Vec<Item>>,
    pub value: Option<SelectValue>,
    pub item_height: Option<u32>,
    pub visible_items: Option<u32>,
    /// `Some(None)` lifts the limit.
    pub max_tag_count: Option<Option<usize>>,
    pub tag_max_length: Option<usize>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub filter_debounce: Option<Duration>,
}

impl ConfigPatch {
    /// Empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = Some(multiple);
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub fn data(mut self, data: impl IntoIterator<Item = impl Into<Item>>) -> Self {
        self.data = Some(data.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<SelectValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn item_height(mut self, height: u32) -> Self {
        self.item_height = Some(height);
        self
    }

    #[must_use]
    pub fn visible_items(mut self, rows: u32) -> Self {
        self.visible_items = Some(rows);
        self
    }

    #[must_use]
    pub fn max_tag_count(mut self, count: Option<usize>) -> Self {
        self.max_tag_count = Some(count);
        self
    }

    #[must_use]
    pub fn tag_max_length(mut self, len: usize) -> Self {
        self.tag_max_length = Some(len);
        self
    }

    #[must_use]
    pub fn filter_debounce(mut self, window: Duration) -> Self {
        self.filter_debounce = Some(window);
        self
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    #[must_use]
    pub fn merge(mut self, other: ConfigPatch) -> Self {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field;
                })*
            };
        }
        take!(
            multiple,
            placeholder,
            data,
            value,
            item_height,
            visible_items,
            max_tag_count,
            tag_max_length,
            filter_debounce
        );
        self
    }

    /// Read options from host data attributes.
    ///
    /// `get` returns the raw attribute text, or `None` when absent.
    #[must_use]
    pub fn from_attrs_with<F>(mut get: F) -> AttrParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut patch = ConfigPatch::default();
        let mut errors = Vec::new();

        if let Some(value) = get(ATTR_MULTIPLE) {
            match parse_bool(&value) {
                Some(parsed) => patch.multiple = Some(parsed),
                None => errors.push(ConfigError::new(
                    "multiple",
                    value,
                    "expected bool (1/0/true/false)",
                )),
            }
        }

        if let Some(value) = get(ATTR_PLACEHOLDER) {
            patch.placeholder = Some(value);
        }

        if let Some(value) = get(ATTR_MAX_TAG_COUNT) {
            match parse_tag_count(&value) {
                Some(parsed) => patch.max_tag_count = Some(parsed),
                None => errors.push(ConfigError::new(
                    "max_tag_count",
                    value,
                    "expected non-negative integer or Infinity",
                )),
            }
        }

        if let Some(value) = get(ATTR_TAG_MAX_LENGTH) {
            match parse_usize(&value).filter(|len| *len > 0) {
                Some(parsed) => patch.tag_max_length = Some(parsed),
                None => errors.push(ConfigError::new(
                    "tag_max_length",
                    value,
                    "expected positive integer",
                )),
            }
        }

        if let Some(value) = get(ATTR_VALUE)
            && !value.trim().is_empty()
        {
            patch.value = Some(SelectValue::Text(value));
        }

        AttrParse { patch, errors }
    }
}

/// Result of reading data attributes: the usable options plus diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrParse {
    pub patch: ConfigPatch,
    pub errors: Vec<ConfigError>,
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse().ok()
}

fn parse_tag_count(value: &str) -> Option<Option<usize>> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("infinity") || trimmed.eq_ignore_ascii_case("inf") {
        return Some(None);
    }
    parse_usize(trimmed).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = SelectConfig::default();
        assert_eq!(config.mode, SelectMode::Single);
        assert_eq!(config.placeholder, DEFAULT_PLACEHOLDER);
        assert_eq!(config.item_height, 36);
        assert_eq!(config.visible_items, 10);
        assert_eq!(config.max_tag_count, None);
        assert_eq!(config.tag_max_length, 15);
        assert_eq!(config.filter_debounce, Duration::from_millis(100));
        assert_eq!(config.preferred_viewport_height(), 360);
    }

    #[test]
    fn patch_overrides_only_set_fields() {
        let base = SelectConfig::new().placeholder("Pick one").item_height(20);
        let config = base.with_patch(&ConfigPatch::new().multiple(true).max_tag_count(Some(2)));
        assert_eq!(config.mode, SelectMode::Multiple);
        assert_eq!(config.placeholder, "Pick one");
        assert_eq!(config.item_height, 20);
        assert_eq!(config.max_tag_count, Some(2));
    }

    #[test]
    fn merge_prefers_later_layer() {
        let attrs = ConfigPatch::new().placeholder("from attr").multiple(true);
        let user = ConfigPatch::new().placeholder("from user");
        let merged = attrs.merge(user);
        assert_eq!(merged.placeholder.as_deref(), Some("from user"));
        assert_eq!(merged.multiple, Some(true));
    }

    #[test]
    fn attrs_parse_recognized_options() {
        let map = attrs(&[
            (ATTR_MULTIPLE, "true"),
            (ATTR_PLACEHOLDER, "Choose"),
            (ATTR_MAX_TAG_COUNT, "3"),
            (ATTR_TAG_MAX_LENGTH, "8"),
            (ATTR_VALUE, "1,2"),
        ]);
        let parsed = ConfigPatch::from_attrs_with(|key| map.get(key).cloned());
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.patch.multiple, Some(true));
        assert_eq!(parsed.patch.placeholder.as_deref(), Some("Choose"));
        assert_eq!(parsed.patch.max_tag_count, Some(Some(3)));
        assert_eq!(parsed.patch.tag_max_length, Some(8));
        assert_eq!(parsed.patch.value, Some(SelectValue::from("1,2")));
    }

    #[test]
    fn malformed_attrs_are_reported_and_skipped() {
        let map = attrs(&[
            (ATTR_MULTIPLE, "maybe"),
            (ATTR_MAX_TAG_COUNT, "lots"),
            (ATTR_TAG_MAX_LENGTH, "0"),
        ]);
        let parsed = ConfigPatch::from_attrs_with(|key| map.get(key).cloned());
        assert_eq!(parsed.patch, ConfigPatch::default());
        let fields: Vec<_> = parsed.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["multiple", "max_tag_count", "tag_max_length"]);
        assert_eq!(
            parsed.errors[0].to_string(),
            "multiple=maybe (expected bool (1/0/true/false))"
        );
    }

    #[test]
    fn infinity_lifts_tag_limit() {
        let map = attrs(&[(ATTR_MAX_TAG_COUNT, "Infinity")]);
        let parsed = ConfigPatch::from_attrs_with(|key| map.get(key).cloned());
        assert_eq!(parsed.patch.max_tag_count, Some(None));
    }

    #[test]
    fn empty_value_attr_is_ignored() {
        let map = attrs(&[(ATTR_VALUE, " ")]);
        let parsed = ConfigPatch::from_attrs_with(|key| map.get(key).cloned());
        assert_eq!(parsed.patch.value, None);
    }

    #[test]
    fn sanitized_falls_back_to_defaults() {
        let config = SelectConfig::new()
            .item_height(0)
            .visible_items(0)
            .tag_max_length(4);
        assert!(config.validate().is_err());
        let (fixed, errors) = config.sanitized();
        assert_eq!(errors.len(), 2);
        assert_eq!(fixed.item_height, DEFAULT_ITEM_HEIGHT);
        assert_eq!(fixed.visible_items, DEFAULT_VISIBLE_ITEMS);
        assert_eq!(fixed.tag_max_length, 4);
        assert!(fixed.validate().is_ok());
    }

    #[test]
    fn valid_config_sanitizes_to_itself() {
        let config = SelectConfig::new().multiple(true);
        let (fixed, errors) = config.clone().sanitized();
        assert!(errors.is_empty());
        assert_eq!(fixed, config);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn patch_reads_camel_case_options() {
        let patch: ConfigPatch = serde_json::from_str(
            r#"{"multiple":true,"maxTagCount":2,"tagMaxLength":6,"value":[1,3],
                "data":[{"id":1,"text":"Apple"},{"id":3,"text":"Cherry"}]}"#,
        )
        .expect("valid options");
        assert_eq!(patch.multiple, Some(true));
        assert_eq!(patch.max_tag_count, Some(Some(2)));
        assert_eq!(patch.tag_max_length, Some(6));
        assert_eq!(patch.value, Some(SelectValue::from(vec![1i64, 3])));
        assert_eq!(patch.data.map(|d| d.len()), Some(2));
    }
}
