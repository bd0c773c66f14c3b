#![forbid(unsafe_code)]

//! JSON loading for datasets and options.
//!
//! A dataset is an array of `{"id": <integer>, "text": <string>}` objects.
//! Options use the camelCase option names (`multiple`, `placeholder`,
//! `data`, `value`, `itemHeight`, `visibleItems`, `maxTagCount`,
//! `tagMaxLength`); absent fields leave the base configuration untouched.

use std::io::Read;
use std::path::Path;

use crate::{ConfigPatch, Error, Item, Result, SelectConfig};

/// Parse a dataset from JSON text.
pub fn parse_items(text: &str) -> Result<Vec<Item>> {
    Ok(serde_json::from_str(text)?)
}

/// Read a dataset from `reader`.
pub fn read_items<R: Read>(reader: R) -> Result<Vec<Item>> {
    Ok(serde_json::from_reader(reader)?)
}

/// Read a dataset from a file.
pub fn load_items(path: impl AsRef<Path>) -> Result<Vec<Item>> {
    let text = std::fs::read_to_string(path)?;
    parse_items(&text)
}

/// Parse an options patch from JSON text.
pub fn parse_options(text: &str) -> Result<ConfigPatch> {
    Ok(serde_json::from_str(text)?)
}

/// Apply an options document to `base` and validate the result.
///
/// Unlike component construction, which repairs invalid fields, this
/// rejects them so a bad options file is reported to the user.
pub fn load_config(base: SelectConfig, text: &str) -> Result<SelectConfig> {
    let patch = parse_options(text)?;
    let config = base.with_patch(&patch);
    config.validate().map_err(Error::Config)?;
    Ok(config)
}
