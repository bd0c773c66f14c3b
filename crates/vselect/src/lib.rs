#![forbid(unsafe_code)]

//! vselect public facade crate.
//!
//! Re-exports the component, its configuration, and the host surface trait
//! from the internal crates, plus a prelude for day-to-day usage.

use std::fmt;

#[cfg(feature = "json")]
pub mod json;

// --- Core re-exports -------------------------------------------------------

pub use vselect_core::{
    AttrParse, ConfigError, ConfigPatch, Item, ItemId, SelectConfig, SelectMode, SelectValue,
    parse_id, serialize_ids,
};

// --- Runtime re-exports ----------------------------------------------------

pub use vselect_runtime::{Debouncer, FrameScheduler, RenderReason};

// --- Widget re-exports -----------------------------------------------------

pub use vselect_widgets::{
    ChangeContext, ChangeHandler, HostSurface, RenderRow, RenderSlice, Select, SelectCmd,
    SelectDisplay, SelectFactory, SelectState, Tag, TagKind, ToggleOutcome, VirtualWindow,
    compute_window,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for loading datasets and options.
#[derive(Debug)]
pub enum Error {
    /// I/O failure while reading input.
    Io(std::io::Error),
    /// Malformed dataset or options document.
    Data(String),
    /// Options that fail validation.
    Config(Vec<ConfigError>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Data(msg) => write!(f, "invalid data: {msg}"),
            Self::Config(errors) => {
                write!(f, "invalid options: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{err}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Config(errors) => errors
                .first()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Self::Data(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<Vec<ConfigError>> for Error {
    fn from(errors: Vec<ConfigError>) -> Self {
        Self::Config(errors)
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::Io(err.into())
        } else {
            Self::Data(err.to_string())
        }
    }
}

/// Standard result type for vselect APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ChangeContext, ConfigPatch, Error, HostSurface, Item, ItemId, RenderSlice, Result,
        Select, SelectConfig, SelectDisplay, SelectFactory, SelectMode, SelectValue,
    };

    pub use crate::{core, runtime, widgets};
}

pub use vselect_core as core;
pub use vselect_runtime as runtime;
pub use vselect_widgets as widgets;
