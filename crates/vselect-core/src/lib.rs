#![forbid(unsafe_code)]

//! Core: item model, selection values, configuration, and logging for vselect.

pub mod config;
pub mod item;
pub mod logging;
pub mod value;

pub use config::{AttrParse, ConfigError, ConfigPatch, SelectConfig};
pub use item::{Item, ItemId};
pub use value::{SelectMode, SelectValue, parse_id, serialize_ids};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
