#![forbid(unsafe_code)]

//! Virtualized select component.
//!
//! The dropdown list is rendered through a virtual window: only the rows
//! near the viewport are materialized, inside a spacer as tall as the whole
//! filtered view. [`Select`] owns the state machine and drives a
//! [`HostSurface`] supplied by the embedding UI.

pub mod item_store;
pub mod render;
pub mod select;
pub mod selection;
pub mod tags;
pub mod virtualized;

pub use item_store::ItemStore;
pub use render::{HostSurface, RenderPipeline, RenderRow, RenderSlice, RenderStats};
pub use select::{ChangeContext, ChangeHandler, Select, SelectCmd, SelectFactory, SelectState};
pub use selection::{Resolution, Selection, ToggleOutcome};
pub use tags::{SelectDisplay, Tag, TagFormatter, TagKind, truncate_label};
pub use virtualized::{VirtualWindow, clamp_scroll_offset, compute_window, offset_of};
