#![forbid(unsafe_code)]

//! Headless host surface and snapshot testing for vselect.
//!
//! - **Recording surface**: [`RecordingSurface`] implements
//!   [`HostSurface`] in memory and logs every call the component makes.
//! - **Snapshot testing**: [`snapshot_text`] renders the surface as plain
//!   text, which is compared against stored `.snap` files.
//!
//! # Quick Start
//!
//! ```ignore
//! use vselect_harness::{RecordingSurface, assert_snapshot, snapshot_text};
//!
//! #[test]
//! fn dropdown_renders_correctly() {
//!     let mut select = factory.multiple(data, RecordingSurface::new(108));
//!     select.open();
//!     select.on_frame();
//!     assert_snapshot!("dropdown_basic", &snapshot_text(select.host()));
//! }
//! ```
//!
//! # Updating Snapshots
//!
//! Run tests with `BLESS=1` to create or update snapshot files:
//!
//! ```sh
//! BLESS=1 cargo test -p vselect-harness
//! ```
//!
//! Snapshot files are stored under `tests/snapshots/` relative to the
//! crate's `CARGO_MANIFEST_DIR`.

use std::fmt::Write as FmtWrite;
use std::path::{Path, PathBuf};

use serde_json::json;
use vselect_core::ItemId;
use vselect_widgets::{HostSurface, RenderSlice, SelectDisplay, VirtualWindow};

// ============================================================================
// Recording Surface
// ============================================================================

/// One call made by the component on the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// `render_slice`, summarized.
    Rows {
        start: usize,
        end: usize,
        top_padding: u64,
        total_height: u64,
        ids: Vec<ItemId>,
    },
    Display(SelectDisplay),
    Open(bool),
    Disabled(bool),
    ClearSearch,
    ValueAttr(String),
    Scroll(u64),
    Release,
}

impl SurfaceEvent {
    /// Short event name, used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rows { .. } => "rows",
            Self::Display(_) => "display",
            Self::Open(_) => "open",
            Self::Disabled(_) => "disabled",
            Self::ClearSearch => "clear_search",
            Self::ValueAttr(_) => "value_attr",
            Self::Scroll(_) => "scroll",
            Self::Release => "release",
        }
    }
}

/// A rendered row as the surface stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRow {
    pub index: usize,
    pub id: ItemId,
    pub text: String,
    pub selected: bool,
}

/// In-memory [`HostSurface`] with a fixed viewport.
///
/// Keeps the latest state of everything the component drives and a log of
/// every call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    viewport_height: u32,
    scroll_offset: u64,
    value_attr: Option<String>,
    open: bool,
    disabled: bool,
    released: bool,
    display: Option<SelectDisplay>,
    rows: Vec<RecordedRow>,
    window: Option<VirtualWindow>,
    total_rows: usize,
    renders: usize,
    events: Vec<SurfaceEvent>,
}

impl RecordingSurface {
    /// Surface whose list viewport is `viewport_height` pixels tall.
    #[must_use]
    pub fn new(viewport_height: u32) -> Self {
        Self {
            viewport_height,
            ..Self::default()
        }
    }

    /// Start with a value attribute, as markup like `value="1,2"` would.
    #[must_use]
    pub fn with_value_attr(mut self, value: impl Into<String>) -> Self {
        self.value_attr = Some(value.into());
        self
    }

    /// Simulate the user scrolling the list. Does not notify the component.
    pub fn user_scroll(&mut self, offset: u64) {
        self.scroll_offset = offset;
    }

    /// Resize the viewport.
    pub fn set_viewport_height(&mut self, height: u32) {
        self.viewport_height = height;
    }

    #[must_use]
    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    /// Drain the event log.
    pub fn take_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }

    /// Rows of the latest render.
    #[must_use]
    pub fn rows(&self) -> &[RecordedRow] {
        &self.rows
    }

    /// Ids of the rows of the latest render.
    #[must_use]
    pub fn row_ids(&self) -> Vec<i64> {
        self.rows.iter().map(|row| row.id.get()).collect()
    }

    #[must_use]
    pub fn window(&self) -> Option<VirtualWindow> {
        self.window
    }

    #[must_use]
    pub fn display(&self) -> Option<&SelectDisplay> {
        self.display.as_ref()
    }

    #[must_use]
    pub fn current_value_attr(&self) -> Option<&str> {
        self.value_attr.as_deref()
    }

    #[must_use]
    pub fn current_scroll(&self) -> u64 {
        self.scroll_offset
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Number of `render_slice` calls.
    #[must_use]
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// The event log as JSON lines.
    #[must_use]
    pub fn events_jsonl(&self) -> String {
        let mut out = String::new();
        for (seq, event) in self.events.iter().enumerate() {
            let detail = match event {
                SurfaceEvent::Rows {
                    start,
                    end,
                    top_padding,
                    total_height,
                    ids,
                } => json!({
                    "start": start,
                    "end": end,
                    "top_padding": top_padding,
                    "total_height": total_height,
                    "ids": ids.iter().map(|id| id.get()).collect::<Vec<_>>(),
                }),
                SurfaceEvent::Display(display) => json!({ "labels": display.labels() }),
                SurfaceEvent::Open(open) => json!({ "open": open }),
                SurfaceEvent::Disabled(disabled) => json!({ "disabled": disabled }),
                SurfaceEvent::ValueAttr(value) => json!({ "value": value }),
                SurfaceEvent::Scroll(offset) => json!({ "offset": offset }),
                SurfaceEvent::ClearSearch | SurfaceEvent::Release => json!({}),
            };
            let line = json!({ "seq": seq, "event": event.kind(), "detail": detail });
            let _ = writeln!(out, "{line}");
        }
        out
    }
}

impl HostSurface for RecordingSurface {
    fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    fn set_scroll_offset(&mut self, offset: u64) {
        self.scroll_offset = offset;
        self.events.push(SurfaceEvent::Scroll(offset));
    }

    fn render_slice(&mut self, slice: &RenderSlice<'_>) {
        self.rows = slice
            .rows
            .iter()
            .map(|row| RecordedRow {
                index: row.index,
                id: row.item.id,
                text: row.item.text.clone(),
                selected: row.selected,
            })
            .collect();
        self.window = Some(slice.window);
        self.total_rows = usize::try_from(slice.total_height / u64::from(slice.item_height.max(1)))
            .unwrap_or(usize::MAX);
        self.renders += 1;
        self.events.push(SurfaceEvent::Rows {
            start: slice.window.start,
            end: slice.window.end,
            top_padding: slice.top_padding,
            total_height: slice.total_height,
            ids: self.rows.iter().map(|row| row.id).collect(),
        });
    }

    fn render_display(&mut self, display: &SelectDisplay) {
        self.display = Some(display.clone());
        self.events.push(SurfaceEvent::Display(display.clone()));
    }

    fn set_open(&mut self, open: bool) {
        self.open = open;
        self.events.push(SurfaceEvent::Open(open));
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        self.events.push(SurfaceEvent::Disabled(disabled));
    }

    fn clear_search(&mut self) {
        self.events.push(SurfaceEvent::ClearSearch);
    }

    fn value_attr(&self) -> Option<String> {
        self.value_attr.clone()
    }

    fn write_value_attr(&mut self, value: &str) {
        self.value_attr = Some(value.to_string());
        self.events.push(SurfaceEvent::ValueAttr(value.to_string()));
    }

    fn release(&mut self) {
        self.released = true;
        self.rows.clear();
        self.events.push(SurfaceEvent::Release);
    }
}

// ============================================================================
// Surface → Text Conversion
// ============================================================================

/// Render the surface state as plain text.
///
/// ```text
/// control: Item 5 | +1 (clear)
/// state: open
/// value: 5,9
/// window: rows 3..11 of 20, top 108px, total 720px, scroll 180px
/// [ ] 3 Item 3
/// [x] 5 Item 5
/// ```
#[must_use]
pub fn snapshot_text(surface: &RecordingSurface) -> String {
    let mut out = String::new();

    let control = match &surface.display {
        Some(display) => {
            let labels = display.labels().join(" | ");
            if display.show_clear() {
                format!("{labels} (clear)")
            } else {
                labels
            }
        }
        None => String::new(),
    };
    let _ = writeln!(out, "control: {control}");

    let mut state = String::from(if surface.open { "open" } else { "closed" });
    if surface.disabled {
        state.push_str(", disabled");
    }
    if surface.released {
        state.push_str(", released");
    }
    let _ = writeln!(out, "state: {state}");
    let _ = writeln!(out, "value: {}", surface.value_attr.as_deref().unwrap_or(""));

    match surface.window {
        Some(w) => {
            let _ = write!(
                out,
                "window: rows {}..{} of {}, top {}px, total {}px, scroll {}px",
                w.start, w.end, surface.total_rows, w.top_padding, w.total_height, surface.scroll_offset
            );
        }
        None => out.push_str("window: none"),
    }

    for row in &surface.rows {
        let mark = if row.selected { "[x]" } else { "[ ]" };
        let _ = write!(out, "\n{mark} {} {}", row.index, row.text);
    }
    out
}

// ============================================================================
// Match Modes & Normalization
// ============================================================================

/// Comparison mode for snapshot testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Byte-exact string comparison.
    Exact,
    /// Trim trailing whitespace on each line before comparing.
    TrimTrailing,
    /// Collapse all whitespace runs to single spaces and trim each line.
    Fuzzy,
}

fn normalize(text: &str, mode: MatchMode) -> String {
    match mode {
        MatchMode::Exact => text.to_string(),
        MatchMode::TrimTrailing => text
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n"),
        MatchMode::Fuzzy => text
            .lines()
            .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

// ============================================================================
// Diff
// ============================================================================

/// Line-by-line diff between two texts.
///
/// Lines prefixed with ` ` match, `-` appear only in `expected`, `+` only in
/// `actual`. Returns an empty string when the inputs are identical.
#[must_use]
pub fn diff_text(expected: &str, actual: &str) -> String {
    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = actual.lines().collect();

    let max_lines = expected_lines.len().max(actual_lines.len());
    let mut out = String::new();
    let mut has_diff = false;

    for i in 0..max_lines {
        match (expected_lines.get(i), actual_lines.get(i)) {
            (Some(e), Some(a)) if e == a => {
                let _ = writeln!(out, " {e}");
            }
            (Some(e), Some(a)) => {
                let _ = writeln!(out, "-{e}");
                let _ = writeln!(out, "+{a}");
                has_diff = true;
            }
            (Some(e), None) => {
                let _ = writeln!(out, "-{e}");
                has_diff = true;
            }
            (None, Some(a)) => {
                let _ = writeln!(out, "+{a}");
                has_diff = true;
            }
            (None, None) => {}
        }
    }

    if has_diff { out } else { String::new() }
}

// ============================================================================
// Snapshot Assertion
// ============================================================================

fn snapshot_path(base_dir: &Path, name: &str) -> PathBuf {
    base_dir
        .join("tests")
        .join("snapshots")
        .join(format!("{name}.snap"))
}

fn is_bless() -> bool {
    std::env::var("BLESS").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Assert that `actual` matches a stored snapshot.
///
/// # Panics
///
/// * If the snapshot file does not exist and `BLESS=1` is **not** set.
/// * If `actual` does not match the stored snapshot.
pub fn assert_text_snapshot(name: &str, actual: &str, base_dir: &str, mode: MatchMode) {
    let path = snapshot_path(Path::new(base_dir), name);

    if is_bless() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create snapshot directory");
        }
        std::fs::write(&path, actual).expect("failed to write snapshot");
        return;
    }

    match std::fs::read_to_string(&path) {
        Ok(expected) => {
            let norm_expected = normalize(&expected, mode);
            let norm_actual = normalize(actual, mode);

            if norm_expected != norm_actual {
                let diff = diff_text(&norm_expected, &norm_actual);
                panic!(
                    "\n\
                     === Snapshot mismatch: '{name}' ===\n\
                     File: {}\n\
                     Mode: {mode:?}\n\
                     Set BLESS=1 to update.\n\n\
                     Diff (- expected, + actual):\n{diff}",
                    path.display()
                );
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            panic!(
                "\n\
                 === No snapshot found: '{name}' ===\n\
                 Expected at: {}\n\
                 Run with BLESS=1 to create it.\n\n\
                 Actual output:\n{actual}",
                path.display(),
            );
        }
        Err(e) => {
            panic!("Failed to read snapshot '{}': {e}", path.display());
        }
    }
}

/// Assert that text matches a stored snapshot.
///
/// Uses `CARGO_MANIFEST_DIR` to locate the snapshot directory automatically.
///
/// ```ignore
/// // Default mode: TrimTrailing
/// assert_snapshot!("dropdown_basic", &text);
///
/// // Explicit mode
/// assert_snapshot!("dropdown_exact", &text, MatchMode::Exact);
/// ```
#[macro_export]
macro_rules! assert_snapshot {
    ($name:expr, $text:expr) => {
        $crate::assert_text_snapshot(
            $name,
            $text,
            env!("CARGO_MANIFEST_DIR"),
            $crate::MatchMode::TrimTrailing,
        )
    };
    ($name:expr, $text:expr, $mode:expr) => {
        $crate::assert_text_snapshot($name, $text, env!("CARGO_MANIFEST_DIR"), $mode)
    };
}
