#![forbid(unsafe_code)]

//! Render pipeline and the host surface it draws on.
//!
//! A render reads the host's current scroll offset, computes the
//! [`VirtualWindow`] for the filtered view, hands the visible rows to the
//! host as one [`RenderSlice`], then writes the pre-render scroll offset
//! back. Rebuilding the row list must never move the viewport.
//!
//! Renders are requested through [`RenderPipeline::schedule`] and executed
//! from [`RenderPipeline::on_frame`], which the host calls once per paint.
//! Any number of requests between two paints produce one render.

use vselect_core::Item;
use vselect_runtime::{FrameScheduler, FrameStats, FrameTicket, RenderReason};

use crate::item_store::ItemStore;
use crate::selection::Selection;
use crate::tags::SelectDisplay;
use crate::virtualized::{VirtualWindow, compute_window};

/// The display surface a select component drives.
///
/// Only viewport geometry and row rendering are required. The remaining
/// hooks mirror the collapsed control and the host's value attribute and
/// default to no-ops, so a headless surface can implement four methods.
pub trait HostSurface {
    /// Height of the scrollable list viewport, in pixels.
    fn viewport_height(&self) -> u32;

    /// Current scroll offset of the list viewport, in pixels.
    fn scroll_offset(&self) -> u64;

    /// Move the list viewport.
    fn set_scroll_offset(&mut self, offset: u64);

    /// Replace the rendered rows with `slice`.
    fn render_slice(&mut self, slice: &RenderSlice<'_>);

    /// Update the collapsed control (label, tags, clear affordance).
    fn render_display(&mut self, _display: &SelectDisplay) {}

    /// Show or hide the dropdown.
    fn set_open(&mut self, _open: bool) {}

    /// Reflect the enabled flag.
    fn set_disabled(&mut self, _disabled: bool) {}

    /// Empty the search input.
    fn clear_search(&mut self) {}

    /// Initial value attribute, if the host carries one.
    fn value_attr(&self) -> Option<String> {
        None
    }

    /// Echo the serialized selection.
    fn write_value_attr(&mut self, _value: &str) {}

    /// Detach listeners and drop host resources. Called once, on destroy.
    fn release(&mut self) {}
}

impl<H: HostSurface + ?Sized> HostSurface for &mut H {
    fn viewport_height(&self) -> u32 {
        (**self).viewport_height()
    }

    fn scroll_offset(&self) -> u64 {
        (**self).scroll_offset()
    }

    fn set_scroll_offset(&mut self, offset: u64) {
        (**self).set_scroll_offset(offset);
    }

    fn render_slice(&mut self, slice: &RenderSlice<'_>) {
        (**self).render_slice(slice);
    }

    fn render_display(&mut self, display: &SelectDisplay) {
        (**self).render_display(display);
    }

    fn set_open(&mut self, open: bool) {
        (**self).set_open(open);
    }

    fn set_disabled(&mut self, disabled: bool) {
        (**self).set_disabled(disabled);
    }

    fn clear_search(&mut self) {
        (**self).clear_search();
    }

    fn value_attr(&self) -> Option<String> {
        (**self).value_attr()
    }

    fn write_value_attr(&mut self, value: &str) {
        (**self).write_value_attr(value);
    }

    fn release(&mut self) {
        (**self).release();
    }
}

/// One materialized row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderRow<'a> {
    /// Index in the filtered view.
    pub index: usize,
    pub item: &'a Item,
    pub selected: bool,
}

/// The visible part of the filtered view, ready to draw.
///
/// The host positions `rows` after `top_padding` pixels inside a container
/// `total_height` pixels tall, so the scrollbar reflects the whole view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSlice<'a> {
    pub rows: Vec<RenderRow<'a>>,
    pub top_padding: u64,
    pub total_height: u64,
    pub item_height: u32,
    pub window: VirtualWindow,
}

impl<'a> RenderSlice<'a> {
    /// Build the slice for `window`.
    #[must_use]
    pub fn build(
        store: &'a ItemStore,
        selection: &Selection,
        window: VirtualWindow,
        item_height: u32,
    ) -> Self {
        let rows = store
            .filtered_slice(window.start, window.end)
            .enumerate()
            .map(|(i, item)| RenderRow {
                index: window.start + i,
                item,
                selected: selection.contains(item.id),
            })
            .collect();
        Self {
            rows,
            top_padding: window.top_padding,
            total_height: window.total_height,
            item_height,
            window,
        }
    }

    /// Space below the last rendered row, in pixels.
    #[must_use]
    pub fn bottom_padding(&self) -> u64 {
        self.window.bottom_padding(self.item_height)
    }
}

/// Render counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Renders executed, frame-driven and immediate.
    pub renders: u64,
    /// Renders executed by [`RenderPipeline::render_now`].
    pub immediate: u64,
    /// Scheduler counters.
    pub frames: FrameStats,
}

/// Frame-coalesced renderer for the filtered view.
#[derive(Debug)]
pub struct RenderPipeline {
    scheduler: FrameScheduler,
    item_height: u32,
    renders: u64,
    immediate: u64,
    last_window: Option<VirtualWindow>,
}

impl RenderPipeline {
    /// Pipeline for rows `item_height` pixels tall.
    #[must_use]
    pub fn new(item_height: u32) -> Self {
        Self {
            scheduler: FrameScheduler::new(),
            item_height: item_height.max(1),
            renders: 0,
            immediate: 0,
            last_window: None,
        }
    }

    #[must_use]
    pub fn item_height(&self) -> u32 {
        self.item_height
    }

    /// Request a render on the next frame.
    pub fn schedule(&mut self, reason: RenderReason) -> FrameTicket {
        self.scheduler.request(reason)
    }

    /// Drop the pending request, if any.
    pub fn cancel(&mut self) -> bool {
        self.scheduler.cancel()
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.scheduler.has_pending()
    }

    #[must_use]
    pub fn pending_reasons(&self) -> RenderReason {
        self.scheduler.pending_reasons()
    }

    /// Run the pending render, if one is due.
    ///
    /// Returns the merged reasons of the executed request.
    pub fn on_frame<H: HostSurface + ?Sized>(
        &mut self,
        host: &mut H,
        store: &ItemStore,
        selection: &Selection,
    ) -> Option<RenderReason> {
        let frame = self.scheduler.take_due()?;
        self.render(host, store, selection, frame.reasons);
        Some(frame.reasons)
    }

    /// Render immediately, superseding any pending request.
    pub fn render_now<H: HostSurface + ?Sized>(
        &mut self,
        host: &mut H,
        store: &ItemStore,
        selection: &Selection,
    ) -> VirtualWindow {
        let mut reasons = RenderReason::REFRESH;
        if self.scheduler.has_pending() {
            reasons |= self.scheduler.pending_reasons();
            self.scheduler.cancel();
        }
        self.immediate += 1;
        self.render(host, store, selection, reasons)
    }

    fn render<H: HostSurface + ?Sized>(
        &mut self,
        host: &mut H,
        store: &ItemStore,
        selection: &Selection,
        reasons: RenderReason,
    ) -> VirtualWindow {
        let offset = host.scroll_offset();
        let viewport = host.viewport_height();
        let window = compute_window(offset, viewport, self.item_height, store.filtered_len());

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Select",
            reasons = reasons.bits(),
            scroll = offset,
            start = window.start,
            end = window.end,
            total = store.filtered_len()
        )
        .entered();
        #[cfg(not(feature = "tracing"))]
        let _ = reasons;

        let slice = RenderSlice::build(store, selection, window, self.item_height);
        host.render_slice(&slice);
        host.set_scroll_offset(offset);

        self.renders += 1;
        self.last_window = Some(window);
        window
    }

    /// Window of the most recent render.
    #[must_use]
    pub fn last_window(&self) -> Option<VirtualWindow> {
        self.last_window
    }

    #[must_use]
    pub fn stats(&self) -> RenderStats {
        RenderStats {
            renders: self.renders,
            immediate: self.immediate,
            frames: self.scheduler.stats(),
        }
    }
}
