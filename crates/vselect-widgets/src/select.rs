#![forbid(unsafe_code)]

//! The select component.
//!
//! [`Select`] ties the pieces together: an [`ItemStore`] for the dataset and
//! filter, a [`Selection`], a [`TagFormatter`] for the collapsed control, a
//! [`RenderPipeline`] for the dropdown list, and a [`Debouncer`] for search
//! input. It owns a [`HostSurface`] and drives it.
//!
//! # Driving the component
//!
//! The host forwards events and polls timers:
//!
//! - clicks on the control call [`Select::toggle_open`], clicks on a row
//!   call [`Select::select_index`], tag close buttons call [`Select::remove`];
//! - scroll events call [`Select::on_scroll`];
//! - search input calls [`Select::on_input`], and [`Select::tick`] is polled
//!   until [`Select::next_deadline`] returns `None`;
//! - every paint calls [`Select::on_frame`].
//!
//! # Mutations
//!
//! Every selection change runs the same sequence: update the collapsed
//! control, echo the serialized value, schedule a list render, and call the
//! change handler. The handler cannot mutate the component directly; it
//! queues [`SelectCmd`]s through its [`ChangeContext`], which run in arrival
//! order after the current mutation has finished. Each handler call thus
//! sees a settled selection.
//!
//! # Example
//!
//! ```
//! use vselect_core::{ConfigPatch, Item};
//! use vselect_widgets::render::{HostSurface, RenderSlice};
//! use vselect_widgets::select::SelectFactory;
//!
//! #[derive(Default)]
//! struct Headless {
//!     scroll: u64,
//!     rows: usize,
//! }
//!
//! impl HostSurface for Headless {
//!     fn viewport_height(&self) -> u32 {
//!         360
//!     }
//!     fn scroll_offset(&self) -> u64 {
//!         self.scroll
//!     }
//!     fn set_scroll_offset(&mut self, offset: u64) {
//!         self.scroll = offset;
//!     }
//!     fn render_slice(&mut self, slice: &RenderSlice<'_>) {
//!         self.rows = slice.rows.len();
//!     }
//! }
//!
//! let factory = SelectFactory::default();
//! let data = vec![Item::new(1, "Apple"), Item::new(2, "Banana"), Item::new(3, "Cherry")];
//! let mut select = factory.create(&ConfigPatch::new().data(data), Headless::default());
//!
//! select.set_value(2);
//! assert_eq!(select.value(), &[Item::new(2, "Banana")]);
//!
//! select.on_frame();
//! assert_eq!(select.host().rows, 3);
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use vselect_core::{ConfigPatch, Item, ItemId, SelectConfig, SelectMode, SelectValue};
use vselect_runtime::{DeferredQueue, Debouncer, RenderReason};

use crate::item_store::ItemStore;
use crate::render::{HostSurface, RenderPipeline, RenderStats};
use crate::selection::{Selection, ToggleOutcome};
use crate::tags::{SelectDisplay, TagFormatter};
use crate::virtualized::{VirtualWindow, clamp_scroll_offset, offset_of};

/// Whether the dropdown is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectState {
    #[default]
    Closed,
    Open,
}

/// A mutation requested from inside a change handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectCmd {
    SetValue(SelectValue),
    Clear,
    Toggle(Item),
    Remove(ItemId),
    Close,
    Refresh,
}

/// Handle passed to the change handler for requesting further mutations.
pub struct ChangeContext<'a> {
    queue: &'a mut DeferredQueue<SelectCmd>,
    mode: SelectMode,
}

impl ChangeContext<'_> {
    /// Selection mode of the component.
    #[must_use]
    pub fn mode(&self) -> SelectMode {
        self.mode
    }

    /// Queue an arbitrary command.
    pub fn push(&mut self, cmd: SelectCmd) {
        self.queue.push(cmd);
    }

    pub fn set_value(&mut self, value: impl Into<SelectValue>) {
        self.push(SelectCmd::SetValue(value.into()));
    }

    pub fn clear(&mut self) {
        self.push(SelectCmd::Clear);
    }

    pub fn toggle(&mut self, item: Item) {
        self.push(SelectCmd::Toggle(item));
    }

    pub fn remove(&mut self, id: impl Into<ItemId>) {
        self.push(SelectCmd::Remove(id.into()));
    }

    pub fn close(&mut self) {
        self.push(SelectCmd::Close);
    }

    pub fn refresh(&mut self) {
        self.push(SelectCmd::Refresh);
    }

    /// Commands waiting to run, including ones queued by earlier handlers.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}

/// Change notification callback.
pub type ChangeHandler = Box<dyn FnMut(&[Item], &mut ChangeContext<'_>)>;

/// A virtualized single- or multi-select dropdown.
pub struct Select<H: HostSurface> {
    host: H,
    store: ItemStore,
    selection: Selection,
    formatter: TagFormatter,
    pipeline: RenderPipeline,
    debouncer: Debouncer<String>,
    queue: DeferredQueue<SelectCmd>,
    on_change: Option<ChangeHandler>,
    state: SelectState,
    enabled: bool,
    destroyed: bool,
    scroll_to_selection: bool,
    visible_items: u32,
}

impl<H: HostSurface> fmt::Debug for Select<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Select")
            .field("mode", &self.selection.mode())
            .field("state", &self.state)
            .field("enabled", &self.enabled)
            .field("destroyed", &self.destroyed)
            .field("items", &self.store.data().len())
            .field("filtered", &self.store.filtered_len())
            .field("selected", &self.selection.len())
            .field("has_handler", &self.on_change.is_some())
            .finish_non_exhaustive()
    }
}

impl<H: HostSurface> Select<H> {
    /// Build a component without a change handler.
    #[must_use]
    pub fn new(config: SelectConfig, host: H) -> Self {
        Self::build(config, host, None)
    }

    /// Build a component that reports changes to `handler`.
    #[must_use]
    pub fn with_handler<F>(config: SelectConfig, host: H, handler: F) -> Self
    where
        F: FnMut(&[Item], &mut ChangeContext<'_>) + 'static,
    {
        Self::build(config, host, Some(Box::new(handler)))
    }

    /// Build a component.
    ///
    /// Invalid configuration fields fall back to their defaults with a
    /// warning. A non-empty value attribute on the host takes precedence
    /// over `config.value`. The initial value is applied like
    /// [`Select::set_value`], so the handler sees it.
    #[must_use]
    pub fn build(config: SelectConfig, host: H, on_change: Option<ChangeHandler>) -> Self {
        #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
        let (config, errors) = config.sanitized();
        #[cfg(feature = "tracing")]
        for error in &errors {
            vselect_core::warn!(%error, "invalid select option replaced by default");
        }

        let initial = host
            .value_attr()
            .filter(|attr| !attr.trim().is_empty())
            .map(SelectValue::Text)
            .or_else(|| config.value.clone())
            .filter(|value| !value.is_empty());

        let formatter = TagFormatter::from_config(&config);
        let SelectConfig {
            mode,
            data,
            item_height,
            visible_items,
            filter_debounce,
            ..
        } = config;

        let mut select = Self {
            host,
            store: ItemStore::new(data),
            selection: Selection::new(mode),
            formatter,
            pipeline: RenderPipeline::new(item_height),
            debouncer: Debouncer::new(filter_debounce),
            queue: DeferredQueue::new(),
            on_change,
            state: SelectState::Closed,
            enabled: true,
            destroyed: false,
            scroll_to_selection: false,
            visible_items,
        };

        vselect_core::debug!(
            mode = ?mode,
            items = select.store.data().len(),
            "select created"
        );

        let display = select.display();
        select.host.render_display(&display);
        select.pipeline.schedule(RenderReason::DATA);

        if let Some(value) = initial {
            select.set_value(value);
        }
        select
    }

    /// Replace the change handler.
    pub fn set_on_change<F>(&mut self, handler: F)
    where
        F: FnMut(&[Item], &mut ChangeContext<'_>) + 'static,
    {
        if !self.destroyed {
            self.on_change = Some(Box::new(handler));
        }
    }

    // ------------------------------------------------------------------
    // Dropdown state
    // ------------------------------------------------------------------

    /// Open the dropdown.
    ///
    /// Resets the search, shows the full dataset scrolled to the top, and
    /// after the next render scrolls to the first selected item if it is
    /// listed. Returns `false` if the component is disabled, destroyed, or
    /// already open.
    pub fn open(&mut self) -> bool {
        if self.destroyed || !self.enabled || self.state == SelectState::Open {
            return false;
        }
        self.debouncer.cancel();
        self.store.reset_filter();
        self.host.clear_search();
        self.host.set_scroll_offset(0);
        self.state = SelectState::Open;
        self.host.set_open(true);
        self.scroll_to_selection = !self.selection.is_empty();
        self.pipeline.schedule(RenderReason::OPEN);
        true
    }

    /// Close the dropdown. Returns `false` if it was not open.
    pub fn close(&mut self) -> bool {
        if self.destroyed || self.state == SelectState::Closed {
            return false;
        }
        self.state = SelectState::Closed;
        self.scroll_to_selection = false;
        self.host.set_open(false);
        true
    }

    /// Open if closed, close if open.
    pub fn toggle_open(&mut self) -> bool {
        match self.state {
            SelectState::Closed => self.open(),
            SelectState::Open => {
                if self.enabled {
                    self.close()
                } else {
                    false
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Host events
    // ------------------------------------------------------------------

    /// The list viewport scrolled.
    pub fn on_scroll(&mut self) {
        if self.destroyed {
            return;
        }
        self.pipeline.schedule(RenderReason::SCROLL);
    }

    /// Search text changed.
    pub fn on_input(&mut self, text: impl Into<String>) {
        self.on_input_at(text, Instant::now());
    }

    /// Search text changed at `now`.
    pub fn on_input_at(&mut self, text: impl Into<String>, now: Instant) {
        if self.destroyed || !self.enabled {
            return;
        }
        self.debouncer.push_at(text.into(), now);
    }

    /// Apply debounced search input if its quiet window has passed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    /// Apply debounced search input if its quiet window has passed at `now`.
    ///
    /// Returns `true` when the filter changed.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(query) = self.debouncer.tick_at(now) else {
            return false;
        };
        self.store.filter(&query);
        vselect_core::debug!(
            query = %query,
            matches = self.store.filtered_len(),
            "filter applied"
        );
        self.host.set_scroll_offset(0);
        self.pipeline.schedule(RenderReason::FILTER);
        true
    }

    /// Time until [`Select::tick_at`] has work, if any is pending.
    #[must_use]
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        if self.destroyed {
            return None;
        }
        self.debouncer.time_until_fire(now)
    }

    /// Paint hook. Runs the pending list render, if any.
    ///
    /// Returns the reasons of the executed render.
    pub fn on_frame(&mut self) -> Option<RenderReason> {
        if self.destroyed {
            return None;
        }
        let reasons = self
            .pipeline
            .on_frame(&mut self.host, &self.store, &self.selection)?;
        self.after_render();
        Some(reasons)
    }

    fn after_render(&mut self) {
        if !std::mem::take(&mut self.scroll_to_selection) {
            return;
        }
        let position = self
            .selection
            .first()
            .and_then(|first| self.store.filtered_position(first.id));
        if let Some(index) = position {
            let offset = offset_of(index, self.pipeline.item_height());
            self.host.set_scroll_offset(offset);
            self.pipeline.schedule(RenderReason::SCROLL);
        }
    }

    /// Row click on filtered index `index`.
    ///
    /// Ignored while disabled or when `index` is outside the filtered view.
    pub fn select_index(&mut self, index: usize) -> Option<ToggleOutcome> {
        if self.destroyed || !self.enabled {
            return None;
        }
        let item = self.store.filtered_get(index)?.clone();
        self.toggle(item)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Toggle `item`.
    ///
    /// In single mode this selects `item` and closes the dropdown.
    /// Returns `None` once destroyed.
    pub fn toggle(&mut self, item: Item) -> Option<ToggleOutcome> {
        if self.destroyed {
            return None;
        }
        let outcome = self.selection.toggle(item);
        if outcome == ToggleOutcome::Replaced {
            self.close();
        }
        self.commit();
        Some(outcome)
    }

    /// Remove the item with `id` from the selection.
    ///
    /// Returns `false`, with no side effects, if it was not selected.
    pub fn remove(&mut self, id: impl Into<ItemId>) -> bool {
        if self.destroyed || !self.selection.remove(id.into()) {
            return false;
        }
        self.commit();
        true
    }

    /// Replace the selection.
    ///
    /// Ids are resolved against the dataset; unknown ids are dropped,
    /// duplicates keep their first occurrence, and single mode keeps the
    /// first resolved item.
    pub fn set_value(&mut self, value: impl Into<SelectValue>) {
        if self.destroyed {
            return;
        }
        let value = value.into();
        let resolution = self.selection.resolve(&value, &self.store);
        if !resolution.unresolved.is_empty() {
            vselect_core::debug!(
                unresolved = ?resolution.unresolved,
                "dropping ids not present in the dataset"
            );
        }
        self.selection.replace(resolution.items);
        self.commit();
    }

    /// The selected items, in selection order.
    #[must_use]
    pub fn value(&self) -> &[Item] {
        self.selection.items()
    }

    /// The selection in value-attribute format.
    #[must_use]
    pub fn value_string(&self) -> String {
        self.selection.serialize()
    }

    /// Empty the selection.
    pub fn clear(&mut self) {
        self.set_value(SelectValue::default());
    }

    fn commit(&mut self) {
        let display = self.display();
        self.host.render_display(&display);
        let value = self.selection.serialize();
        self.host.write_value_attr(&value);
        self.pipeline.schedule(RenderReason::SELECTION);
        self.notify();
        self.drain();
    }

    fn notify(&mut self) {
        let Some(handler) = self.on_change.as_mut() else {
            return;
        };
        let mut ctx = ChangeContext {
            queue: &mut self.queue,
            mode: self.selection.mode(),
        };
        handler(self.selection.items(), &mut ctx);
    }

    fn drain(&mut self) {
        let Some(mut drain) = self.queue.start_drain() else {
            return;
        };
        while let Some(cmd) = self.queue.next(&mut drain) {
            if self.destroyed {
                break;
            }
            self.apply(cmd);
        }
        self.queue.finish(drain);
    }

    fn apply(&mut self, cmd: SelectCmd) {
        vselect_core::trace!(cmd = ?cmd, "applying deferred command");
        match cmd {
            SelectCmd::SetValue(value) => self.set_value(value),
            SelectCmd::Clear => self.clear(),
            SelectCmd::Toggle(item) => {
                self.toggle(item);
            }
            SelectCmd::Remove(id) => {
                self.remove(id);
            }
            SelectCmd::Close => {
                self.close();
            }
            SelectCmd::Refresh => self.refresh(),
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Allow interaction.
    pub fn enable(&mut self) {
        if self.destroyed {
            return;
        }
        self.enabled = true;
        self.host.set_disabled(false);
    }

    /// Block opening, row clicks, and search input. The selection is kept.
    pub fn disable(&mut self) {
        if self.destroyed {
            return;
        }
        self.enabled = false;
        self.host.set_disabled(true);
    }

    /// Render the list now, dropping any pending frame request.
    pub fn refresh(&mut self) {
        if self.destroyed {
            return;
        }
        self.pipeline
            .render_now(&mut self.host, &self.store, &self.selection);
        self.after_render();
    }

    /// Replace the dataset. The selection and search text are kept.
    ///
    /// A scroll offset past the end of the new list is pulled back to the
    /// last full page.
    pub fn set_data(&mut self, data: Vec<Item>) {
        if self.destroyed {
            return;
        }
        self.store.set_data(data);
        let offset = self.host.scroll_offset();
        let clamped = clamp_scroll_offset(
            offset,
            self.host.viewport_height(),
            self.pipeline.item_height(),
            self.store.filtered_len(),
        );
        if clamped != offset {
            self.host.set_scroll_offset(clamped);
        }
        self.pipeline.schedule(RenderReason::DATA);
    }

    /// Tear down. Every later call is a no-op.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.pipeline.cancel();
        self.debouncer.cancel();
        #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
        let dropped = self.queue.clear();
        self.on_change = None;
        self.scroll_to_selection = false;
        self.state = SelectState::Closed;
        self.host.release();
        #[cfg(feature = "tracing")]
        vselect_core::debug!(dropped_commands = dropped, "select destroyed");
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn mode(&self) -> SelectMode {
        self.selection.mode()
    }

    #[must_use]
    pub fn state(&self) -> SelectState {
        self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == SelectState::Open
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// What the collapsed control shows for the current selection.
    #[must_use]
    pub fn display(&self) -> SelectDisplay {
        self.formatter.format(self.selection.items())
    }

    /// The dataset.
    #[must_use]
    pub fn data(&self) -> &[Item] {
        self.store.data()
    }

    /// The filtered view, in dataset order.
    pub fn filtered(&self) -> impl Iterator<Item = &Item> + '_ {
        self.store.filtered()
    }

    #[must_use]
    pub fn filtered_len(&self) -> usize {
        self.store.filtered_len()
    }

    /// Applied (debounced) search text, lowercased.
    #[must_use]
    pub fn query(&self) -> &str {
        self.store.query()
    }

    /// Window of the most recent list render.
    #[must_use]
    pub fn window(&self) -> Option<VirtualWindow> {
        self.pipeline.last_window()
    }

    /// Whether a list render is waiting for the next frame.
    #[must_use]
    pub fn has_pending_render(&self) -> bool {
        self.pipeline.has_pending()
    }

    #[must_use]
    pub fn render_stats(&self) -> RenderStats {
        self.pipeline.stats()
    }

    #[must_use]
    pub fn item_height(&self) -> u32 {
        self.pipeline.item_height()
    }

    /// Viewport height that shows `visible_items` rows.
    #[must_use]
    pub fn preferred_viewport_height(&self) -> u32 {
        self.visible_items.saturating_mul(self.pipeline.item_height())
    }

    /// Commands dropped because a handler kept queueing past the budget.
    #[must_use]
    pub fn dropped_commands(&self) -> u64 {
        self.queue.dropped()
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Destroy and hand back the host surface.
    pub fn into_host(mut self) -> H {
        self.destroy();
        self.host
    }
}

/// Builds components from a shared base configuration.
///
/// The base is captured once and never changes, so components created
/// from the same factory always start from the same defaults. Each call
/// layers options on a copy: base, then host data attributes, then the
/// caller's patch.
#[derive(Debug, Clone, Default)]
pub struct SelectFactory {
    base: Arc<SelectConfig>,
}

impl SelectFactory {
    /// Factory over `base`, or the built-in defaults.
    #[must_use]
    pub fn new(base: Option<SelectConfig>) -> Self {
        Self {
            base: Arc::new(base.unwrap_or_default()),
        }
    }

    /// The captured base configuration.
    #[must_use]
    pub fn base(&self) -> &SelectConfig {
        &self.base
    }

    /// Base configuration with `patch` applied.
    #[must_use]
    pub fn config(&self, patch: &ConfigPatch) -> SelectConfig {
        (*self.base).clone().with_patch(patch)
    }

    /// Create a component.
    #[must_use]
    pub fn create<H: HostSurface>(&self, patch: &ConfigPatch, host: H) -> Select<H> {
        Select::new(self.config(patch), host)
    }

    /// Create a component with a change handler.
    #[must_use]
    pub fn create_with_handler<H, F>(&self, patch: &ConfigPatch, host: H, handler: F) -> Select<H>
    where
        H: HostSurface,
        F: FnMut(&[Item], &mut ChangeContext<'_>) + 'static,
    {
        Select::with_handler(self.config(patch), host, handler)
    }

    /// Create a component, reading options from host data attributes.
    ///
    /// Attributes override the base and `patch` overrides attributes.
    /// Malformed attributes are skipped with a warning.
    #[must_use]
    pub fn create_with_attrs<H, G>(
        &self,
        attrs: G,
        patch: &ConfigPatch,
        host: H,
        on_change: Option<ChangeHandler>,
    ) -> Select<H>
    where
        H: HostSurface,
        G: FnMut(&str) -> Option<String>,
    {
        let parsed = ConfigPatch::from_attrs_with(attrs);
        #[cfg(feature = "tracing")]
        for error in &parsed.errors {
            vselect_core::warn!(%error, "ignoring malformed data attribute");
        }
        let merged = parsed.patch.merge(patch.clone());
        Select::build(self.config(&merged), host, on_change)
    }

    /// Single-select over `data` with otherwise base options.
    #[must_use]
    pub fn single<H: HostSurface>(&self, data: Vec<Item>, host: H) -> Select<H> {
        self.create(&ConfigPatch::new().multiple(false).data(data), host)
    }

    /// Multi-select over `data` with otherwise base options.
    #[must_use]
    pub fn multiple<H: HostSurface>(&self, data: Vec<Item>, host: H) -> Select<H> {
        self.create(&ConfigPatch::new().multiple(true).data(data), host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderSlice;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Rows(Vec<i64>),
        Display(Vec<String>),
        Open(bool),
        Disabled(bool),
        ClearSearch,
        Attr(String),
        Scroll(u64),
        Release,
    }

    #[derive(Default)]
    struct TestHost {
        viewport: u32,
        scroll: u64,
        attr: Option<String>,
        events: Vec<Event>,
    }

    impl TestHost {
        fn new() -> Self {
            Self {
                viewport: 360,
                ..Default::default()
            }
        }

        fn take(&mut self) -> Vec<Event> {
            std::mem::take(&mut self.events)
        }

        fn last_rows(&self) -> Option<&Vec<i64>> {
            self.events.iter().rev().find_map(|e| match e {
                Event::Rows(ids) => Some(ids),
                _ => None,
            })
        }
    }

    impl HostSurface for TestHost {
        fn viewport_height(&self) -> u32 {
            self.viewport
        }

        fn scroll_offset(&self) -> u64 {
            self.scroll
        }

        fn set_scroll_offset(&mut self, offset: u64) {
            self.scroll = offset;
            self.events.push(Event::Scroll(offset));
        }

        fn render_slice(&mut self, slice: &RenderSlice<'_>) {
            self.events.push(Event::Rows(
                slice.rows.iter().map(|r| r.item.id.get()).collect(),
            ));
        }

        fn render_display(&mut self, display: &SelectDisplay) {
            self.events.push(Event::Display(
                display.labels().into_iter().map(String::from).collect(),
            ));
        }

        fn set_open(&mut self, open: bool) {
            self.events.push(Event::Open(open));
        }

        fn set_disabled(&mut self, disabled: bool) {
            self.events.push(Event::Disabled(disabled));
        }

        fn clear_search(&mut self) {
            self.events.push(Event::ClearSearch);
        }

        fn value_attr(&self) -> Option<String> {
            self.attr.clone()
        }

        fn write_value_attr(&mut self, value: &str) {
            self.events.push(Event::Attr(value.to_string()));
        }

        fn release(&mut self) {
            self.events.push(Event::Release);
        }
    }

    fn fruit() -> Vec<Item> {
        vec![
            Item::new(1, "Apple"),
            Item::new(2, "Banana"),
            Item::new(3, "Cherry"),
        ]
    }

    fn single() -> Select<TestHost> {
        SelectFactory::default().single(fruit(), TestHost::new())
    }

    fn multi() -> Select<TestHost> {
        SelectFactory::default().multiple(fruit(), TestHost::new())
    }

    fn ids(items: &[Item]) -> Vec<i64> {
        items.iter().map(|i| i.id.get()).collect()
    }

    #[test]
    fn construction_shows_placeholder_and_schedules_render() {
        let mut select = single();
        assert_eq!(
            select.host_mut().take(),
            vec![Event::Display(vec!["Select...".into()])]
        );
        assert!(select.has_pending_render());
        assert_eq!(select.on_frame(), Some(RenderReason::DATA));
        assert_eq!(select.host().last_rows(), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn set_value_side_effects_run_in_order() {
        let mut select = multi();
        select.host_mut().take();
        select.set_value(vec![3i64, 1]);
        assert_eq!(
            select.host_mut().take(),
            vec![
                Event::Display(vec!["Cherry".into(), "Apple".into()]),
                Event::Attr("3,1".into()),
            ]
        );
        assert!(select.has_pending_render());
    }

    #[test]
    fn single_toggle_closes_dropdown() {
        let mut select = single();
        assert!(select.open());
        select.host_mut().take();
        assert_eq!(select.select_index(1), Some(ToggleOutcome::Replaced));
        assert!(!select.is_open());
        let events = select.host_mut().take();
        assert_eq!(events[0], Event::Open(false));
        assert_eq!(events[1], Event::Display(vec!["Banana".into()]));
        assert_eq!(events[2], Event::Attr("2".into()));
    }

    #[test]
    fn multi_toggle_keeps_dropdown_open() {
        let mut select = multi();
        select.open();
        select.select_index(0);
        select.select_index(2);
        assert!(select.is_open());
        assert_eq!(ids(select.value()), vec![1, 3]);
        assert_eq!(select.value_string(), "1,3");
    }

    #[test]
    fn open_resets_filter_and_scrolls_to_first_selected() {
        let data: Vec<Item> = (0..100).map(|i| Item::new(i, format!("Item {i}"))).collect();
        let mut select = SelectFactory::default().multiple(data, TestHost::new());
        select.set_value(vec![40i64, 2]);
        select.on_input_at("item 4", Instant::now());
        assert!(select.open());
        assert_eq!(select.next_deadline(Instant::now()), None);
        assert_eq!(select.filtered_len(), 100);

        let reasons = select.on_frame().unwrap_or_default();
        assert!(reasons.contains(RenderReason::OPEN));
        // Scrolled to row 40 after the open render, then rendered again there.
        assert_eq!(select.host().scroll, 40 * 36);
        assert_eq!(select.on_frame(), Some(RenderReason::SCROLL));
        assert_eq!(select.window().map(|w| w.start), Some(40 - 5));
    }

    #[test]
    fn open_without_selection_stays_at_top() {
        let mut select = multi();
        select.host_mut().scroll = 72;
        select.open();
        select.on_frame();
        assert_eq!(select.host().scroll, 0);
        assert_eq!(select.on_frame(), None);
    }

    #[test]
    fn disabled_blocks_open_and_clicks() {
        let mut select = multi();
        select.set_value(1);
        select.disable();
        assert!(!select.open());
        assert!(!select.toggle_open());
        assert_eq!(select.select_index(1), None);
        assert_eq!(ids(select.value()), vec![1]);
        select.enable();
        assert!(select.open());
        let events = select.host_mut().take();
        assert!(events.contains(&Event::Disabled(true)));
        assert!(events.contains(&Event::Disabled(false)));
    }

    #[test]
    fn debounced_filter_resets_scroll() {
        let start = Instant::now();
        let mut select = multi();
        select.open();
        select.on_frame();
        select.host_mut().scroll = 36;
        select.on_input_at("a", start);
        select.on_input_at("an", start + Duration::from_millis(50));
        assert!(!select.tick_at(start + Duration::from_millis(120)));
        assert!(select.tick_at(start + Duration::from_millis(150)));
        assert_eq!(select.query(), "an");
        assert_eq!(select.host().scroll, 0);
        assert_eq!(select.on_frame(), Some(RenderReason::FILTER));
        assert_eq!(select.host().last_rows(), Some(&vec![2]));
    }

    #[test]
    fn handler_sees_settled_state_and_queued_commands_run_in_order() {
        let seen: Rc<RefCell<Vec<Vec<i64>>>> = Rc::default();
        let log = Rc::clone(&seen);
        let config = SelectConfig::new().multiple(true).data(fruit());
        let mut select = Select::with_handler(config, TestHost::new(), move |items, ctx| {
            log.borrow_mut().push(ids(items));
            if items.len() == 1 && items[0].id == ItemId(1) {
                ctx.toggle(Item::new(2, "Banana"));
                ctx.toggle(Item::new(3, "Cherry"));
            }
        });
        select.toggle(Item::new(1, "Apple"));
        assert_eq!(*seen.borrow(), vec![vec![1], vec![1, 2], vec![1, 2, 3]]);
        assert_eq!(ids(select.value()), vec![1, 2, 3]);
    }

    #[test]
    fn runaway_handler_is_cut_off() {
        let config = SelectConfig::new().multiple(true).data(fruit());
        let mut select = Select::with_handler(config, TestHost::new(), |_, ctx| {
            ctx.toggle(Item::new(1, "Apple"));
        });
        select.toggle(Item::new(1, "Apple"));
        assert!(select.dropped_commands() > 0);
    }

    #[test]
    fn host_value_attr_overrides_configured_value() {
        let host = TestHost {
            attr: Some("3".into()),
            ..TestHost::new()
        };
        let config = SelectConfig::new().data(fruit()).value(1);
        let select = Select::new(config, host);
        assert_eq!(select.value(), &[Item::new(3, "Cherry")]);
    }

    #[test]
    fn initial_value_notifies_handler() {
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let config = SelectConfig::new().data(fruit()).value(2);
        let select = Select::with_handler(config, TestHost::new(), move |_, _| {
            *counter.borrow_mut() += 1;
        });
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(ids(select.value()), vec![2]);
    }

    #[test]
    fn remove_unknown_id_has_no_side_effects() {
        let mut select = multi();
        select.set_value(1);
        select.host_mut().take();
        assert!(!select.remove(9));
        assert!(select.host().events.is_empty());
        assert!(select.remove(1));
        assert!(select.value().is_empty());
    }

    #[test]
    fn clear_twice_leaves_empty_selection() {
        let mut select = multi();
        select.set_value("1,2");
        select.clear();
        select.clear();
        assert!(select.value().is_empty());
        assert_eq!(select.value_string(), "");
        assert!(!select.display().show_clear());
    }

    #[test]
    fn refresh_renders_immediately() {
        let mut select = single();
        select.on_scroll();
        select.refresh();
        assert!(!select.has_pending_render());
        assert_eq!(select.render_stats().renders, 1);
        assert_eq!(select.on_frame(), None);
    }

    #[test]
    fn destroy_is_terminal() {
        let mut select = multi();
        select.on_input_at("a", Instant::now());
        select.destroy();
        assert!(select.host().events.contains(&Event::Release));
        select.host_mut().take();

        select.set_value(1);
        select.clear();
        select.enable();
        select.refresh();
        select.destroy();
        assert!(!select.open());
        assert!(!select.remove(1));
        assert_eq!(select.on_frame(), None);
        assert!(!select.tick_at(Instant::now() + Duration::from_secs(1)));
        assert!(select.value().is_empty());
        assert!(select.host().events.is_empty());
    }

    #[test]
    fn set_data_pulls_back_stale_scroll() {
        let data: Vec<Item> = (0..100).map(|i| Item::new(i, format!("Item {i}"))).collect();
        let mut select = SelectFactory::default().multiple(data, TestHost::new());
        select.host_mut().scroll = 3_000;
        select.on_frame();
        select.host_mut().take();

        let shorter: Vec<Item> = (0..20).map(|i| Item::new(i, format!("Item {i}"))).collect();
        select.set_data(shorter);
        // 20 rows * 36px - 360px viewport
        assert_eq!(select.host().scroll, 360);
        assert_eq!(select.host_mut().take(), vec![Event::Scroll(360)]);

        select.on_frame();
        assert_eq!(select.window().map(|w| w.start), Some(5));

        select.set_data((0..3).map(|i| Item::new(i, format!("Item {i}"))).collect());
        assert_eq!(select.host().scroll, 0);
    }

    #[test]
    fn set_data_keeps_selection_and_rerenders() {
        let mut select = multi();
        select.set_value(2);
        select.on_frame();
        select.set_data(vec![Item::new(7, "Grape")]);
        assert_eq!(select.on_frame(), Some(RenderReason::DATA));
        assert_eq!(select.host().last_rows(), Some(&vec![7]));
        assert_eq!(ids(select.value()), vec![2]);
    }

    #[test]
    fn invalid_config_degrades_to_defaults() {
        let config = SelectConfig::new().item_height(0).visible_items(0);
        let select = Select::new(config, TestHost::new());
        assert_eq!(select.item_height(), 36);
        assert_eq!(select.preferred_viewport_height(), 360);
    }

    #[test]
    fn factory_layers_attrs_under_patch() {
        let factory = SelectFactory::new(Some(SelectConfig::new().placeholder("Base")));
        let attrs = |name: &str| match name {
            "data-multiple" => Some("true".to_string()),
            "data-placeholder" => Some("From attr".to_string()),
            "data-tag-max-length" => Some("zero".to_string()),
            _ => None,
        };
        let patch = ConfigPatch::new().placeholder("From options").data(fruit());
        let select = factory.create_with_attrs(attrs, &patch, TestHost::new(), None);
        assert_eq!(select.mode(), SelectMode::Multiple);
        assert_eq!(select.display().labels(), vec!["From options"]);
        assert_eq!(factory.base().placeholder, "Base");
    }
}
