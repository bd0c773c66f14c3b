#![forbid(unsafe_code)]

//! Integration tests: the select component driven through a recording host.
//!
//! Run `BLESS=1 cargo test --package vselect-harness` to create/update snapshots.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use vselect::{ConfigPatch, Item, ItemId, RenderReason, Select, SelectConfig, SelectFactory};
use vselect_harness::{RecordingSurface, SurfaceEvent, assert_snapshot, snapshot_text};

fn fruit() -> Vec<Item> {
    vec![
        Item::new(1, "Apple"),
        Item::new(2, "Banana"),
        Item::new(3, "Cherry"),
    ]
}

fn numbered(n: i64) -> Vec<Item> {
    (0..n).map(|i| Item::new(i, format!("Item {i}"))).collect()
}

fn ids(items: &[Item]) -> Vec<i64> {
    items.iter().map(|i| i.id.get()).collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn scenario_single_set_value() {
    let mut select = SelectFactory::default().single(fruit(), RecordingSurface::new(360));
    select.set_value(2);
    assert_eq!(select.value(), &[Item::new(2, "Banana")]);
    assert_eq!(select.host().current_value_attr(), Some("2"));
}

#[test]
fn scenario_multi_toggle_sequence() {
    let mut select = SelectFactory::default().multiple(fruit(), RecordingSurface::new(360));
    select.toggle(Item::new(1, "Apple"));
    select.toggle(Item::new(2, "Banana"));
    select.toggle(Item::new(1, "Apple"));
    assert_eq!(select.value(), &[Item::new(2, "Banana")]);
}

#[test]
fn scenario_overflow_tag() {
    let patch = ConfigPatch::new()
        .multiple(true)
        .max_tag_count(Some(1))
        .data(vec![Item::new(1, "A"), Item::new(2, "B"), Item::new(3, "C")]);
    let mut select = SelectFactory::default().create(&patch, RecordingSurface::new(360));
    select.set_value(vec![1i64, 2, 3]);
    let display = select.display();
    assert_eq!(display.labels(), vec!["A", "+2"]);
    assert_eq!(display.tags()[1].title, "B, C");
}

#[test]
fn scenario_window_after_scroll() {
    let mut select = SelectFactory::default().multiple(numbered(100), RecordingSurface::new(360));
    select.host_mut().user_scroll(360);
    select.on_scroll();
    select.on_frame();

    let window = select.window().unwrap_or_default();
    assert_eq!(window.start, 5);
    assert_eq!(window.end, 26);
    assert_eq!(window.top_padding, 5 * 36);
    assert_eq!(window.total_height, 3600);
    assert_eq!(select.host().row_ids().first(), Some(&5));
    assert_eq!(select.host().rows().len(), 21);
}

#[test]
fn scenario_filter_without_matches() {
    let t0 = Instant::now();
    let mut select = SelectFactory::default().multiple(fruit(), RecordingSurface::new(360));
    select.open();
    select.on_input_at("xyz", t0);
    assert!(select.tick_at(t0 + Duration::from_millis(100)));
    select.on_frame();

    assert_eq!(select.filtered_len(), 0);
    let window = select.window().unwrap_or_default();
    assert_eq!(window.total_height, 0);
    assert!(window.is_empty());
    assert!(select.host().rows().is_empty());
}

// ============================================================================
// Scheduling
// ============================================================================

#[test]
fn many_triggers_render_once_per_frame() {
    let mut select = SelectFactory::default().multiple(numbered(1_000), RecordingSurface::new(360));
    for offset in (0..20).map(|i| i * 36) {
        select.host_mut().user_scroll(offset);
        select.on_scroll();
    }
    select.set_value(vec![3i64, 4]);

    assert_eq!(
        select.on_frame(),
        Some(RenderReason::DATA | RenderReason::SCROLL | RenderReason::SELECTION)
    );
    assert_eq!(select.on_frame(), None);
    assert_eq!(select.host().renders(), 1);
    assert_eq!(select.render_stats().frames.coalesced, 21);
}

#[test]
fn filter_debounce_applies_latest_input_only() {
    let t0 = Instant::now();
    let ms = Duration::from_millis;
    let mut select = SelectFactory::default().multiple(numbered(200), RecordingSurface::new(360));
    select.on_frame();

    select.on_input_at("1", t0);
    select.on_input_at("19", t0 + ms(40));
    select.on_input_at("199", t0 + ms(80));
    assert!(!select.tick_at(t0 + ms(150)));
    assert_eq!(select.next_deadline(t0 + ms(150)), Some(ms(30)));
    assert!(select.tick_at(t0 + ms(180)));
    assert_eq!(select.next_deadline(t0 + ms(180)), None);

    assert_eq!(select.query(), "199");
    assert_eq!(select.on_frame(), Some(RenderReason::FILTER));
    assert_eq!(select.host().row_ids(), vec![199]);
}

#[test]
fn render_keeps_scroll_position() {
    let mut select = SelectFactory::default().multiple(numbered(100), RecordingSurface::new(360));
    select.host_mut().user_scroll(1_000);
    select.on_scroll();
    select.host_mut().take_events();
    select.on_frame();

    let events = select.host_mut().take_events();
    assert!(matches!(events[0], SurfaceEvent::Rows { .. }));
    assert_eq!(events[1], SurfaceEvent::Scroll(1_000));
    assert_eq!(select.host().current_scroll(), 1_000);
}

#[test]
fn open_scrolls_to_first_selected() {
    let patch = ConfigPatch::new()
        .multiple(true)
        .max_tag_count(Some(1))
        .data(numbered(20));
    let mut select = SelectFactory::default().create(&patch, RecordingSurface::new(108));
    select.set_value(vec![5i64, 9]);
    assert!(select.open());
    select.on_frame();
    assert_eq!(select.on_frame(), Some(RenderReason::SCROLL));
    assert_snapshot!("open_scrolls_to_first_selected", &snapshot_text(select.host()));
}

#[test]
fn open_skips_scroll_when_selection_is_not_listed() {
    let mut select = SelectFactory::default().multiple(numbered(50), RecordingSurface::new(108));
    select.set_value(10);
    select.set_data(numbered(5));
    select.open();
    select.on_frame();
    assert_eq!(select.host().current_scroll(), 0);
    assert_eq!(select.on_frame(), None);
}

#[test]
fn single_pick_closes() {
    let mut select = SelectFactory::default().single(fruit(), RecordingSurface::new(108));
    select.open();
    select.select_index(1);
    select.on_frame();
    assert!(!select.is_open());
    assert_snapshot!("single_pick_closes", &snapshot_text(select.host()));
}

// ============================================================================
// Notifications
// ============================================================================

#[test]
fn handler_mutations_run_after_side_effects_in_order() {
    let log: Rc<RefCell<Vec<String>>> = Rc::default();
    let seen = Rc::clone(&log);
    let config = SelectConfig::new().multiple(true).data(numbered(10));
    let mut select = Select::with_handler(config, RecordingSurface::new(360), move |items, ctx| {
        seen.borrow_mut().push(format!("{:?}", ids(items)));
        match items.len() {
            1 => {
                ctx.set_value(vec![1i64, 2]);
                ctx.toggle(Item::new(3, "Item 3"));
            }
            3 => ctx.clear(),
            _ => {}
        }
    });
    select.host_mut().take_events();

    select.toggle(Item::new(1, "Item 1"));

    assert_eq!(*log.borrow(), vec!["[1]", "[1, 2]", "[1, 2, 3]", "[]"]);
    let attrs: Vec<String> = select
        .host()
        .events()
        .iter()
        .filter_map(|e| match e {
            SurfaceEvent::ValueAttr(v) => Some(v.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(attrs, vec!["1", "1,2", "1,2,3", ""]);
    assert!(select.value().is_empty());
}

#[test]
fn host_value_attribute_seeds_selection() {
    let factory = SelectFactory::default();
    let host = RecordingSurface::new(360).with_value_attr("3, 1,x");
    let patch = ConfigPatch::new().multiple(true).data(fruit()).value(2);
    let select = factory.create(&patch, host);
    assert_eq!(ids(select.value()), vec![3, 1]);
    assert_eq!(select.host().current_value_attr(), Some("3,1"));
}

#[test]
fn data_attributes_layer_under_options() {
    let factory = SelectFactory::new(Some(SelectConfig::new().tag_max_length(4)));
    let attrs = |name: &str| match name {
        "data-multiple" => Some("1".to_string()),
        "data-max-tag-count" => Some("2".to_string()),
        _ => None,
    };
    let mut select = factory.create_with_attrs(
        attrs,
        &ConfigPatch::new().data(fruit()),
        RecordingSurface::new(360),
        None,
    );
    select.set_value("1,2,3");
    assert_eq!(select.display().labels(), vec!["Appl...", "Bana...", "+1"]);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn disable_blocks_interaction_but_not_programmatic_value() {
    let mut select = SelectFactory::default().multiple(fruit(), RecordingSurface::new(360));
    select.disable();
    assert!(select.host().is_disabled());
    assert!(!select.open());
    assert_eq!(select.select_index(0), None);

    select.set_value(3);
    assert_eq!(ids(select.value()), vec![3]);

    select.enable();
    assert!(!select.host().is_disabled());
    assert!(select.open());
    assert!(select.host().is_open());
}

#[test]
fn refresh_renders_now() {
    let mut select = SelectFactory::default().single(fruit(), RecordingSurface::new(360));
    select.refresh();
    assert_eq!(select.host().renders(), 1);
    assert!(!select.has_pending_render());
}

#[test]
fn destroy_releases_everything() {
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let factory = SelectFactory::default();
    let mut select = factory.create_with_handler(
        &ConfigPatch::new().multiple(true).data(fruit()),
        RecordingSurface::new(360),
        move |_, _| *counter.borrow_mut() += 1,
    );
    select.open();
    select.on_input_at("a", Instant::now());
    select.destroy();

    assert!(select.is_destroyed());
    assert!(select.host().is_released());
    assert!(!select.has_pending_render());
    assert_eq!(select.next_deadline(Instant::now()), None);

    let before = select.host().events().len();
    select.set_value(1);
    select.toggle(Item::new(2, "Banana"));
    select.clear();
    select.refresh();
    select.enable();
    assert!(!select.open());
    assert_eq!(select.on_frame(), None);
    assert_eq!(select.host().events().len(), before);
    assert_eq!(*calls.borrow(), 0);
    assert_eq!(select.value(), &[] as &[Item]);
}

#[test]
fn ids_are_compared_not_text() {
    let mut select = SelectFactory::default().multiple(fruit(), RecordingSurface::new(360));
    select.toggle(Item::new(1, "Renamed"));
    select.toggle(Item::new(1, "Apple"));
    assert!(select.value().is_empty());
    assert!(!select.remove(ItemId(1)));
}
