//! Benchmarks for window computation, filtering, and list rendering.
//!
//! Run with: cargo bench -p vselect-widgets

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use vselect_core::{Item, SelectMode};
use vselect_widgets::{ItemStore, RenderSlice, Selection, compute_window};

fn dataset(n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| Item::new(i as i64, format!("Option {i:06} {}", ["alpha", "beta", "gamma"][i % 3])))
        .collect()
}

// ============================================================================
// Window computation
// ============================================================================

fn bench_compute_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("virtualized/compute_window");

    for total in [1_000usize, 100_000, 1_000_000] {
        group.bench_with_input(BenchmarkId::from_parameter(total), &total, |b, &total| {
            let mut offset = 0u64;
            b.iter(|| {
                offset = (offset + 37) % (total as u64 * 36);
                black_box(compute_window(black_box(offset), 360, 36, total))
            })
        });
    }

    group.finish();
}

// ============================================================================
// Filtering
// ============================================================================

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("item_store/filter");

    for (count, label) in [(10_000, "10K"), (100_000, "100K")] {
        let mut store = ItemStore::new(dataset(count));
        for query in ["gamma", "0042", "zzz"] {
            group.bench_function(BenchmarkId::new(label, query), |b| {
                b.iter(|| {
                    store.filter(black_box(query));
                    black_box(store.filtered_len());
                })
            });
        }
    }

    group.finish();
}

// ============================================================================
// Slice building
// ============================================================================

fn bench_render_slice(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/slice");

    let store = ItemStore::new(dataset(100_000));
    let mut selection = Selection::new(SelectMode::Multiple);
    for i in (0..100_000).step_by(97) {
        selection.toggle(Item::new(i, "x"));
    }

    for scroll in [0u64, 1_800_000, 3_599_000] {
        let window = compute_window(scroll, 360, 36, store.filtered_len());
        group.bench_with_input(BenchmarkId::from_parameter(scroll), &window, |b, window| {
            b.iter(|| black_box(RenderSlice::build(&store, &selection, *window, 36)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_window, bench_filter, bench_render_slice);

criterion_main!(benches);
