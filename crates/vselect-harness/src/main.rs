#![forbid(unsafe_code)]

//! Scripted vselect demo.
//!
//! Drives a select component over a headless [`RecordingSurface`] and
//! prints a text snapshot after every step: open, scroll, type a filter,
//! pick rows, clear.
//!
//! # Running
//!
//! ```sh
//! cargo run -p vselect-harness -- [--data items.json] [--options options.json] [--jsonl]
//! ```
//!
//! `--data` loads a JSON array of `{"id", "text"}` items (default: 10,000
//! generated items). `--options` overlays camelCase options. `--jsonl`
//! also prints the surface event log. Set `RUST_LOG=debug` for component
//! logs on stderr.

use std::process::ExitCode;
use std::time::{Duration, Instant};

use tracing::info;
use tracing_subscriber::EnvFilter;
use vselect::json::{load_config, load_items};
use vselect::{ConfigPatch, Item, Select, SelectConfig, SelectFactory};
use vselect_harness::{RecordingSurface, snapshot_text};

#[derive(Debug, Default)]
struct Args {
    data: Option<String>,
    options: Option<String>,
    jsonl: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--data" => args.data = Some(iter.next().ok_or("--data needs a path")?),
            "--options" => args.options = Some(iter.next().ok_or("--options needs a path")?),
            "--jsonl" => args.jsonl = true,
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(args)
}

fn generated_items(n: i64) -> Vec<Item> {
    const FRUIT: [&str; 6] = ["Apple", "Banana", "Cherry", "Durian", "Elderberry", "Fig"];
    (1..=n)
        .map(|i| Item::new(i, format!("{} #{i}", FRUIT[(i as usize) % FRUIT.len()])))
        .collect()
}

fn build_config(args: &Args) -> vselect::Result<SelectConfig> {
    let mut base = SelectConfig::new().multiple(true).max_tag_count(3);
    if let Some(path) = &args.options {
        let text = std::fs::read_to_string(path)?;
        base = load_config(base, &text)?;
    }
    let data = match &args.data {
        Some(path) => load_items(path)?,
        None if base.data.is_empty() => generated_items(10_000),
        None => std::mem::take(&mut base.data),
    };
    Ok(base.data(data))
}

fn step(select: &Select<RecordingSurface>, title: &str) {
    println!("── {title} ──");
    println!("{}\n", snapshot_text(select.host()));
}

fn run(args: &Args) -> vselect::Result<()> {
    let config = build_config(args)?;
    let viewport = config.preferred_viewport_height();
    let factory = SelectFactory::new(Some(config));
    let mut select = factory.create_with_handler(
        &ConfigPatch::new(),
        RecordingSurface::new(viewport),
        |items, ctx| {
            info!(selected = items.len(), mode = ?ctx.mode(), "selection changed");
        },
    );

    select.on_frame();
    step(&select, "initial");

    select.open();
    select.on_frame();
    select.on_frame();
    step(&select, "open");

    let offset = u64::from(select.item_height()) * 40;
    select.host_mut().user_scroll(offset);
    for _ in 0..5 {
        select.on_scroll();
    }
    select.on_frame();
    step(&select, "scrolled (5 scroll events, 1 render)");

    let t0 = Instant::now();
    for (i, text) in ["b", "ba", "ban"].into_iter().enumerate() {
        select.on_input_at(text, t0 + Duration::from_millis(30 * i as u64));
    }
    let mut now = t0;
    while let Some(wait) = select.next_deadline(now) {
        now += wait;
        select.tick_at(now);
    }
    select.on_frame();
    step(&select, &format!("filtered by {:?}", select.query()));

    for index in 0..4 {
        select.select_index(index);
    }
    select.on_frame();
    step(&select, "picked four rows");

    if let Some(first) = select.value().first().map(|item| item.id) {
        select.remove(first);
    }
    select.on_frame();
    step(&select, "removed first tag");

    select.clear();
    select.close();
    select.on_frame();
    step(&select, "cleared");

    let stats = select.render_stats();
    println!(
        "renders: {} (immediate {}), requests: {}, coalesced: {}",
        stats.renders, stats.immediate, stats.frames.requested, stats.frames.coalesced
    );

    if args.jsonl {
        print!("{}", select.host().events_jsonl());
    }

    select.destroy();
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
