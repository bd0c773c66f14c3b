#![forbid(unsafe_code)]

//! Quiescence debouncer for bursty input.
//!
//! Each pushed value replaces the pending one and restarts the quiet window.
//! The value fires from [`Debouncer::tick_at`] once no new value has arrived
//! for the full window, so only the last value of a burst ever takes effect.
//!
//! ```
//! use std::time::{Duration, Instant};
//! use vselect_runtime::Debouncer;
//!
//! let start = Instant::now();
//! let mut debouncer = Debouncer::new(Duration::from_millis(100));
//! debouncer.push_at("a", start);
//! debouncer.push_at("ab", start + Duration::from_millis(40));
//!
//! // Still inside the window of the second keystroke.
//! assert_eq!(debouncer.tick_at(start + Duration::from_millis(120)), None);
//! assert_eq!(debouncer.tick_at(start + Duration::from_millis(140)), Some("ab"));
//! ```
//!
//! # Invariants
//!
//! - **Latest-wins**: the last value of a burst is the only one that fires.
//! - **Quiet window**: nothing fires earlier than `quiet` after the last push.
//! - **Deterministic**: identical push/tick timelines give identical results.

use std::time::{Duration, Instant};

use tracing::trace;

#[inline]
fn duration_since_or_zero(now: Instant, earlier: Instant) -> Duration {
    now.checked_duration_since(earlier)
        .unwrap_or(Duration::ZERO)
}

/// Counters for debouncer activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebounceStats {
    /// Values pushed.
    pub pushed: u64,
    /// Values replaced by a newer push before firing.
    pub superseded: u64,
    /// Values fired.
    pub fired: u64,
    /// Values dropped by `cancel`.
    pub cancelled: u64,
}

/// Latest-wins debouncer with a fixed quiet window.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<T>,
    last_event: Option<Instant>,
    stats: DebounceStats,
}

impl<T> Debouncer<T> {
    /// Create a debouncer with the given quiet window.
    #[must_use]
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            last_event: None,
            stats: DebounceStats::default(),
        }
    }

    /// The quiet window.
    #[must_use]
    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Change the quiet window. A pending value keeps its last push time.
    pub fn set_quiet(&mut self, quiet: Duration) {
        self.quiet = quiet;
    }

    /// Push a value now.
    pub fn push(&mut self, value: T) {
        self.push_at(value, Instant::now());
    }

    /// Push a value at a specific time (for testing).
    pub fn push_at(&mut self, value: T, now: Instant) {
        self.stats.pushed += 1;
        if self.pending.replace(value).is_some() {
            self.stats.superseded += 1;
            trace!(superseded = self.stats.superseded, "debounced value replaced");
        }
        self.last_event = Some(now);
    }

    /// Poll now. Returns the value if its quiet window has elapsed.
    pub fn tick(&mut self) -> Option<T> {
        self.tick_at(Instant::now())
    }

    /// Poll at a specific time (for testing).
    pub fn tick_at(&mut self, now: Instant) -> Option<T> {
        let last_event = self.last_event?;
        if duration_since_or_zero(now, last_event) < self.quiet {
            return None;
        }
        let value = self.pending.take()?;
        self.last_event = None;
        self.stats.fired += 1;
        Some(value)
    }

    /// Time left until the pending value fires.
    ///
    /// `None` when nothing is pending, `Duration::ZERO` when already due.
    #[must_use]
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        self.pending.as_ref()?;
        let last_event = self.last_event?;
        Some(self.quiet.saturating_sub(duration_since_or_zero(now, last_event)))
    }

    /// Drop the pending value, returning it.
    pub fn cancel(&mut self) -> Option<T> {
        self.last_event = None;
        let dropped = self.pending.take();
        if dropped.is_some() {
            self.stats.cancelled += 1;
        }
        dropped
    }

    /// Check if a value is waiting.
    #[inline]
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Peek at the waiting value.
    #[must_use]
    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Activity counters.
    #[must_use]
    pub fn stats(&self) -> DebounceStats {
        self.stats
    }
}
