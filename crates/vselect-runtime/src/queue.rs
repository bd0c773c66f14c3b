#![forbid(unsafe_code)]

//! Deferred command queue for re-entrant mutations.
//!
//! A change notification may ask for further mutations. Running them inside
//! the notification would let a handler observe a half-applied state, so
//! they are queued instead and drained in arrival order once the outer
//! mutation has finished all of its side effects.
//!
//! Only the outermost caller drains: [`DeferredQueue::start_drain`] returns
//! `None` while a drain is already running, and commands pushed during the
//! drain are picked up by the same loop. Each drain has a command budget so
//! a handler that always enqueues another mutation cannot spin forever.

use std::collections::VecDeque;

use tracing::warn;

/// Commands a single drain may apply before the rest are dropped.
pub const DEFAULT_DRAIN_BUDGET: usize = 1024;

/// Token for an active drain. Obtained from [`DeferredQueue::start_drain`].
#[derive(Debug)]
#[must_use = "a drain must be finished with DeferredQueue::finish"]
pub struct Drain {
    remaining: usize,
}

/// FIFO of deferred commands.
#[derive(Debug)]
pub struct DeferredQueue<C> {
    items: VecDeque<C>,
    draining: bool,
    budget: usize,
    dropped: u64,
}

impl<C> Default for DeferredQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> DeferredQueue<C> {
    /// Create an empty queue with the default budget.
    #[must_use]
    pub fn new() -> Self {
        Self::with_budget(DEFAULT_DRAIN_BUDGET)
    }

    /// Create an empty queue with a custom drain budget.
    #[must_use]
    pub fn with_budget(budget: usize) -> Self {
        Self {
            items: VecDeque::new(),
            draining: false,
            budget,
            dropped: 0,
        }
    }

    /// Queue a command.
    pub fn push(&mut self, command: C) {
        self.items.push_back(command);
    }

    /// Number of queued commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a drain is in progress.
    #[must_use]
    pub fn is_draining(&self) -> bool {
        self.draining
    }

    /// Commands dropped because a drain ran out of budget.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Discard every queued command. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let n = self.items.len();
        self.items.clear();
        n
    }

    /// Begin draining, unless a drain is already running.
    pub fn start_drain(&mut self) -> Option<Drain> {
        if self.draining {
            return None;
        }
        self.draining = true;
        Some(Drain {
            remaining: self.budget,
        })
    }

    /// Next command of the active drain, in arrival order.
    ///
    /// When the budget is exhausted the remaining commands are discarded.
    pub fn next(&mut self, drain: &mut Drain) -> Option<C> {
        if self.items.is_empty() {
            return None;
        }
        if drain.remaining == 0 {
            let n = self.clear();
            self.dropped += n as u64;
            warn!(dropped = n, "deferred command budget exhausted");
            return None;
        }
        drain.remaining -= 1;
        self.items.pop_front()
    }

    /// End the drain started by [`DeferredQueue::start_drain`].
    pub fn finish(&mut self, drain: Drain) {
        let _ = drain;
        self.draining = false;
    }
}
