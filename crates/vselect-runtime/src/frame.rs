#![forbid(unsafe_code)]

//! Per-frame render coalescing.
//!
//! Render triggers (scroll, filter results, selection changes, opening) can
//! arrive many times between two paints. [`FrameScheduler`] keeps at most one
//! pending request: a new request cancels the one not yet executed and takes
//! its place, carrying the union of both reasons. The host calls
//! [`FrameScheduler::take_due`] once per paint frame and renders if a
//! request is returned.
//!
//! # Invariants
//!
//! - At most one pending request exists at any time.
//! - `take_due` returns each request at most once.
//! - Reasons of replaced requests are never lost; they merge into the latest.

use bitflags::bitflags;
use tracing::trace;

bitflags! {
    /// Why a render was requested.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RenderReason: u8 {
        /// The viewport scrolled.
        const SCROLL = 1 << 0;
        /// The filtered view changed.
        const FILTER = 1 << 1;
        /// The selection changed.
        const SELECTION = 1 << 2;
        /// The dropdown opened.
        const OPEN = 1 << 3;
        /// The dataset was replaced.
        const DATA = 1 << 4;
        /// An explicit refresh.
        const REFRESH = 1 << 5;
    }
}

/// Identifier of a scheduled render request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameTicket(u64);

impl FrameTicket {
    /// Sequence number; later requests have larger numbers.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A render request waiting for the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingFrame {
    pub ticket: FrameTicket,
    pub reasons: RenderReason,
}

/// Counters for scheduler activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Total `request` calls.
    pub requested: u64,
    /// Requests cancelled by a newer request before they ran.
    pub coalesced: u64,
    /// Requests handed out by `take_due`.
    pub executed: u64,
    /// Requests dropped by `cancel`.
    pub cancelled: u64,
}

/// Last-writer-wins render scheduler.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: Option<PendingFrame>,
    next_ticket: u64,
    stats: FrameStats,
}

impl FrameScheduler {
    /// Create an idle scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a render on the next frame.
    ///
    /// Any request still pending is cancelled and replaced.
    pub fn request(&mut self, reason: RenderReason) -> FrameTicket {
        self.stats.requested += 1;
        self.next_ticket += 1;
        let ticket = FrameTicket(self.next_ticket);
        let mut reasons = reason;
        if let Some(prev) = self.pending.take() {
            self.stats.coalesced += 1;
            reasons |= prev.reasons;
            trace!(
                cancelled = prev.ticket.0,
                replacement = ticket.0,
                "render request coalesced"
            );
        }
        self.pending = Some(PendingFrame { ticket, reasons });
        ticket
    }

    /// Take the pending request, if any. Call once per paint frame.
    pub fn take_due(&mut self) -> Option<PendingFrame> {
        let frame = self.pending.take()?;
        self.stats.executed += 1;
        Some(frame)
    }

    /// Drop the pending request without running it.
    ///
    /// Returns `true` if a request was pending.
    pub fn cancel(&mut self) -> bool {
        if self.pending.take().is_some() {
            self.stats.cancelled += 1;
            true
        } else {
            false
        }
    }

    /// Check if a render is pending.
    #[inline]
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Reasons accumulated by the pending request.
    #[must_use]
    pub fn pending_reasons(&self) -> RenderReason {
        self.pending.map(|p| p.reasons).unwrap_or_default()
    }

    /// Activity counters.
    #[must_use]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }
}
