#![forbid(unsafe_code)]

//! vselect runtime
//!
//! Scheduling primitives for a single-threaded, host-driven component. The
//! host owns the clock and the paint loop; these types only decide *what*
//! should run when the host calls back.
//!
//! # Key Components
//!
//! - [`FrameScheduler`] - at most one pending render, last request wins
//! - [`Debouncer`] - fires the latest value once input has been quiet for a window
//! - [`DeferredQueue`] - FIFO of commands issued while a mutation is in flight

pub mod debounce;
pub mod frame;
pub mod queue;

pub use debounce::{DebounceStats, Debouncer};
pub use frame::{FrameScheduler, FrameStats, FrameTicket, PendingFrame, RenderReason};
pub use queue::{DEFAULT_DRAIN_BUDGET, DeferredQueue, Drain};
