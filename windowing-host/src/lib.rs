//! Host-side plumbing for the `windowing` crate.
//!
//! The `windowing` crate is UI-agnostic and only does the math. This crate connects it to a
//! real scroll container through a small set of callback contracts:
//!
//! - element lookup and rect/offset observers that report geometry into the virtualizer
//! - scroll writes for programmatic scrolling and anti-jump corrections
//! - item measurement, with a border-box default
//! - a [`Scheduler`] for the `is_scrolling` idle timer and next-frame work
//!
//! This crate is intentionally framework-agnostic (no DOM or widget toolkit bindings), and
//! single-threaded: callbacks are `Rc`-based and never invoked while internal state is
//! borrowed.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod error;
mod options;
mod platform;


pub use controller::Controller;
pub use error::HostError;
pub use options::{
    GetScrollElement, HostChangeCallback, HostOptions, MeasureElementFn, ObserveElementOffset,
    ObserveElementRect, ScrollToFn,
};
pub use platform::{
    MeasureTarget, ScrollBehavior, ScrollTarget, ScrollToRequest, Scheduler, Task, TaskId,
    Unsubscribe, element_scroll, measure_border_box,
};
